//! "Allow only one good reply" evaluation
//!
//! Scores a position by how it holds up against the opponent's two best
//! replies. If the opponent finds the best reply with probability `p` (its
//! explorer share, 1.0 when it was never played):
//!
//! ```text
//! value = p * winning(best reply) + (1 - p) * winning(second best reply)
//! ```
//!
//! Replies are searched at a fixed depth and read through the sf12 model.
//! A move that leaves the opponent a single good answer scores well when
//! that answer is rarely found.

use super::{mate_score, EngineHeuristic, Heuristic, WdlMetric};
use crate::core::RepertoireResult;
use crate::rules;
use opening_explorer::{CachedExplorer, ExplorerSource};
use shakmaty::{Chess, Color};
use tracing::trace;
use uci_analysis::{AnalysisEngine, WdlModel};

pub struct AllowOneHeuristic<'a> {
    explorer: &'a CachedExplorer,
    source: ExplorerSource,
    replies: EngineHeuristic<'a>,
    depth: u32,
}

impl<'a> AllowOneHeuristic<'a> {
    pub fn new(
        explorer: &'a CachedExplorer,
        source: ExplorerSource,
        engine: &'a dyn AnalysisEngine,
        depth: u32,
    ) -> Self {
        Self {
            explorer,
            source,
            replies: EngineHeuristic::at_depth(engine, depth, WdlModel::Sf12, WdlMetric::Winning),
            depth,
        }
    }

    /// Chance the side to move plays `uci`, from explorer shares
    fn find_rate(&self, position: &Chess, uci: &str) -> f64 {
        self.explorer
            .table(&rules::full_encoding(position), &self.source, 0)
            .entries()
            .iter()
            .find(|stats| stats.uci == uci)
            .map_or(1.0, |stats| stats.share)
    }
}

impl Heuristic for AllowOneHeuristic<'_> {
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64> {
        if let Some(score) = mate_score(position, pov) {
            return Ok(score);
        }

        let mut replies = Vec::new();
        for m in rules::legal_moves(position) {
            let after = rules::apply(position, m.clone());
            let value = self.replies.evaluate_at(&after, pov, self.depth)?;
            replies.push((rules::encode_move(&m), value));
        }

        // Stalemate: nothing to win
        if replies.is_empty() {
            return Ok(0.0);
        }

        // Best reply for the side to move first
        if rules::side_to_move(position) == pov {
            replies.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            replies.sort_by(|a, b| a.1.total_cmp(&b.1));
        }

        let (best_uci, best) = &replies[0];
        let second = replies.get(1).map_or(*best, |(_, value)| *value);
        let p = self.find_rate(position, best_uci);
        let value = p * best + (1.0 - p) * second;

        trace!(
            "[ALLOW_ONE] best {} ({:.3}, found {:.2}), second {:.3} -> {:.3}",
            best_uci,
            best,
            p,
            second,
            value
        );
        Ok(value.clamp(0.0, 1.0))
    }
}
