//! Statistics-first selection with engine fallback

use super::triggers::{FallbackPolicy, TriggerContext};
use super::{first_maximal, Choice, ScoredMove};
use crate::core::{RepertoireConfig, RepertoireResult, SelectionConfig};
use crate::heuristic::{EngineHeuristic, Heuristic};
use crate::rules;
use opening_explorer::{CachedExplorer, ExplorerSource, MoveStats, MoveTable};
use shakmaty::Chess;
use tracing::debug;

/// Moves worth scoring from `table`
///
/// When at least `wide_threshold` moves are popular (share above
/// `min_share` or more than `popular_count` games) the `wide_take` most
/// played of them are returned. Otherwise the `narrow_take` most played
/// moves overall.
pub fn shortlist<'t>(table: &'t MoveTable, config: &SelectionConfig) -> Vec<&'t MoveStats> {
    let mut popular = table.popular(config.min_share, config.popular_count);
    if popular.len() >= config.wide_threshold {
        popular.sort_by(|a, b| b.share.total_cmp(&a.share));
        popular.truncate(config.wide_take);
        return popular;
    }

    let mut overall = table.by_share();
    overall.truncate(config.narrow_take);
    overall
}

pub struct StatisticalSelector<'a> {
    explorer: &'a CachedExplorer,
    source: ExplorerSource,
    min_reliable_games: u64,
    selection: SelectionConfig,
    policy: FallbackPolicy,
    fallback: EngineHeuristic<'a>,
}

impl<'a> StatisticalSelector<'a> {
    pub fn new(
        explorer: &'a CachedExplorer,
        source: ExplorerSource,
        config: &RepertoireConfig,
        fallback: EngineHeuristic<'a>,
    ) -> Self {
        Self {
            explorer,
            source,
            min_reliable_games: config.build.min_reliable_games,
            selection: config.selection.clone(),
            policy: FallbackPolicy::new(config.fallback.clone()),
            fallback,
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Best move for the side to move in `position`
    ///
    /// Shortlisted moves are scored with `heuristic`. If a fallback trigger
    /// fires, every legal move is also scored by the engine at the fallback
    /// depth and added to the pool.
    pub fn best_move(
        &self,
        position: &Chess,
        heuristic: &dyn Heuristic,
    ) -> RepertoireResult<Option<Choice>> {
        let mover = rules::side_to_move(position);
        let fen = rules::full_encoding(position);
        let table = self
            .explorer
            .table(&fen, &self.source, self.min_reliable_games);

        let mut pool = Vec::new();
        for stats in shortlist(&table, &self.selection) {
            let Some(m) = rules::decode_move(position, &stats.uci) else {
                debug!("[BUILD] Skipping undecodable explorer move {} at {}", stats.uci, fen);
                continue;
            };
            let score = heuristic.evaluate(&rules::apply(position, m.clone()), mover)?;
            pool.push(ScoredMove {
                uci: stats.uci.clone(),
                m,
                score,
            });
        }

        let context = TriggerContext {
            evaluated: pool.len(),
            top_score: pool.iter().map(|entry| entry.score).reduce(f64::max),
            before: heuristic.evaluate(position, mover)?,
        };
        let triggers = self.policy.fired(&context);

        if !triggers.is_empty() {
            let depth = self.policy.config().depth;
            debug!(
                "[BUILD] Engine fallback at {} ({:?}), depth {}",
                fen, triggers, depth
            );
            for m in rules::legal_moves(position) {
                let score =
                    self.fallback
                        .evaluate_at(&rules::apply(position, m.clone()), mover, depth)?;
                pool.push(ScoredMove {
                    uci: rules::encode_move(&m),
                    m,
                    score,
                });
            }
        }

        let evaluated = pool.len();
        Ok(first_maximal(pool).map(|best| Choice {
            best,
            triggers,
            evaluated,
        }))
    }
}
