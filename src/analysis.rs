//! Move comparison for a single position
//!
//! Ranks every legal move under three measures, each on Stockfish scores
//! read through the sf12 model:
//!
//! | Measure       | Value of a move                                    |
//! |---------------|----------------------------------------------------|
//! | `winningest`  | chance of winning                                  |
//! | `dont-lose`   | chance of winning or drawing                       |
//! | `allow-one`   | [`AllowOneHeuristic`] over the opponent's replies  |

use crate::core::{RepertoireConfig, RepertoireResult};
use crate::heuristic::{AllowOneHeuristic, EngineHeuristic, Heuristic, WdlMetric};
use crate::rules;
use crate::selector::ScoredMove;
use opening_explorer::{CachedExplorer, ExplorerSource};
use shakmaty::Chess;
use tracing::info;
use uci_analysis::{AnalysisEngine, WdlModel};

/// Moves listed per measure
pub const TOP_MOVES: usize = 3;

/// Best moves under one measure, best first
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub measure: &'static str,
    pub moves: Vec<ScoredMove>,
}

/// The `limit` best moves for the side to move under `heuristic`
///
/// Equal scores keep legal move order.
pub fn rank_moves(
    position: &Chess,
    heuristic: &dyn Heuristic,
    limit: usize,
) -> RepertoireResult<Vec<ScoredMove>> {
    let mover = rules::side_to_move(position);
    let mut scored = Vec::new();
    for m in rules::legal_moves(position) {
        let score = heuristic.evaluate(&rules::apply(position, m.clone()), mover)?;
        scored.push(ScoredMove {
            uci: rules::encode_move(&m),
            m,
            score,
        });
    }
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    Ok(scored)
}

/// Rank the moves of `position` under every measure
pub fn analyse(
    position: &Chess,
    explorer: &CachedExplorer,
    source: ExplorerSource,
    engine: &dyn AnalysisEngine,
    config: &RepertoireConfig,
) -> RepertoireResult<Vec<Ranking>> {
    let depth = config.heuristic.reply_depth;
    let winningest = EngineHeuristic::at_depth(engine, depth, WdlModel::Sf12, WdlMetric::Winning);
    let dont_lose = EngineHeuristic::at_depth(engine, depth, WdlModel::Sf12, WdlMetric::NotLosing);
    let allow_one = AllowOneHeuristic::new(explorer, source, engine, depth);

    let measures: [(&'static str, &dyn Heuristic); 3] = [
        ("winningest", &winningest),
        ("dont-lose", &dont_lose),
        ("allow-one", &allow_one),
    ];

    let mut rankings = Vec::with_capacity(measures.len());
    for (measure, heuristic) in measures {
        let moves = rank_moves(position, heuristic, TOP_MOVES)?;
        info!("[ANALYSE] {} done, {} moves listed", measure, moves.len());
        rankings.push(Ranking { measure, moves });
    }
    Ok(rankings)
}

impl Ranking {
    /// `winningest: e4 (0.512), d4 (0.498), ...`
    pub fn render(&self, position: &Chess) -> String {
        let moves: Vec<String> = self
            .moves
            .iter()
            .map(|entry| {
                format!(
                    "{} ({:.3})",
                    rules::notation(position, entry.m.clone()),
                    entry.score
                )
            })
            .collect();
        format!("{}: {}", self.measure, moves.join(", "))
    }
}
