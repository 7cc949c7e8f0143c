//! Move selection
//!
//! Two ways to pick the builder's move in a position:
//!
//! - [`StatisticalSelector`] - shortlist the moves people actually play, score
//!   them with a [`Heuristic`] and fall back to an engine sweep of every legal
//!   move when a [`FallbackTrigger`] fires.
//! - [`BeamSelector`] - engine only. Score every legal move shallowly, keep
//!   the best few, search those deeper, until one is left.
//!
//! [`opposing_moves`] picks the replies the tree branches into.
//!
//! Ties always go to the first maximal move in evaluation order.

mod beam;
mod opposing;
mod statistical;
mod triggers;

pub use beam::BeamSelector;
pub use opposing::opposing_moves;
pub use statistical::{shortlist, StatisticalSelector};
pub use triggers::{FallbackPolicy, FallbackTrigger, TriggerContext};

use crate::core::RepertoireResult;
use crate::heuristic::Heuristic;
use shakmaty::{Chess, Move};

/// A scored move
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMove {
    pub uci: String,
    pub m: Move,
    pub score: f64,
}

/// The move a selector settled on
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub best: ScoredMove,
    /// Fallback triggers that fired, empty when statistics were trusted
    pub triggers: Vec<FallbackTrigger>,
    /// Moves scored, shortlist and fallback combined
    pub evaluated: usize,
}

/// Selection strategy used by the builder
pub enum Selection<'a> {
    Statistical {
        selector: StatisticalSelector<'a>,
        heuristic: Box<dyn Heuristic + 'a>,
    },
    Beam(BeamSelector<'a>),
}

impl Selection<'_> {
    /// Best move for the side to move, `None` if there is no legal move
    pub fn best_move(&self, position: &Chess) -> RepertoireResult<Option<Choice>> {
        match self {
            Selection::Statistical {
                selector,
                heuristic,
            } => selector.best_move(position, heuristic.as_ref()),
            Selection::Beam(beam) => beam.best_move(position),
        }
    }
}

/// First entry with the highest score
fn first_maximal(pool: Vec<ScoredMove>) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for entry in pool {
        match &best {
            Some(current) if entry.score <= current.score => {}
            _ => best = Some(entry),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    fn scored(uci: &str, score: f64) -> ScoredMove {
        let start = rules::initial_position();
        ScoredMove {
            uci: uci.to_string(),
            m: rules::decode_move(&start, uci).unwrap(),
            score,
        }
    }

    #[test]
    fn test_first_maximal_prefers_earliest_tie() {
        let pool = vec![
            scored("d2d4", 0.4),
            scored("e2e4", 0.6),
            scored("c2c4", 0.6),
            scored("g1f3", 0.5),
        ];
        assert_eq!(first_maximal(pool).unwrap().uci, "e2e4");
    }

    #[test]
    fn test_first_maximal_of_empty_pool() {
        assert!(first_maximal(Vec::new()).is_none());
    }
}
