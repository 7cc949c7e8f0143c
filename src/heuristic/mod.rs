//! Position evaluation
//!
//! A [`Heuristic`] scores a position for one side as a probability-like value
//! in `[0, 1]`, higher meaning better for that side. Three implementations:
//!
//! - [`ExplorerHeuristic`] - confidence-discounted win rate from explorer
//!   statistics. Thin or missing data scores 0.0.
//! - [`EngineHeuristic`] - analysis engine scores converted to win/draw/loss
//!   chances, optionally blended across several search depths.
//! - [`AllowOneHeuristic`] - engine value of the opponent's best and second
//!   best replies, weighted by how often the best one is found.
//!
//! All treat a checkmated position the same way: 1.0 if `pov` delivered the
//! mate, 0.0 if `pov` is mated.

mod allow_one;
mod engine;
mod explorer;

pub use allow_one::AllowOneHeuristic;
pub use engine::{EngineHeuristic, WdlMetric};
pub use explorer::ExplorerHeuristic;

use crate::core::RepertoireResult;
use crate::rules;
use shakmaty::{Chess, Color};

/// Scores positions from one side's point of view
pub trait Heuristic {
    /// Evaluate `position` for `pov`
    ///
    /// # Returns
    ///
    /// A value in `[0, 1]`. Errors are reserved for analysis engine
    /// failures, which abort the build.
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64>;
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64> {
        (**self).evaluate(position, pov)
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64> {
        (**self).evaluate(position, pov)
    }
}

/// Score of a finished game, if `position` is checkmate
fn mate_score(position: &Chess, pov: Color) -> Option<f64> {
    if !rules::is_checkmate(position) {
        return None;
    }
    if rules::side_to_move(position) == pov {
        Some(0.0)
    } else {
        Some(1.0)
    }
}
