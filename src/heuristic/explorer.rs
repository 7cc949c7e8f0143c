//! Statistics-backed evaluation

use super::{mate_score, Heuristic};
use crate::confidence;
use crate::core::RepertoireResult;
use crate::rules;
use opening_explorer::{CachedExplorer, ExplorerSource};
use shakmaty::{Chess, Color};

/// Wilson lower bound on the point-of-view side's win rate
///
/// A move seen twice and won twice scores far below one won 60% of the
/// time over fifty thousand games.
pub struct ExplorerHeuristic<'a> {
    explorer: &'a CachedExplorer,
    source: ExplorerSource,
}

impl<'a> ExplorerHeuristic<'a> {
    pub fn new(explorer: &'a CachedExplorer, source: ExplorerSource) -> Self {
        Self { explorer, source }
    }
}

impl Heuristic for ExplorerHeuristic<'_> {
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64> {
        if let Some(score) = mate_score(position, pov) {
            return Ok(score);
        }

        let response = self
            .explorer
            .response(&rules::full_encoding(position), &self.source);
        let total = response.total();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(confidence::lower_bound(response.wins_for(pov), total))
    }
}
