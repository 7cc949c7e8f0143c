//! Engine-backed evaluation
//!
//! Each configured depth is searched once. The score is read from the `pov`
//! side, converted to a win/draw/loss split with the chosen [`WdlModel`] at
//! the position's ply, reduced to one number by a [`WdlMetric`] and blended
//! by weight:
//!
//! ```text
//! value = sum(weight_i * metric(wdl(score at depth_i))) / sum(weight_i)
//! ```

use super::{mate_score, Heuristic};
use crate::core::{DepthWeight, RepertoireResult};
use crate::rules;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color};
use tracing::trace;
use uci_analysis::{AnalysisEngine, PovScore, Wdl, WdlModel};

/// How a win/draw/loss split becomes a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WdlMetric {
    /// Chance of winning
    #[default]
    Winning,
    /// Chance of winning or drawing
    NotLosing,
    /// Expected points, a draw counting half
    Expectation,
}

impl WdlMetric {
    pub fn apply(self, wdl: &Wdl) -> f64 {
        match self {
            WdlMetric::Winning => wdl.winning_chance(),
            WdlMetric::NotLosing => wdl.winning_chance() + wdl.drawing_chance(),
            WdlMetric::Expectation => wdl.expectation(),
        }
    }
}

pub struct EngineHeuristic<'a> {
    engine: &'a dyn AnalysisEngine,
    blend: Vec<DepthWeight>,
    model: WdlModel,
    metric: WdlMetric,
}

impl<'a> EngineHeuristic<'a> {
    /// Heuristic blending scores across `blend`
    ///
    /// Shallow depths are cheap and usually carry the larger weights.
    pub fn new(
        engine: &'a dyn AnalysisEngine,
        blend: Vec<DepthWeight>,
        model: WdlModel,
        metric: WdlMetric,
    ) -> Self {
        Self {
            engine,
            blend,
            model,
            metric,
        }
    }

    /// Heuristic searching a single fixed depth
    pub fn at_depth(
        engine: &'a dyn AnalysisEngine,
        depth: u32,
        model: WdlModel,
        metric: WdlMetric,
    ) -> Self {
        Self::new(engine, vec![DepthWeight { depth, weight: 1.0 }], model, metric)
    }

    /// Value of `position` for `pov` at a single `depth`
    pub fn evaluate_at(&self, position: &Chess, pov: Color, depth: u32) -> RepertoireResult<f64> {
        if let Some(score) = mate_score(position, pov) {
            return Ok(score);
        }
        self.search(position, pov, depth)
    }

    fn search(&self, position: &Chess, pov: Color, depth: u32) -> RepertoireResult<f64> {
        let fen = rules::full_encoding(position);
        let relative = self.engine.evaluate(&fen, depth)?;
        let score = PovScore::new(relative, rules::side_to_move(position)).from_side(pov);
        let value = self
            .metric
            .apply(&score.wdl(self.model, rules::ply(position)));
        trace!("[UCI] {} depth {} -> {:?} ({:.3})", fen, depth, score, value);
        Ok(value)
    }
}

impl Heuristic for EngineHeuristic<'_> {
    fn evaluate(&self, position: &Chess, pov: Color) -> RepertoireResult<f64> {
        if let Some(score) = mate_score(position, pov) {
            return Ok(score);
        }

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for step in &self.blend {
            weighted += step.weight * self.search(position, pov, step.depth)?;
            total_weight += step.weight;
        }

        if total_weight <= 0.0 {
            return Ok(0.0);
        }
        Ok((weighted / total_weight).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use uci_analysis::{AnalysisError, AnalysisResult, Score};

    /// Returns a fixed score per depth and records each request
    struct DepthEngine {
        scores: Vec<(u32, Score)>,
        calls: Mutex<Vec<u32>>,
    }

    impl DepthEngine {
        fn new(scores: Vec<(u32, Score)>) -> Self {
            Self {
                scores,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnalysisEngine for DepthEngine {
        fn evaluate(&self, _fen: &str, depth: u32) -> AnalysisResult<Score> {
            self.calls.lock().push(depth);
            self.scores
                .iter()
                .find(|(d, _)| *d == depth)
                .map(|(_, score)| *score)
                .ok_or(AnalysisError::Terminated)
        }
    }

    #[test]
    fn test_equal_position_is_even_under_lichess_model() {
        let engine = DepthEngine::new(vec![(10, Score::Cp(0))]);
        let heuristic = EngineHeuristic::at_depth(&engine, 10, WdlModel::Lichess, WdlMetric::Winning);
        let value = heuristic
            .evaluate(&rules::initial_position(), Color::White)
            .unwrap();
        assert!((value - 0.5).abs() < 1e-9, "got {}", value);
    }

    #[test]
    fn test_score_is_read_from_pov() {
        // White to move and a pawn up
        let engine = DepthEngine::new(vec![(10, Score::Cp(100))]);
        let heuristic = EngineHeuristic::at_depth(&engine, 10, WdlModel::Lichess, WdlMetric::Winning);
        let start = rules::initial_position();

        let white = heuristic.evaluate(&start, Color::White).unwrap();
        let black = heuristic.evaluate(&start, Color::Black).unwrap();
        assert!(white > 0.5);
        assert!((white + black - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_weights_each_depth() {
        let engine = DepthEngine::new(vec![(8, Score::Cp(0)), (12, Score::MateGiven)]);
        let blend = vec![
            DepthWeight { depth: 8, weight: 0.75 },
            DepthWeight { depth: 12, weight: 0.25 },
        ];
        let heuristic = EngineHeuristic::new(&engine, blend, WdlModel::Lichess, WdlMetric::Winning);
        let value = heuristic
            .evaluate(&rules::initial_position(), Color::White)
            .unwrap();

        assert!((value - (0.75 * 0.5 + 0.25)).abs() < 1e-9, "got {}", value);
        assert_eq!(*engine.calls.lock(), vec![8, 12]);
    }

    #[test]
    fn test_metrics_on_drawish_split() {
        let wdl = Wdl::new(200, 600, 200);
        assert!((WdlMetric::Winning.apply(&wdl) - 0.2).abs() < 1e-9);
        assert!((WdlMetric::NotLosing.apply(&wdl) - 0.8).abs() < 1e-9);
        assert!((WdlMetric::Expectation.apply(&wdl) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_engine_failure_propagates() {
        let engine = DepthEngine::new(Vec::new());
        let heuristic = EngineHeuristic::at_depth(&engine, 15, WdlModel::Lichess, WdlMetric::Winning);
        assert!(heuristic
            .evaluate(&rules::initial_position(), Color::White)
            .is_err());
    }

    #[test]
    fn test_checkmate_skips_engine() {
        let engine = DepthEngine::new(Vec::new());
        let heuristic = EngineHeuristic::at_depth(&engine, 15, WdlModel::Sf12, WdlMetric::Winning);
        let mated =
            rules::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();

        assert_eq!(heuristic.evaluate(&mated, Color::Black).unwrap(), 1.0);
        assert_eq!(heuristic.evaluate_at(&mated, Color::White, 15).unwrap(), 0.0);
        assert!(engine.calls.lock().is_empty());
    }
}
