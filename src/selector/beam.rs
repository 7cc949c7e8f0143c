//! Engine-only beam narrowing
//!
//! Every legal move is searched at the first stage depth. Each later stage
//! re-searches only the survivors of the previous one at a greater depth:
//!
//! ```text
//! (8, 8) -> (12, 4) -> (16, 2) -> (20, 1)
//! ```
//!
//! Deep searches are spent on a handful of moves instead of all of them.

use super::{first_maximal, Choice, ScoredMove};
use crate::core::{BeamStage, RepertoireResult};
use crate::heuristic::{EngineHeuristic, WdlMetric};
use crate::rules;
use shakmaty::Chess;
use tracing::trace;
use uci_analysis::{AnalysisEngine, WdlModel};

pub struct BeamSelector<'a> {
    heuristic: EngineHeuristic<'a>,
    schedule: Vec<BeamStage>,
}

impl<'a> BeamSelector<'a> {
    pub fn new(
        engine: &'a dyn AnalysisEngine,
        model: WdlModel,
        metric: WdlMetric,
        schedule: Vec<BeamStage>,
    ) -> Self {
        Self {
            heuristic: EngineHeuristic::new(engine, Vec::new(), model, metric),
            schedule,
        }
    }

    pub fn best_move(&self, position: &Chess) -> RepertoireResult<Option<Choice>> {
        let mover = rules::side_to_move(position);
        let mut beam: Vec<ScoredMove> = rules::legal_moves(position)
            .into_iter()
            .map(|m| ScoredMove {
                uci: rules::encode_move(&m),
                m,
                score: 0.0,
            })
            .collect();
        let mut evaluated = 0;

        for stage in &self.schedule {
            if beam.len() <= 1 {
                break;
            }
            for entry in &mut beam {
                let after = rules::apply(position, entry.m.clone());
                entry.score = self.heuristic.evaluate_at(&after, mover, stage.depth)?;
            }
            evaluated += beam.len();

            // Stable, so equal scores keep evaluation order
            beam.sort_by(|a, b| b.score.total_cmp(&a.score));
            beam.truncate(stage.keep.max(1));
            trace!(
                "[BUILD] Beam depth {} kept {:?}",
                stage.depth,
                beam.iter().map(|e| e.uci.as_str()).collect::<Vec<_>>()
            );
        }

        Ok(first_maximal(beam).map(|best| Choice {
            best,
            triggers: Vec::new(),
            evaluated,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shakmaty::fen::Fen;
    use shakmaty::{CastlingMode, Position, Square};
    use uci_analysis::{AnalysisResult, Score};

    /// Prefers positions after 1.d4, then 1.e4; records search depths
    struct Preference {
        depths: Mutex<Vec<u32>>,
    }

    impl AnalysisEngine for Preference {
        fn evaluate(&self, fen: &str, depth: u32) -> AnalysisResult<Score> {
            self.depths.lock().push(depth);
            let position: Chess = fen
                .parse::<Fen>()
                .unwrap()
                .into_position(CastlingMode::Standard)
                .unwrap();
            // Scores are relative to Black, the side to move
            let cp = if position.board().piece_at(Square::D4).is_some() {
                -80
            } else if position.board().piece_at(Square::E4).is_some() {
                -60
            } else {
                0
            };
            Ok(Score::Cp(cp))
        }
    }

    fn selector<'a>(engine: &'a Preference, schedule: Vec<BeamStage>) -> BeamSelector<'a> {
        BeamSelector::new(engine, WdlModel::Lichess, WdlMetric::Winning, schedule)
    }

    #[test]
    fn test_beam_narrows_to_best_move() {
        let engine = Preference {
            depths: Mutex::new(Vec::new()),
        };
        let schedule = vec![
            BeamStage { depth: 8, keep: 4 },
            BeamStage { depth: 12, keep: 2 },
            BeamStage { depth: 16, keep: 1 },
        ];
        let choice = selector(&engine, schedule)
            .best_move(&rules::initial_position())
            .unwrap()
            .unwrap();

        assert_eq!(choice.best.uci, "d2d4");
        assert_eq!(choice.evaluated, 20 + 4 + 2);

        let depths = engine.depths.lock();
        assert_eq!(depths.iter().filter(|d| **d == 8).count(), 20);
        assert_eq!(depths.iter().filter(|d| **d == 12).count(), 4);
        assert_eq!(depths.iter().filter(|d| **d == 16).count(), 2);
    }

    #[test]
    fn test_stalemate_has_no_best_move() {
        let engine = Preference {
            depths: Mutex::new(Vec::new()),
        };
        let position: Chess = "8/8/8/8/8/6k1/6r1/7K w - - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let choice = selector(&engine, vec![BeamStage { depth: 8, keep: 8 }])
            .best_move(&position)
            .unwrap();

        assert!(choice.is_none());
        assert!(engine.depths.lock().is_empty());
    }
}
