//! Stockfish session behind [`AnalysisEngine`]
//!
//! [`UciEngine`] owns one `stockfish::Stockfish` process for its lifetime.
//! Each evaluation sets the position, sets the depth and runs `go` while
//! holding the session lock, so a shared reference can be handed to several
//! evaluators.
//!
//! The stockfish crate reports scores from White's side. [`relative_score`]
//! turns them back into scores for the side to move, which is what
//! [`Score`] expects.
//!
//! Dropping the engine sends `quit`, on every exit path.

use crate::error::{AnalysisError, AnalysisResult};
use crate::score::Score;
use crate::AnalysisEngine;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::path::Path;
use stockfish::{EngineEval, EvalType, Stockfish};
use tracing::{debug, info, warn};

/// Engine options applied once after startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub threads: Option<u32>,
    pub hash_mb: Option<u32>,
}

impl EngineOptions {
    fn apply(&self, stockfish: &mut Stockfish) -> std::io::Result<()> {
        if let Some(threads) = self.threads {
            stockfish.set_threads(threads)?;
        }
        if let Some(hash) = self.hash_mb {
            stockfish.set_hash(hash)?;
        }
        Ok(())
    }
}

/// Sends `quit` when the session goes out of scope
struct EngineGuard(Stockfish);

impl Drop for EngineGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.quit() {
            warn!("[UCI] Failed to send quit: {}", e);
        }
    }
}

/// A running Stockfish engine
pub struct UciEngine {
    name: String,
    session: Mutex<EngineGuard>,
}

impl UciEngine {
    /// Start the engine at `path` and wait until it is ready
    pub fn spawn(path: impl AsRef<Path>, options: &EngineOptions) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let Some(command) = path.to_str() else {
            return Err(AnalysisError::Protocol {
                message: format!("engine path is not valid UTF-8: {}", display),
            });
        };

        let stockfish = Stockfish::new(command).map_err(|source| AnalysisError::Spawn {
            path: display.clone(),
            source,
        })?;
        let mut guard = EngineGuard(stockfish);

        options.apply(&mut guard.0)?;
        guard.0.setup_for_new_game()?;
        guard.0.ensure_ready()?;

        let name = match guard.0.get_version() {
            Some(version) => format!("Stockfish {}", version),
            None => display,
        };
        info!("[UCI] Engine ready: {}", name);

        Ok(Self {
            name,
            session: Mutex::new(guard),
        })
    }

    /// Engine name, from the version banner when the engine printed one
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shut the engine down now instead of at end of scope
    pub fn close(self) {
        drop(self);
    }
}

impl AnalysisEngine for UciEngine {
    fn evaluate(&self, fen: &str, depth: u32) -> AnalysisResult<Score> {
        let turn = turn_of(fen)?;

        let output = {
            let mut session = self.session.lock();
            session.0.set_fen_position(fen)?;
            session.0.set_depth(depth);
            session.0.go()?
        };

        let score = relative_score(output.eval(), turn);
        debug!(
            "[UCI] depth {} {} -> {:?} ({})",
            depth,
            fen,
            score,
            output.best_move()
        );
        Ok(score)
    }
}

/// Side to move from the second FEN field
fn turn_of(fen: &str) -> AnalysisResult<Color> {
    fen.split_whitespace()
        .nth(1)
        .and_then(|field| field.chars().next())
        .and_then(Color::from_char)
        .ok_or_else(|| AnalysisError::Protocol {
            message: format!("no side to move in `{}`", fen),
        })
}

/// Convert a White-relative evaluation into a score for `turn`
///
/// `mate 0` means the side to move is already mated and keeps its sign.
pub fn relative_score(eval: EngineEval, turn: Color) -> Score {
    let value = match turn {
        Color::White => eval.value(),
        Color::Black => -eval.value(),
    };
    match eval.eval_type() {
        EvalType::Centipawn => Score::Cp(value),
        EvalType::Mate => Score::Mate(value),
    }
}
