//! Depth-limited position analysis through a UCI engine
//!
//! The repertoire builder treats the engine as a static evaluator: give it a
//! FEN and a search depth, get back a score relative to the side to move.
//!
//! - [`AnalysisEngine`] is the seam the builder depends on; tests substitute
//!   stubs for it.
//! - [`UciEngine`] is the production implementation, a Stockfish process
//!   driven through the `stockfish` crate.
//! - [`score`] holds perspective conversion and win/draw/loss models.

pub mod engine;
pub mod error;
pub mod score;

pub use engine::{relative_score, EngineOptions, UciEngine};
pub use error::{AnalysisError, AnalysisResult};
pub use score::{PovScore, Score, Wdl, WdlModel};

/// A static evaluator for single positions
pub trait AnalysisEngine {
    /// Evaluate `fen` at `depth`, relative to the side to move
    fn evaluate(&self, fen: &str, depth: u32) -> AnalysisResult<Score>;
}

impl<T: AnalysisEngine + ?Sized> AnalysisEngine for &T {
    fn evaluate(&self, fen: &str, depth: u32) -> AnalysisResult<Score> {
        (**self).evaluate(fen, depth)
    }
}
