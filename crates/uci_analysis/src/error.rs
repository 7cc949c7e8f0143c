//! Error types for engine analysis
//!
//! Covers engine startup, pipe I/O and malformed input. All of
//! these are fatal for a repertoire build: callers propagate them upward.

use thiserror::Error;

/// Errors that can occur while talking to a UCI engine
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The engine binary could not be started
    #[error("Failed to start engine at {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the engine pipes failed
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine stopped answering
    #[error("Engine terminated unexpectedly")]
    Terminated,

    /// Input for the engine or its reply could not be interpreted
    #[error("Engine protocol error: {message}")]
    Protocol { message: String },
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
