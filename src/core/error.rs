//! Error types for the repertoire builder
//!
//! Analysis engine failures are fatal and surface here. Explorer failures
//! never do: the explorer cache degrades them to empty data before they
//! reach the builder.

use thiserror::Error;
use uci_analysis::AnalysisError;

/// Errors that can stop a repertoire build
#[derive(Error, Debug)]
pub enum RepertoireError {
    /// The analysis engine crashed or broke protocol
    #[error("Analysis engine failure: {0}")]
    Analysis(#[from] AnalysisError),

    /// A FEN could not be turned into a legal position
    #[error("Invalid position {fen}: {message}")]
    InvalidPosition { fen: String, message: String },

    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// No strategy preset with this name
    #[error("Unknown strategy preset: {name} (expected one of {expected})")]
    UnknownStrategy { name: String, expected: String },
}

/// Result type alias for repertoire operations
pub type RepertoireResult<T> = Result<T, RepertoireError>;
