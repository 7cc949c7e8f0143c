//! Error types for explorer lookups
//!
//! None of these abort a repertoire build: [`crate::CachedExplorer`] logs
//! them and substitutes an empty response.

use thiserror::Error;

/// Errors that can occur while querying the opening explorer
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Transport or decoding failure inside reqwest
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Still rate limited after the last allowed attempt
    #[error("Explorer rate limit persisted after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Non-success status other than 429
    #[error("Explorer returned HTTP {status}")]
    Status { status: u16 },

    /// The configured base URL could not be combined with the query
    #[error("Invalid explorer URL: {message}")]
    InvalidUrl { message: String },
}

/// Result type alias for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;
