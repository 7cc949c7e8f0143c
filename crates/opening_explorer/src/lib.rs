//! Lichess opening explorer access
//!
//! - [`StatisticsService`] is the lookup seam the repertoire builder uses.
//! - [`LichessExplorer`] talks to `explorer.lichess.ovh` over blocking HTTP
//!   with rate-limit backoff.
//! - [`CachedExplorer`] memoizes lookups for the lifetime of a run and turns
//!   failures into empty responses.
//! - [`MoveTable`] is the popularity view the selection policy works on.

pub mod cache;
pub mod client;
pub mod error;
pub mod response;
pub mod source;

pub use cache::CachedExplorer;
pub use client::{ExplorerConfig, LichessExplorer};
pub use error::{ExplorerError, ExplorerResult};
pub use response::{ExplorerMove, ExplorerResponse, MoveStats, MoveTable};
pub use source::{ExplorerSource, Speed};

/// Per-position game statistics from a reference corpus
pub trait StatisticsService: Send + Sync {
    fn lookup(&self, fen: &str, source: &ExplorerSource) -> ExplorerResult<ExplorerResponse>;
}
