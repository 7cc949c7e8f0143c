//! Memoizing wrapper around a [`StatisticsService`]
//!
//! Entries are keyed by full FEN and [`ExplorerSource`] and live as long as
//! the cache. Each key is fetched at most once: concurrent callers asking
//! for the same uncached key block on the first caller's lookup and then
//! share its result.
//!
//! Failed lookups are stored as empty responses. A position the explorer
//! could not answer counts as zero evidence for the rest of the run.

use crate::response::{ExplorerResponse, MoveTable};
use crate::source::ExplorerSource;
use crate::StatisticsService;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::warn;

type Slot = Arc<OnceLock<Arc<ExplorerResponse>>>;

pub struct CachedExplorer {
    inner: Box<dyn StatisticsService>,
    entries: Mutex<HashMap<(String, ExplorerSource), Slot>>,
}

impl CachedExplorer {
    pub fn new(inner: impl StatisticsService + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Response for `fen`, fetching it on first use
    pub fn response(&self, fen: &str, source: &ExplorerSource) -> Arc<ExplorerResponse> {
        let slot = {
            let mut entries = self.entries.lock();
            entries
                .entry((fen.to_string(), source.clone()))
                .or_default()
                .clone()
        };

        slot.get_or_init(|| match self.inner.lookup(fen, source) {
            Ok(response) => Arc::new(response),
            Err(e) => {
                warn!("[EXPLORER] No data for {} ({}), treating as empty", fen, e);
                Arc::new(ExplorerResponse::default())
            }
        })
        .clone()
    }

    /// Move table for `fen`, empty below `min_total` sampled games
    pub fn table(&self, fen: &str, source: &ExplorerSource, min_total: u64) -> MoveTable {
        MoveTable::from_response(&self.response(fen, source), min_total)
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
