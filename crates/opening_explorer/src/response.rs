//! Explorer response payloads and the filtered move table
//!
//! [`ExplorerResponse`] mirrors the JSON returned by the explorer's
//! `/lichess` and `/masters` endpoints. Unknown fields (`opening`,
//! `topGames`, `averageRating`, ...) are ignored.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Aggregate results for a position plus the most played continuations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerResponse {
    pub white: u64,
    pub draws: u64,
    pub black: u64,
    pub moves: Vec<ExplorerMove>,
}

impl ExplorerResponse {
    /// Games that reached this position
    pub fn total(&self) -> u64 {
        self.white + self.draws + self.black
    }

    /// Games won by `side` from this position
    pub fn wins_for(&self, side: Color) -> u64 {
        match side {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// One continuation in an explorer response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerMove {
    pub uci: String,
    pub san: String,
    pub white: u64,
    pub draws: u64,
    pub black: u64,
}

impl ExplorerMove {
    pub fn total(&self) -> u64 {
        self.white + self.draws + self.black
    }

    pub fn wins_for(&self, side: Color) -> u64 {
        match side {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// Popularity of a single continuation
#[derive(Debug, Clone, PartialEq)]
pub struct MoveStats {
    /// UCI encoding as reported by the explorer
    pub uci: String,
    /// Games in which this move was played
    pub count: u64,
    /// `count` divided by the games that reached the position
    pub share: f64,
}

/// Move popularity table for one position
///
/// Empty when fewer than `min_total` games reached the position, so thin
/// data never produces candidates or sample weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveTable {
    entries: Vec<MoveStats>,
}

impl MoveTable {
    pub fn from_response(response: &ExplorerResponse, min_total: u64) -> Self {
        let total = response.total();
        if total == 0 || total < min_total {
            return Self::default();
        }

        let entries = response
            .moves
            .iter()
            .map(|m| MoveStats {
                uci: m.uci.clone(),
                count: m.total(),
                share: m.total() as f64 / total as f64,
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[MoveStats] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Summed move counts, used as the "how well trodden" weight
    pub fn sample_weight(&self) -> u64 {
        self.entries.iter().map(|m| m.count).sum()
    }

    /// Entries sorted by share, most played first
    ///
    /// The sort is stable: equal shares keep explorer order.
    pub fn by_share(&self) -> Vec<&MoveStats> {
        let mut sorted: Vec<&MoveStats> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.share.total_cmp(&a.share));
        sorted
    }

    /// Entries whose share exceeds `min_share` or whose count exceeds
    /// `popular_count`, in explorer order
    pub fn popular(&self, min_share: f64, popular_count: u64) -> Vec<&MoveStats> {
        self.entries
            .iter()
            .filter(|m| m.share > min_share || m.count > popular_count)
            .collect()
    }
}
