//! Explorer databases and their query filters

use serde::{Deserialize, Serialize};

/// Time control buckets understood by the lichess database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speed {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
}

impl Speed {
    pub fn as_str(self) -> &'static str {
        match self {
            Speed::UltraBullet => "ultraBullet",
            Speed::Bullet => "bullet",
            Speed::Blitz => "blitz",
            Speed::Rapid => "rapid",
            Speed::Classical => "classical",
            Speed::Correspondence => "correspondence",
        }
    }
}

/// Which game corpus a lookup runs against
///
/// Part of the cache key: the same FEN filtered two ways is two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "database", rename_all = "lowercase")]
pub enum ExplorerSource {
    /// Games played on lichess, filtered by speed and rating bucket
    Lichess { speeds: Vec<Speed>, ratings: Vec<u16> },
    /// Over-the-board master games
    Masters,
}

impl Default for ExplorerSource {
    fn default() -> Self {
        Self::lichess_club()
    }
}

impl ExplorerSource {
    /// Blitz and slower, 1600-2200 rated players
    pub fn lichess_club() -> Self {
        ExplorerSource::Lichess {
            speeds: vec![Speed::Blitz, Speed::Rapid, Speed::Classical],
            ratings: vec![1600, 1800, 2000, 2200],
        }
    }

    /// Endpoint path below the explorer base URL
    pub fn path(&self) -> &'static str {
        match self {
            ExplorerSource::Lichess { .. } => "lichess",
            ExplorerSource::Masters => "masters",
        }
    }

    /// Query parameters for a move-table lookup of `fen`
    pub fn query(&self, fen: &str, moves: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("fen", fen.to_string()),
            ("moves", moves.to_string()),
            ("topGames", "0".to_string()),
        ];

        if let ExplorerSource::Lichess { speeds, ratings } = self {
            params.push(("recentGames", "0".to_string()));
            params.push(("variant", "standard".to_string()));
            if !speeds.is_empty() {
                let joined: Vec<&str> = speeds.iter().map(|s| s.as_str()).collect();
                params.push(("speeds", joined.join(",")));
            }
            if !ratings.is_empty() {
                let joined: Vec<String> = ratings.iter().map(|r| r.to_string()).collect();
                params.push(("ratings", joined.join(",")));
            }
        }

        params
    }
}
