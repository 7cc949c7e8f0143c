//! Shared stubs for integration tests
//!
//! [`StubExplorer`] answers from a fixed map of positions and
//! [`StubEngine`] scores positions with a closure, both counting calls.

#![allow(dead_code)]

use opening_explorer::{
    ExplorerMove, ExplorerResponse, ExplorerResult, ExplorerSource, StatisticsService,
};
use parking_lot::Mutex;
use repertoire::rules;
use shakmaty::Chess;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uci_analysis::{AnalysisEngine, AnalysisError, AnalysisResult, Score};

/// Position after playing `line` (UCI) from the start
pub fn play(line: &[&str]) -> Chess {
    line.iter().fold(rules::initial_position(), |position, uci| {
        let m = rules::decode_move(&position, uci).expect("legal test move");
        rules::apply(&position, m)
    })
}

pub fn fen(line: &[&str]) -> String {
    rules::full_encoding(&play(line))
}

/// Response with White wins, draws and Black wins plus per-move counts
///
/// Move counts are booked as draws so only the position totals matter.
pub fn response(white: u64, draws: u64, black: u64, moves: &[(&str, u64)]) -> ExplorerResponse {
    ExplorerResponse {
        white,
        draws,
        black,
        moves: moves
            .iter()
            .map(|(uci, count)| ExplorerMove {
                uci: uci.to_string(),
                draws: *count,
                ..ExplorerMove::default()
            })
            .collect(),
    }
}

/// Explorer answering from a map keyed by full FEN
#[derive(Default)]
pub struct StubExplorer {
    positions: HashMap<String, ExplorerResponse>,
    lookups: Arc<AtomicUsize>,
}

impl StubExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, line: &[&str], response: ExplorerResponse) -> Self {
        self.positions.insert(fen(line), response);
        self
    }

    /// Shared lookup counter, readable after the stub is moved into a cache
    pub fn lookups(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lookups)
    }
}

impl StatisticsService for StubExplorer {
    fn lookup(&self, fen: &str, _source: &ExplorerSource) -> ExplorerResult<ExplorerResponse> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.positions.get(fen).cloned().unwrap_or_default())
    }
}

type Scorer = Box<dyn Fn(&Chess) -> Option<Score>>;

/// Engine scoring positions with a closure
///
/// The closure sees the parsed position and returns a score relative to
/// the side to move. `None` simulates an engine failure.
pub struct StubEngine {
    scorer: Scorer,
    calls: Mutex<Vec<(String, u32)>>,
}

impl StubEngine {
    pub fn new(scorer: impl Fn(&Chess) -> Option<Score> + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every position is level
    pub fn level() -> Self {
        Self::new(|_| Some(Score::Cp(0)))
    }

    /// Scores the position after `line` as `cp` for the side that just moved
    pub fn favouring(line: &'static [&'static str], cp: i32) -> Self {
        let target = rules::canonical_key(&play(line));
        Self::new(move |position| {
            if rules::canonical_key(position) == target {
                Some(Score::Cp(-cp))
            } else {
                Some(Score::Cp(0))
            }
        })
    }

    pub fn failing() -> Self {
        Self::new(|_| None)
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }
}

impl AnalysisEngine for StubEngine {
    fn evaluate(&self, fen: &str, depth: u32) -> AnalysisResult<Score> {
        self.calls.lock().push((fen.to_string(), depth));
        let position = rules::from_fen(fen).map_err(|e| AnalysisError::Protocol {
            message: e.to_string(),
        })?;
        (self.scorer)(&position).ok_or(AnalysisError::Terminated)
    }
}
