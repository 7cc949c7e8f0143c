//! Opening repertoire builder
//!
//! Grows a tree of chess positions by choosing the best move for one side
//! and branching over the opponent's statistically plausible replies. Every
//! finished branch is one line of the repertoire, exported as PGN.
//!
//! - [`rules`] - position and move helpers over `shakmaty`
//! - [`confidence`] - Wilson lower bound for small-sample win rates
//! - [`heuristic`] - explorer and engine position scores
//! - [`selector`] - best move and opponent reply selection
//! - [`frontier`] - node queue, pruning and the terminal set
//! - [`builder`] - strategy presets and the build loop
//! - [`analysis`] - move rankings for a single position
//! - [`pgn`] - game records and export
//! - [`core`] - errors and configuration

pub mod analysis;
pub mod builder;
pub mod confidence;
pub mod core;
pub mod frontier;
pub mod heuristic;
pub mod pgn;
pub mod rules;
pub mod selector;

pub use builder::{HeuristicKind, Repertoire, RepertoireBuilder, SelectionKind, Strategy};
pub use core::{RepertoireConfig, RepertoireError, RepertoireResult};
