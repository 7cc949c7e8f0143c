//! Core infrastructure shared by every component
//!
//! - [`error`] - the crate-wide error type and result alias
//! - [`config`] - tunable thresholds and settings persistence

pub mod config;
pub mod error;

pub use config::{
    load_config, save_config, BeamConfig, BeamStage, BlackSeed, BuildConfig, DepthWeight,
    EngineConfig, FallbackConfig, HeuristicConfig, OpposingConfig, RepertoireConfig,
    SelectionConfig,
};
pub use error::{RepertoireError, RepertoireResult};
