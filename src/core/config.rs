//! Build configuration and its persistence
//!
//! [`RepertoireConfig`] gathers every tunable threshold of the build. The
//! defaults are the empirically tuned values the tool has always used; none
//! of them is derived.
//!
//! # File Location
//!
//! Loaded from `settings.json` in the user's configuration directory unless
//! an explicit path is given. Every section and field is optional.
//!
//! # Error Handling
//!
//! Load failures fall back to default settings with a warning. Save failures
//! are returned to the caller.

use crate::core::RepertoireResult;
use crate::frontier::FrontierOrder;
use crate::heuristic::WdlMetric;
use directories::ProjectDirs;
use opening_explorer::ExplorerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uci_analysis::{EngineOptions, WdlModel};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Complete configuration for a repertoire build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepertoireConfig {
    pub build: BuildConfig,
    pub selection: SelectionConfig,
    pub opposing: OpposingConfig,
    pub fallback: FallbackConfig,
    pub heuristic: HeuristicConfig,
    pub beam: BeamConfig,
    pub explorer: ExplorerConfig,
    pub engine: EngineConfig,
}

/// Frontier and tree-shape settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Nodes at this ply are not expanded further
    pub max_ply: u32,
    /// Frontier width after pruning is `ply * prune_factor`
    pub prune_factor: usize,
    /// Plies below this are never pruned
    pub prune_from_ply: u32,
    /// Games a position needs before its explorer data counts
    pub min_reliable_games: u64,
    pub order: FrontierOrder,
    pub black_seed: BlackSeed,
    /// Drop a final opponent move so lines end on the builder's move
    pub retract_trailing_reply: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_ply: 14,
            prune_factor: 10,
            prune_from_ply: 6,
            min_reliable_games: 200,
            order: FrontierOrder::Breadth,
            black_seed: BlackSeed::Canonical,
            retract_trailing_reply: false,
        }
    }
}

/// How a Black repertoire is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackSeed {
    /// After 1.e4, 1.d4, 1.c4 and 1.Nf3
    #[default]
    Canonical,
    /// After every plausible White first move from the explorer
    Explorer,
}

/// Shortlist for the side building the repertoire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub min_share: f64,
    pub popular_count: u64,
    /// Popular moves needed before the wide shortlist is used
    pub wide_threshold: usize,
    pub wide_take: usize,
    pub narrow_take: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_share: 0.05,
            popular_count: 100_000,
            wide_threshold: 3,
            wide_take: 5,
            narrow_take: 3,
        }
    }
}

/// Opponent replies worth branching into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpposingConfig {
    pub min_count: usize,
    pub min_share: f64,
    pub popular_count: u64,
    pub max_moves: usize,
}

impl Default for OpposingConfig {
    fn default() -> Self {
        Self {
            min_count: 2,
            min_share: 0.05,
            popular_count: 1_000_000,
            max_moves: 10,
        }
    }
}

/// When and how statistics give way to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub min_candidates: usize,
    /// Fraction below the pre-move score that counts as a drop
    pub relative_drop: f64,
    /// Improvement that still counts as marginal
    pub margin: f64,
    /// Marginal improvements below this score trigger the engine
    pub floor: f64,
    pub depth: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            min_candidates: 2,
            relative_drop: 0.05,
            margin: 0.01,
            floor: 0.45,
            depth: 15,
        }
    }
}

/// A search depth and its share of a blended engine score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthWeight {
    pub depth: u32,
    pub weight: f64,
}

/// Engine-backed evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub model: WdlModel,
    pub metric: WdlMetric,
    /// Depth blend for the engine heuristic strategy
    pub blend: Vec<DepthWeight>,
    /// Search depth for each reply the allow-one heuristic scores
    pub reply_depth: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            model: WdlModel::Lichess,
            metric: WdlMetric::Winning,
            blend: vec![
                DepthWeight { depth: 8, weight: 0.5 },
                DepthWeight { depth: 12, weight: 0.3 },
                DepthWeight { depth: 16, weight: 0.2 },
            ],
            reply_depth: 15,
        }
    }
}

/// One narrowing step of the beam selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamStage {
    pub depth: u32,
    pub keep: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub schedule: Vec<BeamStage>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            schedule: vec![
                BeamStage { depth: 8, keep: 8 },
                BeamStage { depth: 12, keep: 4 },
                BeamStage { depth: 16, keep: 2 },
                BeamStage { depth: 20, keep: 1 },
            ],
        }
    }
}

/// Analysis engine process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path: PathBuf,
    pub options: EngineOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/usr/bin/stockfish"),
            options: EngineOptions::default(),
        }
    }
}

/// Default settings path
///
/// Returns `settings.json` in the user's configuration directory, falling
/// back to the current directory if that cannot be determined.
pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("org", "repertoire", "Repertoire") {
        Some(dirs) => dirs.config_dir().join(SETTINGS_FILENAME),
        None => PathBuf::from(SETTINGS_FILENAME),
    }
}

/// Load the configuration from `path`, or from [`default_config_path`]
///
/// Missing, unreadable or malformed files yield the defaults.
pub fn load_config(path: Option<&Path>) -> RepertoireConfig {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !path.exists() {
        info!("[CONFIG] No settings file at {:?}. Using defaults.", path);
        return RepertoireConfig::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<RepertoireConfig>(&contents) {
            Ok(config) => {
                info!("[CONFIG] Loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "[CONFIG] Failed to parse settings at {:?}: {}. Using defaults.",
                    path, e
                );
                RepertoireConfig::default()
            }
        },
        Err(e) => {
            warn!(
                "[CONFIG] Failed to read settings at {:?}: {}. Using defaults.",
                path, e
            );
            RepertoireConfig::default()
        }
    }
}

/// Write `config` as pretty JSON, creating parent directories as needed
pub fn save_config(config: &RepertoireConfig, path: &Path) -> RepertoireResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    info!("[CONFIG] Saved settings to {:?}", path);
    Ok(())
}
