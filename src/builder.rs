//! Repertoire tree growth
//!
//! [`RepertoireBuilder::build`] runs one [`Strategy`]:
//!
//! 1. Seed the frontier with the start position, or for Black with the
//!    positions after White's first moves.
//! 2. Pop nodes until the frontier drains. When the ply about to be
//!    processed changes (from `prune_from_ply` on), prune the frontier to
//!    `ply * prune_factor` nodes.
//! 3. For each node below `max_ply`, pick the best move (once per canonical
//!    position), play it and branch into every plausible opponent reply.
//! 4. Nodes that cannot be expanded become terminal. Each terminal node is
//!    one line of the repertoire.

use crate::core::{BlackSeed, BuildConfig, RepertoireConfig, RepertoireError, RepertoireResult};
use crate::frontier::{Frontier, FrontierNode, PruneReport};
use crate::heuristic::{AllowOneHeuristic, EngineHeuristic, ExplorerHeuristic, Heuristic};
use crate::pgn::{self, GameRecord};
use crate::rules;
use crate::selector::{opposing_moves, BeamSelector, Selection, StatisticalSelector};
use opening_explorer::{CachedExplorer, ExplorerSource, MoveTable};
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Move};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uci_analysis::AnalysisEngine;

/// White's first moves a Black repertoire has to answer by default
pub const CANONICAL_FIRST_MOVES: [&str; 4] = ["e2e4", "d2d4", "c2c4", "g1f3"];

/// What scores the statistical shortlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Confidence-discounted explorer win rate
    Explorer,
    /// Depth-blended engine evaluation
    Engine,
    /// Opponent's best and second best replies, weighted by find rate
    AllowOne,
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explorer" => Ok(HeuristicKind::Explorer),
            "engine" => Ok(HeuristicKind::Engine),
            "allow_one" | "allow-one" => Ok(HeuristicKind::AllowOne),
            other => Err(format!(
                "unknown heuristic '{}' (explorer, engine, allow-one)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Statistical,
    Beam,
}

/// Everything that distinguishes one build from another
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub name: String,
    pub color: Color,
    pub source: ExplorerSource,
    pub heuristic: HeuristicKind,
    pub selection: SelectionKind,
    pub max_ply: u32,
    pub prune_factor: usize,
}

impl Strategy {
    pub const PRESETS: [&'static str; 6] = ["licw", "licb", "masw", "masb", "easyw", "easyb"];

    /// Named preset
    ///
    /// | Name    | Color | Explorer        | Selection   |
    /// |---------|-------|-----------------|-------------|
    /// | `licw`  | White | Lichess         | statistical |
    /// | `licb`  | Black | Lichess         | statistical |
    /// | `masw`  | White | Masters         | statistical |
    /// | `masb`  | Black | Masters         | statistical |
    /// | `easyw` | White | Lichess         | beam        |
    /// | `easyb` | Black | Lichess         | beam        |
    ///
    /// Ply limit and prune factor come from `build`.
    pub fn preset(name: &str, build: &BuildConfig) -> RepertoireResult<Self> {
        let (color, source, selection) = match name {
            "licw" => (Color::White, ExplorerSource::lichess_club(), SelectionKind::Statistical),
            "licb" => (Color::Black, ExplorerSource::lichess_club(), SelectionKind::Statistical),
            "masw" => (Color::White, ExplorerSource::Masters, SelectionKind::Statistical),
            "masb" => (Color::Black, ExplorerSource::Masters, SelectionKind::Statistical),
            "easyw" => (Color::White, ExplorerSource::lichess_club(), SelectionKind::Beam),
            "easyb" => (Color::Black, ExplorerSource::lichess_club(), SelectionKind::Beam),
            _ => {
                return Err(RepertoireError::UnknownStrategy {
                    name: name.to_string(),
                    expected: Self::PRESETS.join(", "),
                })
            }
        };

        Ok(Self {
            name: name.to_string(),
            color,
            source,
            heuristic: HeuristicKind::Explorer,
            selection,
            max_ply: build.max_ply,
            prune_factor: build.prune_factor,
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {} explorer, {:?} heuristic, {:?} selection, max ply {})",
            self.name,
            self.color,
            self.source.path(),
            self.heuristic,
            self.selection,
            self.max_ply
        )
    }
}

/// Best move per canonical position, written once
///
/// `None` records a position with no legal move.
#[derive(Debug, Default)]
pub struct BestMoveCache {
    entries: HashMap<String, Option<Move>>,
}

impl BestMoveCache {
    pub fn get(&self, key: &str) -> Option<&Option<Move>> {
        self.entries.get(key)
    }

    /// Store `best` for `key` unless an entry exists
    ///
    /// Returns the stored value.
    pub fn insert(&mut self, key: String, best: Option<Move>) -> Option<Move> {
        self.entries.entry(key).or_insert(best).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finished build
#[derive(Debug, Clone)]
pub struct Repertoire {
    pub strategy: String,
    /// One record per terminal node, in the order lines finished
    pub lines: Vec<GameRecord>,
    /// Terminal lines per ply
    pub depths: BTreeMap<u32, usize>,
    /// Every frontier prune, with the ply that triggered it
    pub prunes: Vec<(u32, PruneReport)>,
}

impl Repertoire {
    pub fn to_pgn(&self) -> String {
        pgn::write_games(&self.lines, &self.strategy)
    }
}

pub struct RepertoireBuilder<'a> {
    explorer: &'a CachedExplorer,
    engine: &'a dyn AnalysisEngine,
    config: &'a RepertoireConfig,
}

impl<'a> RepertoireBuilder<'a> {
    pub fn new(
        explorer: &'a CachedExplorer,
        engine: &'a dyn AnalysisEngine,
        config: &'a RepertoireConfig,
    ) -> Self {
        Self {
            explorer,
            engine,
            config,
        }
    }

    /// Grow the repertoire for `strategy`
    ///
    /// # Errors
    ///
    /// Only analysis engine failures abort a build. Missing explorer data
    /// ends the affected lines instead.
    pub fn build(&self, strategy: &Strategy) -> RepertoireResult<Repertoire> {
        let build = &self.config.build;
        let selection = self.selection(strategy);
        let mut best_moves = BestMoveCache::default();
        let mut frontier = Frontier::new(build.order);
        let mut prunes = Vec::new();

        info!("[BUILD] Starting {}", strategy);
        for seed in self.seeds(strategy) {
            frontier.push(seed);
        }

        while let Some(ply) = frontier.peek_ply() {
            if frontier.observe_ply(ply) && ply >= build.prune_from_ply {
                let width = ply as usize * strategy.prune_factor;
                let report = frontier.prune(width, build.min_reliable_games, |node| {
                    self.table(&node.position, &strategy.source).sample_weight()
                });
                prunes.push((ply, report));
            }

            let Some(node) = frontier.pop() else {
                break;
            };
            self.expand(node, strategy, &selection, &mut best_moves, &mut frontier)?;
        }

        let terminal = frontier.into_terminal();
        let mut depths = BTreeMap::new();
        for node in &terminal {
            *depths.entry(node.ply()).or_insert(0) += 1;
        }
        info!(
            "[BUILD] {} finished: {} lines, {} positions analysed. Depths: {:?}",
            strategy.name,
            terminal.len(),
            best_moves.len(),
            depths
        );

        let lines = terminal
            .into_iter()
            .map(|node| self.record(node, strategy.color))
            .collect();

        Ok(Repertoire {
            strategy: strategy.name.clone(),
            lines,
            depths,
            prunes,
        })
    }

    fn expand(
        &self,
        node: FrontierNode,
        strategy: &Strategy,
        selection: &Selection<'_>,
        best_moves: &mut BestMoveCache,
        frontier: &mut Frontier,
    ) -> RepertoireResult<()> {
        let ply = node.ply();
        if ply >= strategy.max_ply {
            frontier.terminate(node);
            return Ok(());
        }

        let key = node.key();
        let best = match best_moves.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let choice = selection.best_move(&node.position)?;
                if let Some(choice) = &choice {
                    if !choice.triggers.is_empty() {
                        debug!(
                            "[BUILD] {} chosen after fallback ({} moves scored)",
                            choice.best.uci, choice.evaluated
                        );
                    }
                }
                best_moves.insert(key, choice.map(|c| c.best.m))
            }
        };

        let Some(best) = best else {
            debug!("[BUILD] No legal move at ply {}, ending line", ply);
            frontier.terminate(node);
            return Ok(());
        };

        info!(
            "[BUILD] q: {}, ply: {}, {}",
            frontier.len(),
            ply,
            rules::notation(&node.position, best.clone())
        );

        let node = node.child(best);
        if node.ply() >= strategy.max_ply {
            frontier.terminate(node);
            return Ok(());
        }

        let table = self.table(&node.position, &strategy.source);
        let replies = opposing_moves(&node.position, &table, &self.config.opposing);
        if replies.is_empty() {
            frontier.terminate(node);
            return Ok(());
        }

        for (_, reply) in replies {
            frontier.push(node.child(reply));
        }
        Ok(())
    }

    fn seeds(&self, strategy: &Strategy) -> Vec<FrontierNode> {
        let root = FrontierNode::root(rules::initial_position());
        if strategy.color == Color::White {
            return vec![root];
        }

        if self.config.build.black_seed == BlackSeed::Explorer {
            let table = self.table(&root.position, &strategy.source);
            let first_moves = opposing_moves(&root.position, &table, &self.config.opposing);
            if !first_moves.is_empty() {
                return first_moves
                    .into_iter()
                    .map(|(_, m)| root.child(m))
                    .collect();
            }
            warn!("[BUILD] No explorer data for White's first moves, using canonical seeds");
        }

        CANONICAL_FIRST_MOVES
            .iter()
            .filter_map(|uci| rules::decode_move(&root.position, uci))
            .map(|m| root.child(m))
            .collect()
    }

    fn selection(&self, strategy: &Strategy) -> Selection<'a> {
        let heuristic = &self.config.heuristic;
        match strategy.selection {
            SelectionKind::Statistical => {
                let fallback = EngineHeuristic::at_depth(
                    self.engine,
                    self.config.fallback.depth,
                    heuristic.model,
                    heuristic.metric,
                );
                let selector = StatisticalSelector::new(
                    self.explorer,
                    strategy.source.clone(),
                    self.config,
                    fallback,
                );
                let scorer: Box<dyn Heuristic + 'a> = match strategy.heuristic {
                    HeuristicKind::Explorer => Box::new(ExplorerHeuristic::new(
                        self.explorer,
                        strategy.source.clone(),
                    )),
                    HeuristicKind::Engine => Box::new(EngineHeuristic::new(
                        self.engine,
                        heuristic.blend.clone(),
                        heuristic.model,
                        heuristic.metric,
                    )),
                    HeuristicKind::AllowOne => Box::new(AllowOneHeuristic::new(
                        self.explorer,
                        strategy.source.clone(),
                        self.engine,
                        heuristic.reply_depth,
                    )),
                };
                Selection::Statistical {
                    selector,
                    heuristic: scorer,
                }
            }
            SelectionKind::Beam => Selection::Beam(BeamSelector::new(
                self.engine,
                heuristic.model,
                heuristic.metric,
                self.config.beam.schedule.clone(),
            )),
        }
    }

    fn table(&self, position: &Chess, source: &ExplorerSource) -> MoveTable {
        self.explorer.table(
            &rules::full_encoding(position),
            source,
            self.config.build.min_reliable_games,
        )
    }

    /// Game record for a terminal node
    ///
    /// With `retract_trailing_reply`, a line ending on `color` to move loses
    /// its final opponent move.
    fn record(&self, node: FrontierNode, color: Color) -> GameRecord {
        let mut moves = node.moves;
        if self.config.build.retract_trailing_reply
            && moves.len() > 1
            && rules::side_to_move(&node.position) == color
        {
            moves.pop();
        }
        GameRecord::new(moves)
    }
}
