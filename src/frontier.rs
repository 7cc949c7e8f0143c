//! Frontier of positions awaiting expansion
//!
//! Each [`FrontierNode`] carries its position and the moves that led to it
//! from the root. The frontier is a deque whose discipline is chosen by
//! [`FrontierOrder`]; nodes leaving the tree go to the terminal set, which
//! records the order in which lines finished.
//!
//! # Pruning
//!
//! [`Frontier::prune`] keeps the tree from growing exponentially:
//!
//! 1. The first node with a given canonical key is kept, later
//!    transpositions become terminal.
//! 2. Nodes whose sample weight is below the reliability threshold become
//!    terminal.
//! 3. The heaviest `width` nodes stay, the rest become terminal.
//!
//! No node is ever dropped: `kept + unreliable + truncated` equals the
//! number of distinct keys seen.

use crate::rules;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};
use std::collections::{HashSet, VecDeque};
use tracing::info;

/// A position in the tree plus the line that reached it
#[derive(Debug, Clone)]
pub struct FrontierNode {
    pub position: Chess,
    pub moves: Vec<Move>,
}

impl FrontierNode {
    pub fn root(position: Chess) -> Self {
        Self {
            position,
            moves: Vec::new(),
        }
    }

    /// Node after playing `m`, owning an independent copy of the line
    pub fn child(&self, m: Move) -> Self {
        let position = rules::apply(&self.position, m.clone());
        let mut moves = self.moves.clone();
        moves.push(m);
        Self { position, moves }
    }

    pub fn ply(&self) -> u32 {
        rules::ply(&self.position)
    }

    pub fn key(&self) -> String {
        rules::canonical_key(&self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierOrder {
    /// Push front, pop back: one ply band drains before the next starts
    #[default]
    Breadth,
    /// Push back, pop back: stack order
    Depth,
}

/// How a prune call split the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneReport {
    pub kept: usize,
    pub duplicates: usize,
    pub unreliable: usize,
    pub truncated: usize,
}

impl PruneReport {
    /// Distinct positions that went into the prune
    pub fn deduplicated(&self) -> usize {
        self.kept + self.unreliable + self.truncated
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierNode>,
    terminal: Vec<FrontierNode>,
    order: FrontierOrder,
    last_ply: Option<u32>,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn push(&mut self, node: FrontierNode) {
        match self.order {
            FrontierOrder::Breadth => self.queue.push_front(node),
            FrontierOrder::Depth => self.queue.push_back(node),
        }
    }

    pub fn pop(&mut self) -> Option<FrontierNode> {
        self.queue.pop_back()
    }

    /// Ply of the node [`pop`](Self::pop) would return
    pub fn peek_ply(&self) -> Option<u32> {
        self.queue.back().map(FrontierNode::ply)
    }

    /// Record `ply` as the current band
    ///
    /// Returns `true` when it differs from the previously observed ply.
    pub fn observe_ply(&mut self, ply: u32) -> bool {
        let changed = self.last_ply != Some(ply);
        self.last_ply = Some(ply);
        changed
    }

    pub fn terminate(&mut self, node: FrontierNode) {
        self.terminal.push(node);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn terminal(&self) -> &[FrontierNode] {
        &self.terminal
    }

    pub fn into_terminal(self) -> Vec<FrontierNode> {
        self.terminal
    }

    /// Shrink the frontier to at most `width` nodes
    ///
    /// `weigh` gives each distinct position its sample weight. Survivors are
    /// left in descending weight order, heaviest next to pop; ties keep their
    /// pop order.
    pub fn prune<F>(&mut self, width: usize, min_weight: u64, mut weigh: F) -> PruneReport
    where
        F: FnMut(&FrontierNode) -> u64,
    {
        let before = self.queue.len();
        let mut report = PruneReport::default();
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(before);

        // Walk in pop order so the node that would be expanded first wins
        while let Some(node) = self.queue.pop_back() {
            if !seen.insert(node.key()) {
                report.duplicates += 1;
                self.terminal.push(node);
                continue;
            }
            let weight = weigh(&node);
            if weight < min_weight {
                report.unreliable += 1;
                self.terminal.push(node);
                continue;
            }
            candidates.push((weight, node));
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        for (index, (_, node)) in candidates.into_iter().enumerate() {
            if index < width {
                report.kept += 1;
                // Heaviest ends up at the back
                self.queue.push_front(node);
            } else {
                report.truncated += 1;
                self.terminal.push(node);
            }
        }

        info!(
            "[PRUNE] {} -> {} (duplicates {}, unreliable {}, truncated {})",
            before, report.kept, report.duplicates, report.unreliable, report.truncated
        );

        report
    }
}
