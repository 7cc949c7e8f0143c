//! Opponent replies to branch into

use crate::core::OpposingConfig;
use crate::rules;
use opening_explorer::MoveTable;
use shakmaty::{Chess, Move};

/// Replies to `position` the repertoire has to answer
///
/// Popular replies (share above `min_share` or more than `popular_count`
/// games) are kept. If fewer than `min_count` qualify, the `min_count` most
/// played replies are used instead so a strict filter cannot cut the tree
/// to nothing. The result is ordered by share and capped at `max_moves`.
///
/// Replies that are not legal in `position` are dropped.
pub fn opposing_moves(
    position: &Chess,
    table: &MoveTable,
    config: &OpposingConfig,
) -> Vec<(String, Move)> {
    let by_share = table.by_share();
    let popular: Vec<_> = by_share
        .iter()
        .copied()
        .filter(|m| m.share > config.min_share || m.count > config.popular_count)
        .collect();

    let chosen = if popular.len() < config.min_count {
        by_share.into_iter().take(config.min_count).collect()
    } else {
        popular
    };

    chosen
        .into_iter()
        .filter_map(|stats| {
            rules::decode_move(position, &stats.uci).map(|m| (stats.uci.clone(), m))
        })
        .take(config.max_moves)
        .collect()
}
