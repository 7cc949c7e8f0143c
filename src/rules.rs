//! Rules engine facade
//!
//! Thin wrappers over `shakmaty` so the rest of the crate speaks in terms of
//! positions, moves and string keys:
//!
//! - **Canonical key**: FEN without the halfmove/fullmove counters. Two move
//!   orders reaching the same placement, side to move, castling rights and
//!   en passant square share a key.
//! - **Full encoding**: complete FEN, used for explorer and engine lookups.
//! - **Move encoding**: UCI (`e2e4`, `e7e8q`), reversible against the
//!   position it was played from.

use crate::core::{RepertoireError, RepertoireResult};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

/// Standard starting position
pub fn initial_position() -> Chess {
    Chess::default()
}

/// Parse a FEN into a legal position
pub fn from_fen(fen: &str) -> RepertoireResult<Chess> {
    let invalid = |message: String| RepertoireError::InvalidPosition {
        fen: fen.to_string(),
        message,
    };
    let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{}", e)))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{}", e)))
}

pub fn legal_moves(position: &Chess) -> Vec<Move> {
    position.legal_moves().into_iter().collect()
}

/// Play `m` on a copy of `position`
///
/// `m` must be legal in `position`; every move handed around in this crate
/// comes from [`legal_moves`] or [`decode_move`].
pub fn apply(position: &Chess, m: Move) -> Chess {
    let mut next = position.clone();
    next.play_unchecked(m);
    next
}

pub fn is_checkmate(position: &Chess) -> bool {
    position.is_checkmate()
}

pub fn side_to_move(position: &Chess) -> Color {
    position.turn()
}

/// Half-moves played since the start of the game
pub fn ply(position: &Chess) -> u32 {
    let full = position.fullmoves().get() - 1;
    full * 2 + u32::from(position.turn() == Color::Black)
}

pub fn full_encoding(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

pub fn canonical_key(position: &Chess) -> String {
    let fen = full_encoding(position);
    fen.split(' ').take(4).collect::<Vec<_>>().join(" ")
}

pub fn encode_move(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

/// Decode a UCI string against `position`, rejecting illegal moves
pub fn decode_move(position: &Chess, uci: &str) -> Option<Move> {
    let parsed: UciMove = uci.parse().ok()?;
    parsed.to_move(position).ok()
}

/// SAN for `m` in `position`, with `+` or `#` suffix
pub fn notation(position: &Chess, m: Move) -> String {
    SanPlus::from_move(position.clone(), m).to_string()
}
