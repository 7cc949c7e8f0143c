//! Game records and PGN export
//!
//! Each finished line becomes a [`GameRecord`] rendered as a PGN game with
//! the seven-tag roster and an unknown result:
//!
//! ```text
//! [Event "licw"]
//! [Site "?"]
//! [Date "????.??.??"]
//! [Round "?"]
//! [White "?"]
//! [Black "?"]
//! [Result "*"]
//!
//! 1. e4 e5 2. Nf3 *
//! ```

use crate::rules;
use shakmaty::{Chess, Move};

/// Movetext lines are wrapped before this column
const LINE_WIDTH: usize = 80;

/// A line of play from the standard starting position
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub moves: Vec<Move>,
}

impl GameRecord {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// SAN for every move, replayed from the start position
    pub fn san(&self) -> Vec<String> {
        let mut position: Chess = rules::initial_position();
        let mut sans = Vec::with_capacity(self.moves.len());
        for m in &self.moves {
            sans.push(rules::notation(&position, m.clone()));
            position = rules::apply(&position, m.clone());
        }
        sans
    }

    /// Numbered movetext ending in `*`, without wrapping
    pub fn movetext(&self) -> String {
        self.tokens().join(" ")
    }

    pub fn to_pgn(&self, event: &str) -> String {
        let mut pgn = String::new();
        for (tag, value) in [
            ("Event", event),
            ("Site", "?"),
            ("Date", "????.??.??"),
            ("Round", "?"),
            ("White", "?"),
            ("Black", "?"),
            ("Result", "*"),
        ] {
            pgn.push_str(&format!("[{} \"{}\"]\n", tag, escape(value)));
        }
        pgn.push('\n');

        let mut line = String::new();
        for token in self.tokens() {
            if !line.is_empty() && line.len() + 1 + token.len() >= LINE_WIDTH {
                pgn.push_str(&line);
                pgn.push('\n');
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&token);
        }
        pgn.push_str(&line);
        pgn.push('\n');
        pgn
    }

    fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for (index, san) in self.san().into_iter().enumerate() {
            if index % 2 == 0 {
                tokens.push(format!("{}.", index / 2 + 1));
            }
            tokens.push(san);
        }
        tokens.push("*".to_string());
        tokens
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render every record, separated by blank lines
pub fn write_games(records: &[GameRecord], event: &str) -> String {
    records
        .iter()
        .map(|record| record.to_pgn(event))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &[&str]) -> GameRecord {
        let mut position = rules::initial_position();
        let mut moves = Vec::new();
        for uci in line {
            let m = rules::decode_move(&position, uci).unwrap();
            position = rules::apply(&position, m.clone());
            moves.push(m);
        }
        GameRecord::new(moves)
    }

    #[test]
    fn test_movetext_numbers_moves() {
        let game = record(&["e2e4", "e7e5", "g1f3"]);
        assert_eq!(game.movetext(), "1. e4 e5 2. Nf3 *");
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(GameRecord::new(Vec::new()).movetext(), "*");
    }

    #[test]
    fn test_pgn_has_seven_tag_roster() {
        let pgn = record(&["d2d4", "d7d5"]).to_pgn("licw");
        let lines: Vec<&str> = pgn.lines().collect();
        assert_eq!(lines[0], "[Event \"licw\"]");
        assert_eq!(lines[6], "[Result \"*\"]");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "1. d4 d5 *");
    }

    #[test]
    fn test_long_lines_wrap() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let line: Vec<&str> = shuffle.iter().copied().cycle().take(40).collect();
        let pgn = record(&line).to_pgn("wrap");
        assert!(pgn.lines().all(|l| l.len() < LINE_WIDTH), "{}", pgn);
        assert!(pgn.trim_end().ends_with('*'));
    }

    #[test]
    fn test_games_separated_by_blank_line() {
        let games = [record(&["e2e4"]), record(&["d2d4"])];
        let out = write_games(&games, "test");
        assert!(out.contains("1. e4 *\n\n[Event \"test\"]"));
    }

    #[test]
    fn test_tag_values_are_escaped() {
        let pgn = record(&[]).to_pgn("a \"quoted\" name");
        assert!(pgn.starts_with("[Event \"a \\\"quoted\\\" name\"]"));
    }
}
