//! Engine scores and win/draw/loss conversion
//!
//! A UCI engine reports scores relative to the side to move. [`PovScore`]
//! pins a [`Score`] to that side so it can be read from either player's
//! point of view, and [`Score::wdl`] turns it into an expected
//! win/draw/loss split out of 1000 games.
//!
//! # Models
//!
//! | Model     | Source                                   | Draws |
//! |-----------|------------------------------------------|-------|
//! | `Lichess` | Lichess logistic fit, ply independent    | never |
//! | `Sf12`    | Stockfish 12 fit, sharpens with game ply | yes   |

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::ops::Neg;

/// Score relative to some side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns
    Cp(i32),
    /// Mate in `n` moves; `n <= 0` means the scored side is getting mated
    Mate(i32),
    /// The scored side has already delivered mate
    MateGiven,
}

impl Score {
    pub fn is_mate(self) -> bool {
        matches!(self, Score::Mate(_) | Score::MateGiven)
    }

    /// Expected results out of 1000 games under `model` at `ply`
    pub fn wdl(self, model: WdlModel, ply: u32) -> Wdl {
        match (model, self) {
            (_, Score::MateGiven) => Wdl::new(1000, 0, 0),
            (WdlModel::Lichess, Score::Cp(cp)) => {
                let wins = lichess_raw_wins(cp.clamp(-1000, 1000));
                Wdl::new(wins, 0, 1000 - wins)
            }
            (WdlModel::Lichess, Score::Mate(moves)) => {
                let cp = (21 - moves.abs().min(10)) * 100;
                let wins = lichess_raw_wins(cp);
                if moves > 0 {
                    Wdl::new(wins, 0, 1000 - wins)
                } else {
                    Wdl::new(1000 - wins, 0, wins)
                }
            }
            (WdlModel::Sf12, Score::Cp(cp)) => {
                let wins = sf12_wins(cp, ply);
                let losses = sf12_wins(-cp, ply);
                Wdl::new(wins, 1000u32.saturating_sub(wins + losses), losses)
            }
            (WdlModel::Sf12, Score::Mate(moves)) => {
                if moves > 0 {
                    Wdl::new(1000, 0, 0)
                } else {
                    Wdl::new(0, 0, 1000)
                }
            }
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        match self {
            Score::Cp(cp) => Score::Cp(-cp),
            Score::Mate(0) => Score::MateGiven,
            Score::Mate(moves) => Score::Mate(-moves),
            Score::MateGiven => Score::Mate(0),
        }
    }
}

fn lichess_raw_wins(cp: i32) -> u32 {
    (1000.0 / (1.0 + (-0.00368208 * f64::from(cp)).exp())).round() as u32
}

fn sf12_wins(cp: i32, ply: u32) -> u32 {
    let m = f64::from(ply.min(240)) / 64.0;
    let a = (((-8.24404295 * m) + 64.23892342) * m - 95.73056462) * m + 153.86478679;
    let b = (((-3.37154371 * m) + 28.44489198) * m - 56.67657741) * m + 72.05858751;
    let x = f64::from(cp.clamp(-1000, 1000));
    (0.5 + 1000.0 / (1.0 + ((a - x) / b).exp())) as u32
}

/// A score together with the side it is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PovScore {
    relative: Score,
    turn: Color,
}

impl PovScore {
    /// Wrap a score reported relative to `turn`, the side to move
    pub fn new(relative: Score, turn: Color) -> Self {
        Self { relative, turn }
    }

    pub fn relative(&self) -> Score {
        self.relative
    }

    /// The score from `side`'s point of view
    pub fn from_side(&self, side: Color) -> Score {
        if side == self.turn {
            self.relative
        } else {
            -self.relative
        }
    }

    pub fn white(&self) -> Score {
        self.from_side(Color::White)
    }

    pub fn is_mate(&self) -> bool {
        self.relative.is_mate()
    }
}

/// Named win/draw/loss model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WdlModel {
    #[default]
    Lichess,
    Sf12,
}

/// Expected wins, draws and losses per 1000 games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wdl {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Wdl {
    pub fn new(wins: u32, draws: u32, losses: u32) -> Self {
        Self {
            wins,
            draws,
            losses,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn winning_chance(&self) -> f64 {
        self.ratio(self.wins)
    }

    pub fn drawing_chance(&self) -> f64 {
        self.ratio(self.draws)
    }

    pub fn losing_chance(&self) -> f64 {
        self.ratio(self.losses)
    }

    /// Expected points, counting a draw as half a win
    pub fn expectation(&self) -> f64 {
        self.winning_chance() + self.drawing_chance() / 2.0
    }

    fn ratio(&self, part: u32) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(part) / f64::from(total),
        }
    }
}
