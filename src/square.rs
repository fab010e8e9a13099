use crate::error::ChessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board dimensions (files × ranks).
pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;

/// A board coordinate: `x` is the file (0 = a), `y` the rank (0 = rank 1).
///
/// Always on the board. Use [`Position::new`] for untrusted coordinates and
/// [`Position::offset`] to step around it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Result<Self, ChessError> {
        if (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y) {
            Ok(Position {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(ChessError::OutOfBounds { x, y })
        }
    }

    /// Index-based constructor for loops already bounded by `WIDTH`/`HEIGHT`.
    #[inline(always)]
    pub(crate) fn at(x: usize, y: usize) -> Self {
        debug_assert!(x < WIDTH && y < HEIGHT, "({x}, {y}) is off the board");
        Position {
            x: x as u8,
            y: y as u8,
        }
    }

    #[inline(always)]
    pub fn x(self) -> usize {
        self.x as usize
    }

    #[inline(always)]
    pub fn y(self) -> usize {
        self.y as usize
    }

    /// The square `(dx, dy)` away, or `None` when that leaves the board.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if (0..WIDTH as i16).contains(&x) && (0..HEIGHT as i16).contains(&y) {
            Some(Position {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    /// Every square, rank by rank from a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..HEIGHT as u8).flat_map(|y| (0..WIDTH as u8).map(move |x| Position { x, y }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.x) as char;
        write!(f, "{}{}", file, self.y + 1)
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file as usize >= WIDTH || rank as usize >= HEIGHT {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        Ok(Position { x: file, y: rank })
    }
}

impl TryFrom<(i32, i32)> for Position {
    type Error = ChessError;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        Position::new(x, y)
    }
}
