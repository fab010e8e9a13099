use crate::board::{Piece, PieceId, PieceKind};
use crate::square::Position;
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Upper bound on one piece's destinations; a centralised queen reaches 27.
pub const MAX_DESTINATIONS: usize = 32;

pub type Destinations = ArrayVec<Position, MAX_DESTINATIONS>;

/// Piece → destinations, computed fresh from one board state. Never updated
/// in place; recompute after the board changes.
pub type MoveMap = BTreeMap<PieceId, Destinations>;

/// Every square reached by any piece in `map`.
pub fn covered(map: &MoveMap) -> BTreeSet<Position> {
    map.values().flat_map(|d| d.iter().copied()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub from: Position,
    /// For castling this is the rook's square, not the king's landing square.
    pub to: Position,
}

impl Move {
    pub fn new(piece: &Piece, to: Position) -> Self {
        Move {
            piece: piece.id(),
            kind: piece.kind(),
            from: piece.position(),
            to,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.kind.letter(), self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleSide {
    /// Toward the h-file.
    King,
    /// Toward the a-file.
    Queen,
}
