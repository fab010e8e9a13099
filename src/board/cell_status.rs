// src/board/cell_status.rs

use super::{Piece, PieceKind, Team};

/// How a square's occupant relates to a piece of the moving team.
///
/// Every move generator decides "include this square?" and "keep scanning?"
/// from this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Empty,
    SameTeam,
    OtherTeam,
    OpponentKing,
}

impl CellStatus {
    pub fn classify(occupant: Option<&Piece>, moving: Team) -> Self {
        match occupant {
            None => CellStatus::Empty,
            Some(p) if p.team() == moving => CellStatus::SameTeam,
            Some(p) if p.kind() == PieceKind::King => CellStatus::OpponentKing,
            Some(_) => CellStatus::OtherTeam,
        }
    }
}
