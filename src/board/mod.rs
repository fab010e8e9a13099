mod fen;
mod fen_tables;

pub mod cell_status;
pub use cell_status::CellStatus;

use crate::error::ChessError;
use crate::square::{HEIGHT, Position, WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back rank from the a-file to the h-file.
const BACK_RANK: [PieceKind; WIDTH] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Kinds a pawn may promote to.
pub const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Team {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Handle of a piece in the board's slab. Promotion allocates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u16);

impl PieceId {
    #[inline(always)]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece on the board.
///
/// `position` is only written by [`Board`], together with the grid cell, so
/// the two never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    team: Team,
    position: Position,
    previous: Option<Position>,
    pub(crate) has_moved: bool,
    pub(crate) en_passant_vulnerable: bool,
}

impl Piece {
    #[inline(always)]
    pub fn id(&self) -> PieceId {
        self.id
    }
    #[inline(always)]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }
    #[inline(always)]
    pub fn team(&self) -> Team {
        self.team
    }
    #[inline(always)]
    pub fn position(&self) -> Position {
        self.position
    }
    /// Square the piece stood on before its last move.
    pub fn previous(&self) -> Option<Position> {
        self.previous
    }
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
    /// Set for one opponent turn after a pawn double step.
    pub fn is_en_passant_vulnerable(&self) -> bool {
        self.en_passant_vulnerable
    }
}

/// Fixed 8×8 grid plus the pieces it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<PieceId>; HEIGHT]; WIDTH],
    pieces: Vec<Option<Piece>>,
}

impl Board {
    /// A board with no pieces.
    pub fn new_empty() -> Self {
        Board {
            cells: [[None; HEIGHT]; WIDTH],
            pieces: Vec::with_capacity(40),
        }
    }

    /// The standard starting layout, nothing moved yet.
    pub fn new() -> Self {
        let mut b = Board::new_empty();
        for team in [Team::White, Team::Black] {
            for (x, &kind) in BACK_RANK.iter().enumerate() {
                b.insert(kind, team, Position::at(x, team.home_rank()));
            }
            for x in 0..WIDTH {
                b.insert(PieceKind::Pawn, team, Position::at(x, team.pawn_rank()));
            }
        }
        b
    }

    /// Unchecked placement. Callers guarantee `pos` is empty.
    fn insert(&mut self, kind: PieceKind, team: Team, pos: Position) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Some(Piece {
            id,
            kind,
            team,
            position: pos,
            previous: None,
            has_moved: false,
            en_passant_vulnerable: false,
        }));
        self.cells[pos.x()][pos.y()] = Some(id);
        id
    }

    /// Create a new piece on an empty square.
    pub fn spawn(&mut self, kind: PieceKind, team: Team, pos: Position) -> Result<PieceId, ChessError> {
        if self.cells[pos.x()][pos.y()].is_some() {
            return Err(ChessError::Occupied(pos));
        }
        Ok(self.insert(kind, team, pos))
    }

    #[inline(always)]
    pub fn occupant(&self, pos: Position) -> Option<&Piece> {
        self.cells[pos.x()][pos.y()].and_then(|id| self.piece(id))
    }

    #[inline(always)]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cells[pos.x()][pos.y()].is_none()
    }

    /// Classify `pos` relative to a piece of `team` that wants to move there.
    #[inline(always)]
    pub fn status(&self, pos: Position, team: Team) -> CellStatus {
        CellStatus::classify(self.occupant(pos), team)
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).and_then(Option::as_ref)
    }

    /// Like [`Board::piece`], but a missing piece is an error.
    pub fn get(&self, id: PieceId) -> Result<&Piece, ChessError> {
        self.piece(id).ok_or(ChessError::PieceMissing(id))
    }

    pub(crate) fn get_mut(&mut self, id: PieceId) -> Result<&mut Piece, ChessError> {
        self.pieces
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(ChessError::PieceMissing(id))
    }

    /// Move a piece to an empty square, remembering where it came from.
    pub fn relocate(&mut self, id: PieceId, to: Position) -> Result<(), ChessError> {
        match self.cells[to.x()][to.y()] {
            Some(other) if other != id => return Err(ChessError::Occupied(to)),
            _ => {}
        }
        let piece = self.get_mut(id)?;
        let from = piece.position;
        piece.previous = Some(from);
        piece.position = to;
        self.cells[from.x()][from.y()] = None;
        self.cells[to.x()][to.y()] = Some(id);
        Ok(())
    }

    /// Take a piece off the board. Removing an absent piece does nothing.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.get_mut(id.index())?.take()?;
        let pos = piece.position;
        if self.cells[pos.x()][pos.y()] == Some(id) {
            self.cells[pos.x()][pos.y()] = None;
        }
        Some(piece)
    }

    /// Replace a piece with a fresh one of `kind` on the same square.
    pub(crate) fn promote(&mut self, id: PieceId, kind: PieceKind) -> Result<PieceId, ChessError> {
        let old = self.remove(id).ok_or(ChessError::PieceMissing(id))?;
        let new_id = self.insert(kind, old.team, old.position);
        let piece = self.get_mut(new_id)?;
        piece.previous = old.previous;
        piece.has_moved = true;
        Ok(new_id)
    }

    pub fn remove_at(&mut self, pos: Position) -> Option<Piece> {
        let id = self.cells[pos.x()][pos.y()]?;
        self.remove(id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }

    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.team == team)
    }

    /// The king of `team`. Its absence means the board is corrupted.
    pub fn king(&self, team: Team) -> Result<&Piece, ChessError> {
        self.pieces_of(team)
            .find(|p| p.kind == PieceKind::King)
            .ok_or(ChessError::KingMissing(team))
    }

    /// Check that every live piece sits on the cell that references it and
    /// each team has exactly one king.
    pub fn validate(&self) -> Result<(), ChessError> {
        for pos in Position::all() {
            if let Some(id) = self.cells[pos.x()][pos.y()] {
                let piece = self.get(id)?;
                if piece.position != pos {
                    return Err(ChessError::Corrupted(format!(
                        "{:?} is referenced from {} but stores {}",
                        id, pos, piece.position
                    )));
                }
            }
        }
        for piece in self.pieces() {
            let pos = piece.position;
            if self.cells[pos.x()][pos.y()] != Some(piece.id) {
                return Err(ChessError::Corrupted(format!(
                    "{:?} claims {} but the cell disagrees",
                    piece.id, pos
                )));
            }
        }
        for team in [Team::White, Team::Black] {
            let kings = self
                .pieces_of(team)
                .filter(|p| p.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(ChessError::KingMissing(team)),
                1 => {}
                n => {
                    return Err(ChessError::Corrupted(format!(
                        "{:?} has {} kings",
                        team, n
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Team {
    pub fn opposite(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Rank direction pawns of this team advance in.
    #[inline(always)]
    pub fn forward(self) -> i8 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }

    /// Rank holding the king and rooks at the start.
    pub fn home_rank(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => HEIGHT - 1,
        }
    }

    /// Rank pawns start on.
    pub fn pawn_rank(self) -> usize {
        match self {
            Team::White => 1,
            Team::Black => HEIGHT - 2,
        }
    }

    /// Rank on which this team's pawns promote.
    pub fn promotion_rank(self) -> usize {
        self.opposite().home_rank()
    }
}

impl std::ops::Not for Team {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => f.write_str("white"),
            Team::Black => f.write_str("black"),
        }
    }
}

impl PieceKind {
    /// Letter used in move text; pawns have none.
    pub fn letter(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl FromStr for Board {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s).map(|(board, _)| board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests;
