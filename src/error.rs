use crate::board::{PieceId, PieceKind, Team};
use crate::square::Position;

/// Errors raised by board setup, move application and turn coordination.
///
/// `OutOfBounds`, `InvalidFen` and `InvalidSquare` are precondition failures on
/// caller input. `KingMissing`, `PieceMissing`, `Corrupted` and
/// `UnreachableTarget` mean the board no longer satisfies its own invariants;
/// they are fatal and the coordinator ends the game when it sees one.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("coordinates ({x}, {y}) are outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("no king found for {0:?}")]
    KingMissing(Team),

    #[error("piece {0:?} is not on the board")]
    PieceMissing(PieceId),

    #[error("square {0} is already occupied")]
    Occupied(Position),

    #[error("{kind:?} on {from} cannot move to {to}")]
    UnreachableTarget {
        kind: PieceKind,
        from: Position,
        to: Position,
    },

    #[error("board corrupted: {0}")]
    Corrupted(String),

    #[error("it is not {0:?}'s turn")]
    OutOfTurn(Team),

    #[error("turn wait interrupted: {0}")]
    Interrupted(String),

    #[error("transcript i/o failed")]
    Io(#[from] std::io::Error),

    #[error("transcript encoding failed")]
    Encoding(#[from] bincode::Error),
}
