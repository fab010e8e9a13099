use crate::board::{Board, Piece, PieceId, PieceKind, Team};
use crate::error::ChessError;
use crate::moves::rays::{
    ALL_DIRECTIONS, DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL, Reach, UNBOUNDED, leap, slide,
};
use crate::moves::types::{Destinations, MoveMap};
use crate::square::Position;

/// Squares `piece` controls from where it stands.
///
/// Differs from [`crate::moves::movegen::destinations`] in three ways: the
/// first blocker of either side is included (kings too), pawns control only
/// their forward diagonals, and `through` is treated as an empty square.
/// Passing the defending king as `through` shows the squares behind it on a
/// checking ray.
pub fn attacks_from(board: &Board, piece: &Piece, through: Option<Position>) -> Destinations {
    let mut out = Destinations::new();
    let (from, team) = (piece.position(), piece.team());
    let reach = Reach::Attacks { through };

    match piece.kind() {
        PieceKind::Rook => slide(board, from, team, &ORTHOGONAL, UNBOUNDED, reach, &mut out),
        PieceKind::Bishop => slide(board, from, team, &DIAGONAL, UNBOUNDED, reach, &mut out),
        PieceKind::Queen => {
            slide(board, from, team, &ORTHOGONAL, UNBOUNDED, reach, &mut out);
            slide(board, from, team, &DIAGONAL, UNBOUNDED, reach, &mut out);
        }
        PieceKind::Knight => leap(board, from, team, &KNIGHT_JUMPS, reach, &mut out),
        PieceKind::King => slide(board, from, team, &ALL_DIRECTIONS, 1, reach, &mut out),
        PieceKind::Pawn => {
            let forward = team.forward();
            out.extend([-1, 1].into_iter().filter_map(|dx| from.offset(dx, forward)));
        }
    }
    out
}

/// Attack sets of every listed piece.
pub fn attack_map<I>(board: &Board, pieces: I, through: Option<Position>) -> Result<MoveMap, ChessError>
where
    I: IntoIterator<Item = PieceId>,
{
    pieces
        .into_iter()
        .map(|id| {
            let piece = board.get(id)?;
            Ok((id, attacks_from(board, piece, through)))
        })
        .collect()
}

/// Whether any piece of `attacker` controls `square`.
pub fn is_square_attacked(board: &Board, square: Position, attacker: Team) -> bool {
    board
        .pieces_of(attacker)
        .any(|p| attacks_from(board, p, None).contains(&square))
}

/// Pieces of `attacker` that control `square`.
pub fn attackers_of(board: &Board, square: Position, attacker: Team) -> Vec<PieceId> {
    board
        .pieces_of(attacker)
        .filter(|p| attacks_from(board, p, None).contains(&square))
        .map(Piece::id)
        .collect()
}

/// Whether `team`'s king is attacked.
pub fn in_check(board: &Board, team: Team) -> Result<bool, ChessError> {
    let king = board.king(team)?.position();
    Ok(is_square_attacked(board, king, !team))
}
