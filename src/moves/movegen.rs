use crate::board::{Board, CellStatus, Piece, PieceId, PieceKind};
use crate::error::ChessError;
use crate::moves::rays::{
    ALL_DIRECTIONS, DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL, Reach, UNBOUNDED, leap, slide,
};
use crate::moves::types::{Destinations, Move, MoveMap};
use crate::square::Position;

/// Castling needs the king's two-square landing strictly between king and rook.
const MIN_CASTLING_DISTANCE: usize = 3;

/// Destinations for one piece on the current board.
///
/// Geometry only: the result never contains a same-team square or the enemy
/// king, but may leave the mover's own king attacked. See
/// [`crate::moves::execute::is_legal`] for the king-safety filter.
pub fn destinations(board: &Board, piece: &Piece) -> Destinations {
    let mut out = Destinations::new();
    let (from, team) = (piece.position(), piece.team());

    match piece.kind() {
        PieceKind::Rook => slide(board, from, team, &ORTHOGONAL, UNBOUNDED, Reach::Moves, &mut out),
        PieceKind::Bishop => slide(board, from, team, &DIAGONAL, UNBOUNDED, Reach::Moves, &mut out),
        PieceKind::Queen => {
            slide(board, from, team, &ORTHOGONAL, UNBOUNDED, Reach::Moves, &mut out);
            slide(board, from, team, &DIAGONAL, UNBOUNDED, Reach::Moves, &mut out);
        }
        PieceKind::Knight => leap(board, from, team, &KNIGHT_JUMPS, Reach::Moves, &mut out),
        PieceKind::King => {
            slide(board, from, team, &ALL_DIRECTIONS, 1, Reach::Moves, &mut out);
            if !piece.has_moved() {
                castling_candidates(board, piece, &mut out);
            }
        }
        PieceKind::Pawn => pawn_destinations(board, piece, &mut out),
    }
    out
}

fn pawn_destinations(board: &Board, pawn: &Piece, out: &mut Destinations) {
    let from = pawn.position();
    let team = pawn.team();
    let forward = team.forward();

    if let Some(one) = from.offset(0, forward)
        && board.is_empty(one)
    {
        out.push(one);
        if !pawn.has_moved()
            && let Some(two) = one.offset(0, forward)
            && board.is_empty(two)
        {
            out.push(two);
        }
    }

    for dx in [-1, 1] {
        let Some(to) = from.offset(dx, forward) else {
            continue;
        };
        match board.status(to, team) {
            CellStatus::OtherTeam => out.push(to),
            CellStatus::Empty if en_passant_victim(board, pawn, to).is_some() => out.push(to),
            _ => {}
        }
    }
}

/// The pawn an en-passant move of `pawn` onto `to` would take: an opponent
/// pawn beside `pawn` on `to`'s file that double-stepped last turn.
pub fn en_passant_victim(board: &Board, pawn: &Piece, to: Position) -> Option<PieceId> {
    let from = pawn.position();
    if pawn.kind() != PieceKind::Pawn || to.x() == from.x() || !board.is_empty(to) {
        return None;
    }
    let beside = from.offset(to.x() as i8 - from.x() as i8, 0)?;
    match board.occupant(beside) {
        Some(victim)
            if victim.kind() == PieceKind::Pawn
                && victim.team() != pawn.team()
                && victim.is_en_passant_vulnerable() =>
        {
            Some(victim.id())
        }
        _ => None,
    }
}

/// Scan the king's rank both ways to the first occupied square; an unmoved
/// rook of the same team there is a castling candidate (its own square).
fn castling_candidates(board: &Board, king: &Piece, out: &mut Destinations) {
    for dx in [-1i8, 1] {
        let mut cur = king.position();
        let mut distance = 0;
        while let Some(next) = cur.offset(dx, 0) {
            distance += 1;
            if let Some(p) = board.occupant(next) {
                if p.team() == king.team()
                    && p.kind() == PieceKind::Rook
                    && !p.has_moved()
                    && distance >= MIN_CASTLING_DISTANCE
                {
                    out.push(next);
                }
                break;
            }
            cur = next;
        }
    }
}

/// The rook a king move onto `to` castles with, if that move is a castle.
pub fn castling_rook(board: &Board, king: &Piece, to: Position) -> Option<PieceId> {
    if king.kind() != PieceKind::King || king.has_moved() {
        return None;
    }
    let mut candidates = Destinations::new();
    castling_candidates(board, king, &mut candidates);
    if candidates.contains(&to) {
        board.occupant(to).map(Piece::id)
    } else {
        None
    }
}

/// Destinations of every listed piece.
pub fn move_map<I>(board: &Board, pieces: I) -> Result<MoveMap, ChessError>
where
    I: IntoIterator<Item = PieceId>,
{
    pieces
        .into_iter()
        .map(|id| {
            let piece = board.get(id)?;
            Ok((id, destinations(board, piece)))
        })
        .collect()
}

/// Flatten a move map into individual moves.
pub fn moves_in(board: &Board, map: &MoveMap) -> Result<Vec<Move>, ChessError> {
    let mut moves = Vec::with_capacity(64);
    for (&id, dests) in map {
        let piece = board.get(id)?;
        moves.extend(dests.iter().map(|&to| Move::new(piece, to)));
    }
    Ok(moves)
}
