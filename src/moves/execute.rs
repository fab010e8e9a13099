use crate::board::{Board, CellStatus, Piece, PieceId, PieceKind, Team};
use crate::error::ChessError;
use crate::moves::movegen::{castling_rook, destinations, en_passant_victim, move_map, moves_in};
use crate::moves::square_control::{in_check, is_square_attacked};
use crate::moves::types::{CastleSide, Move};
use crate::square::Position;

/// Everything [`make_move`] changed, for the move record and the rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub mv: Move,
    pub team: Team,
    /// Where the moving piece ended up. Differs from `mv.to` when castling.
    pub landing: Position,
    pub captured: Option<Piece>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    /// Chosen kind and the id of the new piece.
    pub promotion: Option<(PieceKind, PieceId)>,
    /// A pawn advanced two squares and is now en-passant vulnerable.
    pub double_step: bool,
}

impl Applied {
    /// Id the moved piece is known by after the move.
    pub fn moved_id(&self) -> PieceId {
        self.promotion.map_or(self.mv.piece, |(_, id)| id)
    }
}

#[inline(always)]
fn castle_direction(mv: &Move) -> i8 {
    if mv.to.x() > mv.from.x() { 1 } else { -1 }
}

/// Clear the en-passant flags `team` armed on its previous turn.
fn expire_en_passant(board: &mut Board, team: Team) -> Result<(), ChessError> {
    let armed: Vec<PieceId> = board
        .pieces_of(team)
        .filter(|p| p.is_en_passant_vulnerable())
        .map(Piece::id)
        .collect();
    for id in armed {
        board.get_mut(id)?.en_passant_vulnerable = false;
    }
    Ok(())
}

/// Apply `mv` to the board.
///
/// The destination must be one the generator offers for the piece; anything
/// else (the enemy king included) is [`ChessError::UnreachableTarget`]. A
/// pawn reaching its last rank becomes `promote_to`; with `None` it stays a
/// pawn, which is what the legality check wants.
pub fn make_move(
    board: &mut Board,
    mv: Move,
    promote_to: Option<PieceKind>,
) -> Result<Applied, ChessError> {
    let piece = board.get(mv.piece)?.clone();
    if piece.position() != mv.from || piece.kind() != mv.kind {
        return Err(ChessError::Corrupted(format!(
            "move {mv} does not match {:?} on {}",
            piece.kind(),
            piece.position()
        )));
    }
    let unreachable = || ChessError::UnreachableTarget {
        kind: mv.kind,
        from: mv.from,
        to: mv.to,
    };
    if !destinations(board, &piece).contains(&mv.to) {
        return Err(unreachable());
    }

    let team = piece.team();
    expire_en_passant(board, team)?;

    let mut applied = Applied {
        mv,
        team,
        landing: mv.to,
        captured: None,
        en_passant: false,
        castle: None,
        promotion: None,
        double_step: false,
    };

    match board.status(mv.to, team) {
        CellStatus::SameTeam => {
            let rook = castling_rook(board, &piece, mv.to).ok_or_else(unreachable)?;
            let dir = castle_direction(&mv);
            let rook_to = mv.from.offset(dir, 0).ok_or_else(unreachable)?;
            let king_to = mv.from.offset(2 * dir, 0).ok_or_else(unreachable)?;
            board.relocate(rook, rook_to)?;
            board.relocate(mv.piece, king_to)?;
            board.get_mut(rook)?.has_moved = true;
            board.get_mut(mv.piece)?.has_moved = true;

            applied.landing = king_to;
            applied.castle = Some(if dir > 0 {
                CastleSide::King
            } else {
                CastleSide::Queen
            });
            return Ok(applied);
        }
        CellStatus::OpponentKing => return Err(unreachable()),
        CellStatus::OtherTeam => {
            applied.captured = board.remove_at(mv.to);
        }
        CellStatus::Empty => {
            if piece.kind() == PieceKind::Pawn && mv.to.x() != mv.from.x() {
                let victim = en_passant_victim(board, &piece, mv.to).ok_or_else(unreachable)?;
                applied.captured = board.remove(victim);
                applied.en_passant = true;
            }
        }
    }

    board.relocate(mv.piece, mv.to)?;
    let double_step = piece.kind() == PieceKind::Pawn && mv.to.y().abs_diff(mv.from.y()) == 2;
    {
        let moved = board.get_mut(mv.piece)?;
        moved.has_moved = true;
        moved.en_passant_vulnerable = double_step;
    }
    applied.double_step = double_step;

    if piece.kind() == PieceKind::Pawn
        && mv.to.y() == team.promotion_rank()
        && let Some(kind) = promote_to
    {
        let id = board.promote(mv.piece, kind)?;
        applied.promotion = Some((kind, id));
    }

    Ok(applied)
}

/// Whether `mv` leaves the mover's king unattacked.
///
/// Castling is also refused out of check and across an attacked square.
pub fn is_legal(board: &Board, mv: Move) -> Result<bool, ChessError> {
    let team = board.get(mv.piece)?.team();

    if mv.kind == PieceKind::King && board.status(mv.to, team) == CellStatus::SameTeam {
        if in_check(board, team)? {
            return Ok(false);
        }
        let crossed = mv
            .from
            .offset(castle_direction(&mv), 0)
            .ok_or(ChessError::UnreachableTarget {
                kind: mv.kind,
                from: mv.from,
                to: mv.to,
            })?;
        if is_square_attacked(board, crossed, !team) {
            return Ok(false);
        }
    }

    let mut scratch = board.clone();
    make_move(&mut scratch, mv, None)?;
    Ok(!in_check(&scratch, team)?)
}

/// Every legal move of the listed pieces.
pub fn generate_legal<I>(board: &Board, pieces: I) -> Result<Vec<Move>, ChessError>
where
    I: IntoIterator<Item = PieceId>,
{
    let map = move_map(board, pieces)?;
    let mut legal = Vec::new();
    for mv in moves_in(board, &map)? {
        if is_legal(board, mv)? {
            legal.push(mv);
        }
    }
    Ok(legal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn capture_removes_the_target() {
        let mut b = Board::new_empty();
        let rook = b.spawn(PieceKind::Rook, Team::White, sq("a1")).unwrap();
        let knight = b.spawn(PieceKind::Knight, Team::Black, sq("a6")).unwrap();
        let mv = Move::new(b.get(rook).unwrap(), sq("a6"));

        let applied = make_move(&mut b, mv, None).unwrap();
        assert_eq!(applied.captured.map(|p| p.id()), Some(knight));
        assert!(b.piece(knight).is_none());
        assert_eq!(b.occupant(sq("a6")).map(Piece::id), Some(rook));
        assert!(b.get(rook).unwrap().has_moved());
    }

    #[test]
    fn targets_outside_the_move_set_are_rejected() {
        let mut b = Board::new_empty();
        let rook = b.spawn(PieceKind::Rook, Team::White, sq("a1")).unwrap();
        b.spawn(PieceKind::King, Team::Black, sq("a8")).unwrap();

        let onto_king = Move::new(b.get(rook).unwrap(), sq("a8"));
        assert!(matches!(
            make_move(&mut b, onto_king, None),
            Err(ChessError::UnreachableTarget { .. })
        ));
        let diagonal = Move::new(b.get(rook).unwrap(), sq("b2"));
        assert!(make_move(&mut b, diagonal, None).is_err());
        assert_eq!(b.get(rook).unwrap().position(), sq("a1"));
    }

    #[test]
    fn promotion_replaces_the_pawn_in_place() {
        let mut b = Board::new_empty();
        let pawn = b.spawn(PieceKind::Pawn, Team::White, sq("c7")).unwrap();
        let mv = Move::new(b.get(pawn).unwrap(), sq("c8"));

        let applied = make_move(&mut b, mv, Some(PieceKind::Knight)).unwrap();
        let (kind, id) = applied.promotion.unwrap();
        assert_eq!(kind, PieceKind::Knight);
        assert_ne!(id, pawn);
        assert!(b.piece(pawn).is_none());
        let promoted = b.occupant(sq("c8")).unwrap();
        assert_eq!((promoted.id(), promoted.kind(), promoted.team()), (id, PieceKind::Knight, Team::White));
        assert_eq!(applied.moved_id(), id);
    }

    #[test]
    fn double_step_arms_en_passant_and_single_step_does_not() {
        let mut b = Board::new_empty();
        let far = b.spawn(PieceKind::Pawn, Team::White, sq("d2")).unwrap();
        let near = b.spawn(PieceKind::Pawn, Team::White, sq("g2")).unwrap();

        let push = Move::new(b.get(far).unwrap(), sq("d4"));
        let two = make_move(&mut b, push, None).unwrap();
        assert!(two.double_step);
        assert!(!two.en_passant);
        assert!(b.get(far).unwrap().is_en_passant_vulnerable());

        let step = Move::new(b.get(near).unwrap(), sq("g3"));
        let one = make_move(&mut b, step, None).unwrap();
        assert!(!one.double_step);
        assert!(!b.get(near).unwrap().is_en_passant_vulnerable());
        // the mover's own earlier double step expires on its next move
        assert!(!b.get(far).unwrap().is_en_passant_vulnerable());
    }

    #[test]
    fn pinned_piece_may_not_leave_the_line() {
        let mut b = Board::new_empty();
        b.spawn(PieceKind::King, Team::White, sq("e1")).unwrap();
        let bishop = b.spawn(PieceKind::Bishop, Team::White, sq("e2")).unwrap();
        b.spawn(PieceKind::Rook, Team::Black, sq("e8")).unwrap();
        b.spawn(PieceKind::King, Team::Black, sq("a8")).unwrap();

        let legal = generate_legal(&b, [bishop]).unwrap();
        assert!(legal.is_empty());
    }
}
