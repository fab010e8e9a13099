use super::*;
use crate::square::Position;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

#[test]
fn start_position_layout() {
    let b = Board::new();
    assert_eq!(b.pieces().count(), 32);
    assert_eq!(b.pieces_of(Team::White).count(), 16);
    assert_eq!(b.king(Team::White).unwrap().position(), sq("e1"));
    assert_eq!(b.king(Team::Black).unwrap().position(), sq("e8"));
    assert_eq!(b.occupant(sq("d8")).unwrap().kind(), PieceKind::Queen);
    assert!(b.pieces().all(|p| !p.has_moved()));
    assert_eq!(b.to_fen(), START_FEN.split(' ').next().unwrap());
    b.validate().unwrap();
}

#[test]
fn start_fen_matches_new() {
    let (parsed, to_move) = Board::from_fen(START_FEN).unwrap();
    assert_eq!(to_move, Team::White);
    assert_eq!(parsed.to_fen(), Board::new().to_fen());
    assert!(parsed.pieces().all(|p| !p.has_moved()));
}

#[test]
fn relocate_keeps_cell_and_position_together() {
    let mut b = Board::new();
    let knight = b.occupant(sq("g1")).unwrap().id();
    b.relocate(knight, sq("f3")).unwrap();

    assert!(b.is_empty(sq("g1")));
    let moved = b.occupant(sq("f3")).unwrap();
    assert_eq!(moved.id(), knight);
    assert_eq!(moved.position(), sq("f3"));
    assert_eq!(moved.previous(), Some(sq("g1")));
    b.validate().unwrap();
}

#[test]
fn relocate_onto_occupied_square_is_rejected() {
    let mut b = Board::new();
    let rook = b.occupant(sq("a1")).unwrap().id();
    assert!(matches!(
        b.relocate(rook, sq("a2")),
        Err(ChessError::Occupied(p)) if p == sq("a2")
    ));
    assert_eq!(b.piece(rook).unwrap().position(), sq("a1"));
}

#[test]
fn removing_twice_is_a_no_op() {
    let mut b = Board::new();
    let pawn = b.occupant(sq("e2")).unwrap().id();
    assert!(b.remove(pawn).is_some());
    assert!(b.remove(pawn).is_none());
    assert!(b.remove_at(sq("e2")).is_none());
    assert!(b.is_empty(sq("e2")));
    assert!(matches!(b.get(pawn), Err(ChessError::PieceMissing(_))));
}

#[test]
fn missing_king_is_reported() {
    let (b, _) = Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(matches!(b.king(Team::Black), Err(ChessError::KingMissing(Team::Black))));
    assert!(b.validate().is_err());
}

#[test]
fn fen_moved_flags_follow_castling_field() {
    let (b, to_move) = Board::from_fen("r3k2r/8/8/8/8/8/4P3/R3K2R b Kq - 0 1").unwrap();
    assert_eq!(to_move, Team::Black);
    let flag = |s: &str| b.occupant(sq(s)).unwrap().has_moved();
    assert!(!flag("e1"));
    assert!(!flag("h1"));
    assert!(flag("a1"));
    assert!(!flag("e8"));
    assert!(!flag("a8"));
    assert!(flag("h8"));
    assert!(!flag("e2"));
}

#[test]
fn fen_en_passant_field_arms_the_pawn() {
    let (b, _) = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let pawn = b.occupant(sq("d5")).unwrap();
    assert!(pawn.is_en_passant_vulnerable());
    assert_eq!(pawn.previous(), Some(sq("d7")));
    assert!(!b.occupant(sq("e5")).unwrap().is_en_passant_vulnerable());
}

#[test]
fn malformed_fen_is_rejected() {
    for fen in [
        "",
        "8/8/8/8/8/8/8 w",
        "9/8/8/8/8/8/8/8 w",
        "4x3/8/8/8/8/8/8/8 w",
        "8/8/8/8/8/8/8/8 x",
        "4k3/8/8/8/8/8/8/4K3 w - e6",
    ] {
        assert!(Board::from_fen(fen).is_err(), "accepted `{fen}`");
    }
}
