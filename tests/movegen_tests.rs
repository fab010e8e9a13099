//! tests/movegen_tests.rs
//! Destination sets per piece kind, plus generator invariants over random play.
use autochess::board::{Board, CellStatus, PieceKind, Team};
use autochess::config::GameConfig;
use autochess::game::{GameState, TurnOutcome};
use autochess::moves::movegen::{destinations, move_map};
use autochess::record::MoveRecord;
use autochess::square::Position;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn names(board: &Board, at: &str) -> Vec<String> {
    let piece = board.occupant(sq(at)).expect("piece on square");
    let mut out: Vec<String> = destinations(board, piece)
        .iter()
        .map(|p| p.to_string())
        .collect();
    out.sort();
    out
}

#[test]
fn rook_stops_before_friend_and_on_enemy() {
    let mut b = Board::new_empty();
    b.spawn(PieceKind::Rook, Team::White, sq("a1")).unwrap();
    b.spawn(PieceKind::Pawn, Team::White, sq("a3")).unwrap();
    b.spawn(PieceKind::Knight, Team::Black, sq("c1")).unwrap();
    assert_eq!(names(&b, "a1"), ["a2", "b1", "c1"]);
}

#[test]
fn queen_on_open_board_reaches_27_squares() {
    let mut b = Board::new_empty();
    b.spawn(PieceKind::Queen, Team::White, sq("d4")).unwrap();
    assert_eq!(names(&b, "d4").len(), 27);
}

#[test]
fn knight_in_corner_and_centre() {
    let mut b = Board::new_empty();
    b.spawn(PieceKind::Knight, Team::White, sq("a1")).unwrap();
    b.spawn(PieceKind::Knight, Team::White, sq("e4")).unwrap();
    b.spawn(PieceKind::Pawn, Team::White, sq("f6")).unwrap();
    assert_eq!(names(&b, "a1"), ["b3", "c2"]);
    assert_eq!(names(&b, "e4").len(), 7);
}

#[test]
fn pawn_pushes_and_captures() {
    let b: Board = "4k3/8/8/8/8/3p1n2/4P3/4K3".parse().unwrap();
    assert_eq!(names(&b, "e2"), ["d3", "e3", "e4", "f3"]);

    let blocked: Board = "4k3/8/8/8/4n3/8/4P3/4K3".parse().unwrap();
    assert_eq!(names(&blocked, "e2"), ["e3"]);

    let moved: Board = "4k3/8/8/8/8/4P3/8/4K3".parse().unwrap();
    assert_eq!(names(&moved, "e3"), ["e4"]);
}

#[test]
fn no_generator_targets_the_enemy_king() {
    let b: Board = "8/8/8/3k4/8/3R4/2P5/3K4 w - - 0 1".parse().unwrap();
    assert!(!names(&b, "d3").contains(&"d5".to_string()));
    assert!(names(&b, "d3").contains(&"d4".to_string()));

    let pawn_next_to_king: Board = "8/8/8/8/8/3k4/2P5/4K3 w - - 0 1".parse().unwrap();
    assert_eq!(names(&pawn_next_to_king, "c2"), ["c3", "c4"]);
}

#[test]
fn castling_candidates_are_the_rook_squares() {
    let b: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let king = names(&b, "e1");
    assert!(king.contains(&"h1".to_string()));
    assert!(king.contains(&"a1".to_string()));

    let no_rights: Board = "r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
    assert_eq!(names(&no_rights, "e1"), ["d1", "d2", "e2", "f1", "f2"]);

    let blocked: Board = "r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1".parse().unwrap();
    assert!(!names(&blocked, "e1").contains(&"a1".to_string()));
    assert!(!names(&blocked, "e1").contains(&"h1".to_string()));
}

#[test]
fn rook_too_close_is_not_a_castling_candidate() {
    let mut b = Board::new_empty();
    b.spawn(PieceKind::King, Team::White, sq("e1")).unwrap();
    b.spawn(PieceKind::Rook, Team::White, sq("g1")).unwrap();
    b.spawn(PieceKind::King, Team::Black, sq("e8")).unwrap();
    assert!(!names(&b, "e1").contains(&"g1".to_string()));
}

#[test]
fn random_play_never_breaks_generator_invariants() {
    let config = GameConfig::default().with_max_plies(Some(300));
    let mut game = GameState::new(config);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut sink: Vec<MoveRecord> = Vec::new();

    for _ in 0..300 {
        let board = game.board();
        board.validate().unwrap();
        for team in [Team::White, Team::Black] {
            let player = game.player(team);
            assert_eq!(player.roster().len(), board.pieces_of(team).count());
            let map = move_map(board, player.pieces()).unwrap();
            for to in map.values().flatten() {
                let status = board.status(*to, team);
                assert_ne!(status, CellStatus::OpponentKing);
                if status == CellStatus::SameTeam {
                    // only castling targets a friendly piece
                    assert_eq!(board.occupant(*to).unwrap().kind(), PieceKind::Rook);
                }
            }
        }

        let team = game.to_move();
        if let TurnOutcome::Finished(_) = game.take_turn(team, &mut rng, &mut sink).unwrap() {
            break;
        }
    }
    assert!(!sink.is_empty());
}
