//! tests/status_tests.rs
//! Check, checkmate, stalemate and material draws.
use autochess::board::{PieceKind, Team};
use autochess::config::GameConfig;
use autochess::game::{GameState, TurnOutcome};
use autochess::moves::types::Move;
use autochess::record::{Marker, MoveRecord};
use autochess::square::Position;
use autochess::status::{GameResult, KingStatus, Reason, Verdict, king_status};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn game(fen: &str) -> GameState {
    GameState::from_fen(fen, GameConfig::default()).unwrap()
}

fn play(game: &mut GameState, from: &str, to: &str) -> MoveRecord {
    let piece = game.board().occupant(sq(from)).expect("piece on origin");
    let m = Move::new(piece, sq(to));
    let mut rng = StdRng::seed_from_u64(5);
    game.apply(m, &mut rng, &mut Vec::<MoveRecord>::new()).unwrap()
}

fn status_of(game: &GameState, team: Team) -> KingStatus {
    king_status(game.board(), game.player(team), game.player(!team)).unwrap()
}

#[test]
fn back_rank_mate_ends_the_game() {
    let mut g = game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    assert_eq!(status_of(&g, Team::Black), KingStatus::Safe);

    let rec = play(&mut g, "a1", "a8");
    assert_eq!(rec.marker, Some(Marker::Checkmate));
    assert_eq!(rec.to_string(), "Ra1-a8#");
    assert_eq!(status_of(&g, Team::Black), KingStatus::Checkmate);
    assert!(!g.in_progress());
    assert_eq!(g.result(), Some(GameResult::win(Team::White, Reason::Checkmate)));

    // a finished game reports the result and no longer moves
    let mut rng = StdRng::seed_from_u64(0);
    let again = g.take_turn(Team::Black, &mut rng, &mut Vec::<MoveRecord>::new()).unwrap();
    assert_eq!(again, TurnOutcome::Finished(GameResult::win(Team::White, Reason::Checkmate)));
}

#[test]
fn blocking_the_check_is_the_only_option() {
    let mut g = game("6k1/5ppp/8/8/8/8/2r5/R5K1 w - - 0 1");
    let rec = play(&mut g, "a1", "a8");
    assert_eq!(rec.marker, Some(Marker::Check));
    assert!(g.in_progress());

    match status_of(&g, Team::Black) {
        KingStatus::Protected { candidates } => {
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].kind, PieceKind::Rook);
            assert_eq!(candidates[0].to, sq("c8"));
        }
        other => panic!("expected a protected king, got {other:?}"),
    }
    match g.evaluate().unwrap() {
        Verdict::Play { in_check, moves } => {
            assert!(in_check);
            assert_eq!(moves.len(), 1);
        }
        other => panic!("expected play to continue, got {other:?}"),
    }
}

#[test]
fn capturing_the_checker_counts_as_protection() {
    let g = game("k7/8/8/8/8/8/5nPP/4B1RK w - - 0 1");
    match status_of(&g, Team::White) {
        KingStatus::Protected { candidates } => {
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].kind, PieceKind::Bishop);
            assert_eq!(candidates[0].to, sq("f2"));
        }
        other => panic!("expected a protected king, got {other:?}"),
    }
}

#[test]
fn check_with_an_escape_square_is_safe() {
    let g = game("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
    assert_eq!(status_of(&g, Team::White), KingStatus::Safe);
    match g.evaluate().unwrap() {
        Verdict::Play { in_check, moves } => {
            assert!(in_check);
            assert!(moves.iter().all(|m| m.kind == PieceKind::King));
            assert!(moves.iter().all(|m| m.to.y() == 1));
        }
        other => panic!("expected play to continue, got {other:?}"),
    }
}

#[test]
fn king_cannot_retreat_along_the_checking_ray() {
    // g1 is covered only through the king itself
    let g = game("4k3/8/8/8/8/8/3qq3/r4K2 w - - 0 1");
    assert_eq!(status_of(&g, Team::White), KingStatus::Checkmate);
}

#[test]
fn stalemate_is_a_draw() {
    let mut g = game("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let mut rng = StdRng::seed_from_u64(9);
    let outcome = g.take_turn(Team::Black, &mut rng, &mut Vec::<MoveRecord>::new()).unwrap();
    assert_eq!(outcome, TurnOutcome::Finished(GameResult::draw(Reason::Stalemate)));
    assert!(!g.in_progress());
    assert_eq!(g.last_mover(), Some(Team::Black));
}

#[test]
fn bare_kings_are_drawn_at_once() {
    let mut g = game("8/8/4k3/8/8/3K4/8/8 w - - 0 1");
    let mut rng = StdRng::seed_from_u64(9);
    let mut sink: Vec<MoveRecord> = Vec::new();
    let outcome = g.take_turn(Team::White, &mut rng, &mut sink).unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Finished(GameResult::draw(Reason::InsufficientMaterial))
    );
    assert!(sink.is_empty());
}

#[test]
fn capture_into_bare_kings_ends_the_game() {
    let mut g = game("8/8/4k3/8/8/3K4/3r4/8 w - - 0 1");
    let rec = play(&mut g, "d3", "d2");
    assert_eq!(rec.captured, Some(PieceKind::Rook));
    assert_eq!(g.result(), Some(GameResult::draw(Reason::InsufficientMaterial)));
}
