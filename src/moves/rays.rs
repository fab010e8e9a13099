// Shared geometry for every generator: walk a ray or try a fixed set of
// jumps, deciding per square from its CellStatus.

use super::types::Destinations;
use crate::board::{Board, CellStatus, Team};
use crate::square::{HEIGHT, Position, WIDTH};

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Longest possible ray.
pub(crate) const UNBOUNDED: usize = if WIDTH > HEIGHT { WIDTH } else { HEIGHT };

/// What a scan collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    /// Squares the piece may move to.
    Moves,
    /// Squares the piece controls. The first blocker of either side counts,
    /// and `through` is scanned as if it were empty.
    Attacks { through: Option<Position> },
}

/// (include the square, stop the ray)
#[inline(always)]
fn verdict(status: CellStatus, reach: Reach) -> (bool, bool) {
    match (reach, status) {
        (_, CellStatus::Empty) => (true, false),
        (_, CellStatus::OtherTeam) => (true, true),
        (Reach::Moves, CellStatus::SameTeam | CellStatus::OpponentKing) => (false, true),
        (Reach::Attacks { .. }, CellStatus::SameTeam | CellStatus::OpponentKing) => (true, true),
    }
}

#[inline(always)]
fn status_at(board: &Board, pos: Position, team: Team, reach: Reach) -> CellStatus {
    match reach {
        Reach::Attacks { through: Some(t) } if t == pos => CellStatus::Empty,
        _ => board.status(pos, team),
    }
}

/// Walk each direction up to `max_steps` squares.
pub(crate) fn slide(
    board: &Board,
    from: Position,
    team: Team,
    directions: &[(i8, i8)],
    max_steps: usize,
    reach: Reach,
    out: &mut Destinations,
) {
    for &(dx, dy) in directions {
        let mut cur = from;
        for _ in 0..max_steps {
            let Some(next) = cur.offset(dx, dy) else {
                break;
            };
            let (include, stop) = verdict(status_at(board, next, team, reach), reach);
            if include {
                out.push(next);
            }
            if stop {
                break;
            }
            cur = next;
        }
    }
}

/// Try each jump independently; off-board jumps are dropped.
pub(crate) fn leap(
    board: &Board,
    from: Position,
    team: Team,
    jumps: &[(i8, i8)],
    reach: Reach,
    out: &mut Destinations,
) {
    for &(dx, dy) in jumps {
        if let Some(to) = from.offset(dx, dy) {
            let (include, _) = verdict(status_at(board, to, team, reach), reach);
            if include {
                out.push(to);
            }
        }
    }
}
