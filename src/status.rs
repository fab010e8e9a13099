use crate::board::{Board, CellStatus, Piece, PieceKind, Team};
use crate::error::ChessError;
use crate::game::Player;
use crate::moves::execute::{generate_legal, is_legal};
use crate::moves::movegen::{destinations, en_passant_victim};
use crate::moves::square_control::{attack_map, attackers_of, in_check};
use crate::moves::types::{Move, covered};
use crate::square::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};

/// How the side to move stands, judged from the opponent's coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KingStatus {
    /// Not attacked, or attacked with a free escape square.
    Safe,
    /// Attacked, no escape, and nothing can block or capture.
    Checkmate,
    /// Attacked without escape; these non-king moves resolve the check.
    Protected { candidates: Vec<Move> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    Resignation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub reason: Reason,
}

impl GameResult {
    pub fn win(winner: Team, reason: Reason) -> Self {
        let outcome = match winner {
            Team::White => Outcome::WhiteWins,
            Team::Black => Outcome::BlackWins,
        };
        GameResult { outcome, reason }
    }

    pub fn draw(reason: Reason) -> Self {
        GameResult {
            outcome: Outcome::Draw,
            reason,
        }
    }

    pub fn winner(&self) -> Option<Team> {
        match self.outcome {
            Outcome::WhiteWins => Some(Team::White),
            Outcome::BlackWins => Some(Team::Black),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = match self.outcome {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
        };
        let reason = match self.reason {
            Reason::Checkmate => "checkmate",
            Reason::Stalemate => "stalemate",
            Reason::InsufficientMaterial => "insufficient material",
            Reason::Resignation => "resignation",
        };
        write!(f, "{score} ({reason})")
    }
}

/// What the side to move faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Game continues; `moves` is the full legal set to choose from.
    Play { in_check: bool, moves: Vec<Move> },
    Over(GameResult),
}

/// Squares whose occupation by a defender stops `attacker` hitting `king`:
/// the attacker's own square plus, for line pieces, every square between.
pub fn protection_path(attacker: &Piece, king: Position) -> Vec<Position> {
    let from = attacker.position();
    let mut path = vec![from];
    if attacker.kind() == PieceKind::Knight {
        return path;
    }

    let dx = (king.x() as i8 - from.x() as i8).signum();
    let dy = (king.y() as i8 - from.y() as i8).signum();
    let mut cur = from;
    while let Some(next) = cur.offset(dx, dy) {
        if next == king {
            break;
        }
        path.push(next);
        cur = next;
    }
    path
}

/// Decide whether `active`'s king is safe, mated, or must be protected.
pub fn king_status(board: &Board, active: &Player, opponent: &Player) -> Result<KingStatus, ChessError> {
    let king = board.king(active.team())?;
    let king_sq = king.position();

    let coverage = covered(&attack_map(board, opponent.pieces(), None)?);
    if !coverage.contains(&king_sq) {
        return Ok(KingStatus::Safe);
    }

    // The king is transparent here so it cannot step back along the checking ray.
    let xray = covered(&attack_map(board, opponent.pieces(), Some(king_sq))?);
    let team = active.team();
    let escape = destinations(board, king)
        .into_iter()
        .filter(|&to| board.status(to, team) != CellStatus::SameTeam)
        .find(|to| !xray.contains(to));
    if let Some(to) = escape {
        debug!(team = %team, king = %king_sq, escape = %to, "check with an escape square");
        return Ok(KingStatus::Safe);
    }

    let attackers = attackers_of(board, king_sq, opponent.team());
    let mut paths = BTreeSet::new();
    for &id in &attackers {
        paths.extend(protection_path(board.get(id)?, king_sq));
    }

    let mut candidates = Vec::new();
    for id in active.pieces() {
        let piece = board.get(id)?;
        if piece.kind() == PieceKind::King {
            continue;
        }
        for to in destinations(board, piece) {
            let takes_checker = en_passant_victim(board, piece, to)
                .is_some_and(|victim| attackers.contains(&victim));
            if !paths.contains(&to) && !takes_checker {
                continue;
            }
            let mv = Move::new(piece, to);
            if is_legal(board, mv)? {
                candidates.push(mv);
            }
        }
    }

    trace!(team = %team, attackers = attackers.len(), candidates = candidates.len(), "king attacked");
    if candidates.is_empty() {
        debug!(team = %team, king = %king_sq, "checkmate");
        Ok(KingStatus::Checkmate)
    } else {
        Ok(KingStatus::Protected { candidates })
    }
}

/// Which material balances end the game as a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MaterialRule {
    /// Only two lone kings.
    #[default]
    BareKings,
    /// Also the common dead positions, see [`is_insufficient_material`].
    DeadPosition,
}

impl MaterialRule {
    pub fn is_drawn(self, board: &Board) -> bool {
        match self {
            MaterialRule::BareKings => only_kings_remain(board),
            MaterialRule::DeadPosition => is_insufficient_material(board),
        }
    }
}

pub fn only_kings_remain(board: &Board) -> bool {
    board.pieces().all(|p| p.kind() == PieceKind::King)
}

/// Approximate dead-position test: bare kings, a single minor piece, two
/// knights against a bare king, or one minor piece each.
///
/// Broader than [`only_kings_remain`]. Some of these balances (K+N vs K+N,
/// K+N+N vs K) still allow a mate with cooperative play, so this is opt-in
/// through [`MaterialRule::DeadPosition`].
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors = [0u8; 2];
    let mut knights = [0u8; 2];
    for piece in board.pieces() {
        let side = piece.team() as usize;
        match piece.kind() {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => {
                minors[side] += 1;
                knights[side] += 1;
            }
            PieceKind::Bishop => minors[side] += 1,
        }
    }

    match minors[0] + minors[1] {
        0 | 1 => true,
        2 => knights.contains(&2) || (minors[0] == 1 && minors[1] == 1),
        // KBB vs K, KBN vs K and larger sets can still mate
        _ => false,
    }
}

/// Judge the position for `active`, the side about to move.
///
/// Material draws under `material` come before anything else. Otherwise the king status
/// decides the candidate set: a protected king may only play the moves that
/// resolve the check, a safe king may play any legal move, and a side with
/// no legal move is mated or stalemated depending on whether it is in check.
pub fn evaluate(
    board: &Board,
    active: &Player,
    opponent: &Player,
    material: MaterialRule,
) -> Result<Verdict, ChessError> {
    if material.is_drawn(board) {
        debug!("insufficient material");
        return Ok(Verdict::Over(GameResult::draw(Reason::InsufficientMaterial)));
    }

    let team = active.team();
    let moves = match king_status(board, active, opponent)? {
        KingStatus::Checkmate => {
            return Ok(Verdict::Over(GameResult::win(opponent.team(), Reason::Checkmate)));
        }
        KingStatus::Protected { candidates } => {
            return Ok(Verdict::Play {
                in_check: true,
                moves: candidates,
            });
        }
        KingStatus::Safe => generate_legal(board, active.pieces())?,
    };

    let checked = in_check(board, team)?;
    if moves.is_empty() {
        let result = if checked {
            GameResult::win(opponent.team(), Reason::Checkmate)
        } else {
            GameResult::draw(Reason::Stalemate)
        };
        debug!(team = %team, %result, "no legal moves");
        return Ok(Verdict::Over(result));
    }
    Ok(Verdict::Play {
        in_check: checked,
        moves,
    })
}
