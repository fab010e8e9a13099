// src/board/fen.rs
//
// Accepted form: `placement [side] [castling] [en-passant] [clocks...]`.
// Clocks are ignored. Missing trailing fields fall back to: White to move,
// kings and rooks on their home squares unmoved, no en-passant target.

use super::fen_tables::{CHAR_TO_PC, PC_TO_CHAR, pc_index};
use super::{Board, PieceKind, Team};
use crate::error::ChessError;
use crate::square::{HEIGHT, Position, WIDTH};

impl Board {
    /// Build a board from FEN and return it with the side to move.
    pub fn from_fen(fen: &str) -> Result<(Board, Team), ChessError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| ChessError::InvalidFen("empty string".into()))?;

        let mut board = Board::new_empty();
        board.place_from_fen(placement)?;

        let to_move = match fields.next() {
            None | Some("w") => Team::White,
            Some("b") => Team::Black,
            Some(other) => {
                return Err(ChessError::InvalidFen(format!("bad side to move `{other}`")));
            }
        };

        let castling = match fields.next() {
            None => None,
            Some("-") => Some(""),
            Some(rights) if rights.chars().all(|c| "KQkq".contains(c)) => Some(rights),
            Some(other) => {
                return Err(ChessError::InvalidFen(format!("bad castling field `{other}`")));
            }
        };
        board.infer_moved_flags(castling);

        if let Some(ep) = fields.next().filter(|f| *f != "-") {
            board.arm_en_passant(ep, to_move.opposite())?;
        }

        Ok((board, to_move))
    }

    fn place_from_fen(&mut self, placement: &str) -> Result<(), ChessError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != HEIGHT {
            return Err(ChessError::InvalidFen(format!(
                "expected {} ranks, found {}",
                HEIGHT,
                ranks.len()
            )));
        }

        for (row, rank) in ranks.iter().enumerate() {
            let y = HEIGHT - 1 - row;
            let mut x = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    x += skip as usize;
                    continue;
                }
                let (kind, team) = CHAR_TO_PC
                    .get(c as usize)
                    .copied()
                    .flatten()
                    .ok_or_else(|| ChessError::InvalidFen(format!("unknown glyph `{c}`")))?;
                if x >= WIDTH {
                    return Err(ChessError::InvalidFen(format!("rank {} overflows", y + 1)));
                }
                self.spawn(kind, team, Position::at(x, y))?;
                x += 1;
            }
            if x != WIDTH {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} files",
                    y + 1,
                    x
                )));
            }
        }
        Ok(())
    }

    /// Pawns off their start rank have moved. Kings and rooks count as
    /// unmoved on their home squares, filtered by the castling field if given.
    fn infer_moved_flags(&mut self, castling: Option<&str>) {
        let allows = |glyph: char| castling.is_none_or(|rights| rights.contains(glyph));

        for piece in self.pieces.iter_mut().flatten() {
            let pos = piece.position;
            let home = piece.team.home_rank();
            let (king_side, queen_side) = match piece.team {
                Team::White => ('K', 'Q'),
                Team::Black => ('k', 'q'),
            };
            piece.has_moved = match piece.kind {
                PieceKind::Pawn => pos.y() != piece.team.pawn_rank(),
                PieceKind::King => {
                    !(pos.y() == home && pos.x() == 4 && (allows(king_side) || allows(queen_side)))
                }
                PieceKind::Rook => {
                    let unmoved = pos.y() == home
                        && ((pos.x() == WIDTH - 1 && allows(king_side))
                            || (pos.x() == 0 && allows(queen_side)));
                    !unmoved
                }
                _ => false,
            };
        }
    }

    /// The en-passant field names the square behind a pawn of `pawn_team`
    /// that just double-stepped; flag that pawn as capturable.
    fn arm_en_passant(&mut self, field: &str, pawn_team: Team) -> Result<(), ChessError> {
        let target: Position = field
            .parse()
            .map_err(|_| ChessError::InvalidFen(format!("bad en-passant square `{field}`")))?;
        let bad = || ChessError::InvalidFen(format!("no double-stepped pawn behind {field}"));
        let forward = pawn_team.forward();
        let pawn_sq = target.offset(0, forward).ok_or_else(bad)?;
        let start_sq = target.offset(0, -forward).ok_or_else(bad)?;

        let id = match self.occupant(pawn_sq) {
            Some(p) if p.kind() == PieceKind::Pawn && p.team() == pawn_team => p.id(),
            _ => return Err(bad()),
        };
        if !self.is_empty(target) {
            return Err(bad());
        }
        let pawn = self.get_mut(id)?;
        pawn.en_passant_vulnerable = true;
        pawn.has_moved = true;
        pawn.previous = Some(start_sq);
        Ok(())
    }

    /// Placement field only.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for y in (0..HEIGHT).rev() {
            let mut empty = 0;
            for x in 0..WIDTH {
                match self.occupant(Position::at(x, y)) {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(PC_TO_CHAR[pc_index(p.kind(), p.team())]);
                    }
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if y > 0 {
                out.push('/');
            }
        }
        out
    }
}
