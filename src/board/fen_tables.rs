// src/board/fen_tables.rs
// O(1) FEN glyph ↔ (kind, team) maps.

use super::{PieceKind, Team};

pub(super) const CHAR_TO_PC: [Option<(PieceKind, Team)>; 128] = {
    let mut table: [Option<(PieceKind, Team)>; 128] = [None; 128];

    // Uppercase = White
    table['P' as usize] = Some((PieceKind::Pawn, Team::White));
    table['N' as usize] = Some((PieceKind::Knight, Team::White));
    table['B' as usize] = Some((PieceKind::Bishop, Team::White));
    table['R' as usize] = Some((PieceKind::Rook, Team::White));
    table['Q' as usize] = Some((PieceKind::Queen, Team::White));
    table['K' as usize] = Some((PieceKind::King, Team::White));

    // Lowercase = Black
    table['p' as usize] = Some((PieceKind::Pawn, Team::Black));
    table['n' as usize] = Some((PieceKind::Knight, Team::Black));
    table['b' as usize] = Some((PieceKind::Bishop, Team::Black));
    table['r' as usize] = Some((PieceKind::Rook, Team::Black));
    table['q' as usize] = Some((PieceKind::Queen, Team::Black));
    table['k' as usize] = Some((PieceKind::King, Team::Black));

    table
};

#[inline]
pub(super) const fn pc_index(kind: PieceKind, team: Team) -> usize {
    (team as usize) * 6 + (kind as usize)
}

pub(super) const PC_TO_CHAR: [char; 12] = [
    'P', 'N', 'B', 'R', 'Q', 'K', // White
    'p', 'n', 'b', 'r', 'q', 'k', // Black
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_tables_agree() {
        for &g in &PC_TO_CHAR {
            let (kind, team) = CHAR_TO_PC[g as usize].expect("glyph missing from CHAR_TO_PC");
            assert_eq!(PC_TO_CHAR[pc_index(kind, team)], g, "pc→char mismatch for {}", g);
        }
    }
}
