//! Attack geometry on a [`Board`].
//!
//! These rules describe which squares a piece *attacks*, ignoring whose
//! turn it is and whether the attacker's own king would be exposed. They
//! back check detection and the non-pawn, non-king move rules.

use crate::engine::board::Board;
use crate::engine::types::{Color, Piece, PieceType, Square};

/// Knight jumps as `(row, col)` deltas.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Same row, same column, or same absolute row/column distance.
#[inline]
pub fn is_aligned(from: Square, to: Square) -> bool {
    let dr = (to.row - from.row).abs();
    let dc = (to.col - from.col).abs();
    dr == 0 || dc == 0 || dr == dc
}

impl Board {
    /// Whether every square strictly between `from` and `to` is empty.
    ///
    /// Only meaningful for aligned squares; unaligned pairs are never clear.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        if !is_aligned(from, to) {
            return false;
        }
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();

        let mut sq = from.offset(dr, dc);
        while sq != to {
            if !sq.is_on_board() || !self.is_empty(sq) {
                return false;
            }
            sq = sq.offset(dr, dc);
        }
        true
    }

    /// Whether `piece` standing on `from` attacks `to`.
    ///
    /// Pawns only attack diagonally forward onto an enemy piece, never an
    /// empty square. Sliders need a clear path.
    pub fn can_attack(&self, piece: Piece, from: Square, to: Square) -> bool {
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }
        let dr = to.row - from.row;
        let dc = to.col - from.col;
        let (adr, adc) = (dr.abs(), dc.abs());

        match piece.kind {
            PieceType::Pawn => {
                dr == piece.color.forward() && adc == 1 && self.is_color(to, !piece.color)
            }
            PieceType::King => adr <= 1 && adc <= 1,
            PieceType::Queen => is_aligned(from, to) && self.is_path_clear(from, to),
            PieceType::Rook => (dr == 0 || dc == 0) && self.is_path_clear(from, to),
            PieceType::Bishop => adr == adc && self.is_path_clear(from, to),
            PieceType::Knight => KNIGHT_OFFSETS.contains(&(dr, dc)),
        }
    }

    /// Is `sq` attacked by any piece of colour `by`?
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces(by)
            .any(|(from, piece)| from != sq && self.can_attack(piece, from, sq))
    }

    /// Is the king of `color` attacked?
    ///
    /// A board without that king reports "not in check".
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_square_attacked(king, !color),
            None => {
                tracing::warn!("no {color} king on the board; treating as not in check");
                false
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn piece(symbol: char) -> Piece {
        Piece::from_symbol(symbol).unwrap()
    }

    fn board_with(pieces: &[(&str, char)]) -> Board {
        let mut board = Board::empty();
        for &(name, symbol) in pieces {
            board.set(sq(name), piece(symbol));
        }
        board
    }

    // -------------------------------------------------------------------
    // Path clearance
    // -------------------------------------------------------------------

    #[test]
    fn path_clear_on_empty_board() {
        let board = Board::empty();
        assert!(board.is_path_clear(sq("a1"), sq("a8")));
        assert!(board.is_path_clear(sq("a1"), sq("h8")));
        assert!(board.is_path_clear(sq("h1"), sq("a1")));
        assert!(board.is_path_clear(sq("e4"), sq("e5")));
    }

    #[test]
    fn path_excludes_endpoints() {
        let board = board_with(&[("a1", 'R'), ("a8", 'r')]);
        assert!(board.is_path_clear(sq("a1"), sq("a8")));
    }

    #[test]
    fn path_blocked_in_between() {
        let board = board_with(&[("d4", 'P')]);
        assert!(!board.is_path_clear(sq("a1"), sq("h8")));
        assert!(!board.is_path_clear(sq("d1"), sq("d8")));
        assert!(board.is_path_clear(sq("a1"), sq("c3")));
    }

    #[test]
    fn path_unaligned_is_not_clear() {
        assert!(!Board::empty().is_path_clear(sq("a1"), sq("b3")));
    }

    // -------------------------------------------------------------------
    // Piece attacks
    // -------------------------------------------------------------------

    #[test]
    fn pawn_attacks_only_occupied_enemy_diagonals() {
        let board = board_with(&[("e4", 'P'), ("d5", 'p'), ("f5", 'N'), ("e5", 'p')]);
        let pawn = piece('P');
        assert!(board.can_attack(pawn, sq("e4"), sq("d5")));
        assert!(!board.can_attack(pawn, sq("e4"), sq("f5")), "own piece");
        assert!(!board.can_attack(pawn, sq("e4"), sq("e5")), "straight ahead");
        assert!(!board.can_attack(pawn, sq("e4"), sq("d3")), "backwards");
    }

    #[test]
    fn pawn_never_attacks_empty_square() {
        let board = board_with(&[("e4", 'P')]);
        assert!(!board.can_attack(piece('P'), sq("e4"), sq("d5")));
        assert!(!board.can_attack(piece('P'), sq("e4"), sq("f5")));
    }

    #[test]
    fn black_pawn_attacks_downwards() {
        let board = board_with(&[("e5", 'p'), ("d4", 'P'), ("f6", 'P')]);
        assert!(board.can_attack(piece('p'), sq("e5"), sq("d4")));
        assert!(!board.can_attack(piece('p'), sq("e5"), sq("f6")));
    }

    #[test]
    fn knight_attacks() {
        let board = board_with(&[("e4", 'N'), ("e5", 'p'), ("d5", 'p')]);
        let knight = piece('N');
        for target in ["d6", "f6", "c5", "g5", "c3", "g3", "d2", "f2"] {
            assert!(board.can_attack(knight, sq("e4"), sq(target)), "{target}");
        }
        assert!(!board.can_attack(knight, sq("e4"), sq("e6")));
        assert!(!board.can_attack(knight, sq("e4"), sq("e5")));
    }

    #[test]
    fn king_attacks_adjacent_only() {
        let board = Board::empty();
        let king = piece('K');
        assert!(board.can_attack(king, sq("e4"), sq("d5")));
        assert!(board.can_attack(king, sq("e4"), sq("e3")));
        assert!(!board.can_attack(king, sq("e4"), sq("e6")));
        assert!(!board.can_attack(king, sq("e1"), sq("g1")));
    }

    #[test]
    fn slider_geometry() {
        let board = board_with(&[("d4", 'p')]);
        assert!(board.can_attack(piece('R'), sq("d1"), sq("d4")));
        assert!(!board.can_attack(piece('R'), sq("d1"), sq("d5")));
        assert!(!board.can_attack(piece('R'), sq("a1"), sq("b2")));
        assert!(board.can_attack(piece('B'), sq("a1"), sq("d4")));
        assert!(!board.can_attack(piece('B'), sq("a1"), sq("e5")));
        assert!(!board.can_attack(piece('B'), sq("a1"), sq("a5")));
        assert!(board.can_attack(piece('Q'), sq("a1"), sq("a8")));
        assert!(board.can_attack(piece('Q'), sq("g1"), sq("d4")));
        assert!(!board.can_attack(piece('Q'), sq("a1"), sq("b3")));
    }

    #[test]
    fn sliders_reach_empty_squares() {
        let board = Board::empty();
        assert!(board.can_attack(piece('Q'), sq("d1"), sq("h5")));
        assert!(board.can_attack(piece('r'), sq("a8"), sq("h8")));
    }

    // -------------------------------------------------------------------
    // Check detection
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_not_in_check() {
        let board = Board::starting();
        assert!(!board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));
    }

    #[test]
    fn rook_gives_check_along_file() {
        let board = board_with(&[("e1", 'K'), ("e8", 'r'), ("a8", 'k')]);
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));
    }

    #[test]
    fn blocked_check_is_no_check() {
        let board = board_with(&[("e1", 'K'), ("e4", 'N'), ("e8", 'r'), ("a8", 'k')]);
        assert!(!board.is_in_check(Color::White));
    }

    #[test]
    fn pawn_gives_check() {
        let board = board_with(&[("e4", 'K'), ("d5", 'p'), ("a8", 'k')]);
        assert!(board.is_in_check(Color::White));
        let board = board_with(&[("e4", 'K'), ("e5", 'p'), ("a8", 'k')]);
        assert!(!board.is_in_check(Color::White));
    }

    #[test]
    fn square_attacked_by_color() {
        let board = board_with(&[("b1", 'N')]);
        assert!(board.is_square_attacked(sq("c3"), Color::White));
        assert!(!board.is_square_attacked(sq("c3"), Color::Black));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let board = board_with(&[("e8", 'r')]);
        assert!(!board.is_in_check(Color::White));
    }
}
