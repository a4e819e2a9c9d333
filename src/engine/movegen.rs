//! Legal move enumeration.
//!
//! Pipeline:
//!   1. For every piece of the moving side, try every destination square
//!      against [`Position::classify`].
//!   2. Filter: play the move on a copy, verify the king is not in check.
//!
//! Promotions are enumerated once per (from, to) pair with the default
//! queen choice. The 64×64 sweep is small and bounded; no pruning is done.

use crate::engine::position::{PlayedMove, Position};
use crate::engine::types::{Color, Move, Square};

// =========================================================================
// Public API
// =========================================================================

/// Every legal move for the side to move, with the resulting positions.
pub fn legal_plays(pos: &Position) -> Vec<PlayedMove> {
    plays_for(pos, pos.side_to_move).collect()
}

/// Generate all legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    plays_for(pos, pos.side_to_move).map(|p| p.mv).collect()
}

/// Generate all legal moves originating from a specific square.
pub fn legal_moves_from(pos: &Position, from: Square) -> Vec<Move> {
    legal_moves(pos)
        .into_iter()
        .filter(|m| m.from == from)
        .collect()
}

/// Whether `color` has at least one legal move, whoever is on move.
pub fn has_legal_moves(pos: &Position, color: Color) -> bool {
    plays_for(pos, color).next().is_some()
}

// =========================================================================
// Enumeration (internal)
// =========================================================================

fn plays_for(pos: &Position, color: Color) -> impl Iterator<Item = PlayedMove> + '_ {
    pos.board.pieces(color).flat_map(move |(from, piece)| {
        Square::all().filter_map(move |to| pos.try_move_piece(piece, Move::new(from, to)).ok())
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::snapshot::Snapshot;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(header: &str, rows: [&str; 8], side: Color) -> Position {
        let text = format!("{header}\n{}\n", rows.join("\n"));
        Snapshot::parse(&text).unwrap().into_position(side)
    }

    fn count_legal(header: &str, rows: [&str; 8], side: Color) -> usize {
        legal_moves(&pos(header, rows, side)).len()
    }

    // -------------------------------------------------------------------
    // Starting position
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_has_20_moves() {
        let moves = legal_moves(&Position::starting());
        assert_eq!(moves.len(), 20);
        let knight_moves = moves
            .iter()
            .filter(|m| m.from == sq("b1") || m.from == sq("g1"))
            .count();
        assert_eq!(knight_moves, 4);
    }

    #[test]
    fn starting_position_after_e4() {
        let p = Position::starting()
            .try_move(Move::new(sq("e2"), sq("e4")))
            .unwrap()
            .next;
        assert_eq!(legal_moves(&p).len(), 20);
    }

    // -------------------------------------------------------------------
    // Pawn moves
    // -------------------------------------------------------------------

    #[test]
    fn pawn_single_and_double_push() {
        let p = pos(
            "0 0 0 0 0 1",
            [
                "....k...", "........", "........", "........", "........", "........",
                "....P...", "....K...",
            ],
            Color::White,
        );
        assert_eq!(legal_moves_from(&p, sq("e2")).len(), 2);
    }

    #[test]
    fn pawn_blocked() {
        let p = pos(
            "0 0 0 0 0 1",
            [
                "....k...", "........", "........", "........", "........", "....p...",
                "....P...", "....K...",
            ],
            Color::White,
        );
        assert!(legal_moves_from(&p, sq("e2")).is_empty());
    }

    #[test]
    fn pawn_promotion_counted_once() {
        let p = pos(
            "0 0 0 0 0 1",
            [
                ".......k", "....P...", "........", "........", "........", "........",
                "........", "....K...",
            ],
            Color::White,
        );
        let promo_moves = legal_moves_from(&p, sq("e7"));
        assert_eq!(promo_moves.len(), 1);
        assert_eq!(promo_moves[0].to, sq("e8"));
    }

    // -------------------------------------------------------------------
    // Castling
    // -------------------------------------------------------------------

    #[test]
    fn castling_both_sides() {
        let p = pos(
            "1 1 1 1 0 1",
            [
                "r...k..r", "pppppppp", "........", "........", "........", "........",
                "PPPPPPPP", "R...K..R",
            ],
            Color::White,
        );
        let castles = legal_plays(&p)
            .into_iter()
            .filter(|p| p.flags.is_castling())
            .count();
        assert_eq!(castles, 2);
    }

    #[test]
    fn castling_through_check_forbidden() {
        let p = pos(
            "1 1 0 0 0 1",
            [
                "....kr..", "........", "........", "........", "........", "........",
                "........", "R...K..R",
            ],
            Color::White,
        );
        let castles: Vec<_> = legal_plays(&p)
            .into_iter()
            .filter(|p| p.flags.is_castling())
            .collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].mv.to, sq("c1"));
    }

    // -------------------------------------------------------------------
    // Check evasion
    // -------------------------------------------------------------------

    #[test]
    fn must_escape_check() {
        let p = pos(
            "0 1 0 0 0 1",
            [
                "....k...", "........", "........", "........", "........", "........",
                "........", "R...K..q",
            ],
            Color::White,
        );
        let plays = legal_plays(&p);
        assert!(!plays.is_empty());
        for play in &plays {
            assert!(
                !play.next.board.is_in_check(Color::White),
                "move {} leaves king in check",
                play.mv
            );
        }
    }

    #[test]
    fn has_legal_moves_for_either_side() {
        let p = Position::starting();
        assert!(has_legal_moves(&p, Color::White));
        assert!(has_legal_moves(&p, Color::Black));
    }

    #[test]
    fn stalemated_king_has_no_moves() {
        let p = pos(
            "0 0 0 0 0 1",
            [
                "k.......", "..K.....", ".Q......", "........", "........", "........",
                "........", "........",
            ],
            Color::Black,
        );
        assert!(!has_legal_moves(&p, Color::Black));
        assert!(has_legal_moves(&p, Color::White));
    }

    // -------------------------------------------------------------------
    // Known positions
    // -------------------------------------------------------------------

    #[test]
    fn kiwipete_48_moves() {
        assert_eq!(
            count_legal(
                "1 1 1 1 0 1",
                [
                    "r...k..r", "p.ppqpb.", "bn..pnp.", "...PN...", ".p..P...", "..N..Q.p",
                    "PPPBBPPP", "R...K..R",
                ],
                Color::White,
            ),
            48
        );
    }

    #[test]
    fn position_3_14_moves() {
        assert_eq!(
            count_legal(
                "0 0 0 0 0 1",
                [
                    "........", "..p.....", "...p....", "KP.....r", ".R...p.k", "........",
                    "....P.P.", "........",
                ],
                Color::White,
            ),
            14
        );
    }

    // -------------------------------------------------------------------
    // legal_moves_from
    // -------------------------------------------------------------------

    #[test]
    fn legal_moves_from_e2() {
        let p = Position::starting();
        assert_eq!(legal_moves_from(&p, sq("e2")).len(), 2);
    }

    #[test]
    fn legal_moves_from_empty_square() {
        let p = Position::starting();
        assert!(legal_moves_from(&p, sq("e4")).is_empty());
    }
}
