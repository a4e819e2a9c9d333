//! Coordinate move notation: `"e2 e4"`, `"d7 d8=Q"`.

use crate::engine::types::{ChessError, Move, PieceType, Square};

/// Parse a square such as `"e4"`.
pub fn parse_square(text: &str) -> Result<Square, ChessError> {
    Square::from_algebraic(text).ok_or_else(|| ChessError::InvalidSquare(text.to_string()))
}

/// Parse a move request.
///
/// The optional `=X` suffix picks the promotion piece. Letters other than
/// Q, R, B or N (either case) are ignored and the pawn becomes a queen.
pub fn parse_move(text: &str) -> Result<Move, ChessError> {
    let mut parts = text.split_whitespace();
    let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ChessError::InvalidNotation(text.trim().to_string()));
    };

    let (to, promotion) = match to.split_once('=') {
        Some((sq, letter)) => (sq, parse_promotion(letter)),
        None => (to, None),
    };

    Ok(Move {
        from: parse_square(from)?,
        to: parse_square(to)?,
        promotion,
    })
}

fn parse_promotion(letter: &str) -> Option<PieceType> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => match c.to_ascii_uppercase() {
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn plain_move() {
        let mv = parse_move("e2 e4").unwrap();
        assert_eq!(mv, Move::new(sq("e2"), sq("e4")));
        assert_eq!(parse_move("  g1   f3 ").unwrap(), Move::new(sq("g1"), sq("f3")));
    }

    #[test]
    fn promotion_suffix() {
        assert_eq!(
            parse_move("d7 d8=N").unwrap().promotion,
            Some(PieceType::Knight)
        );
        assert_eq!(
            parse_move("d7 d8=r").unwrap().promotion,
            Some(PieceType::Rook)
        );
        let mv = parse_move("d7 d8=K").unwrap();
        assert_eq!(mv.promotion, None);
        assert_eq!(mv.promotion_kind(), PieceType::Queen);
        assert_eq!(parse_move("d7 d8=").unwrap().promotion, None);
    }

    #[test]
    fn malformed_text() {
        for text in ["", "e2", "e2 e4 e5", "e2-e4"] {
            assert!(
                matches!(parse_move(text), Err(ChessError::InvalidNotation(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn bad_squares() {
        for text in ["e9 e4", "i2 e4", "e2 E4", "e2 e44"] {
            assert!(
                matches!(parse_move(text), Err(ChessError::InvalidSquare(_))),
                "{text:?}"
            );
        }
    }
}
