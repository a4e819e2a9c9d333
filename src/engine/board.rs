//! The 8×8 piece grid.
//!
//! `Board` is plain data: a `Copy` array of optional pieces indexed by
//! `(row, col)` with row 0 at rank 8. Attack geometry lives in
//! [`crate::engine::attacks`]; rules that need history (castling rights,
//! en passant) live on [`crate::engine::position::Position`].

use crate::engine::types::{Color, Piece, PieceType, Square};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Piece placement. `None` is an empty square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            for color in [Color::White, Color::Black] {
                board.set(Square::new(color.home_row(), col), Piece::new(color, kind));
                board.set(
                    Square::new(color.pawn_row(), col),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
        board
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a square? Off-board squares are empty.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() {
            return None;
        }
        self.cells[sq.row as usize][sq.col as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Whether `sq` holds a piece of `color`.
    #[inline]
    pub fn is_color(&self, sq: Square, color: Color) -> bool {
        self.piece_at(sq).is_some_and(|p| p.color == color)
    }

    /// Place a piece, replacing whatever was there. Ignored off the board.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Piece) {
        if sq.is_on_board() {
            self.cells[sq.row as usize][sq.col as usize] = Some(piece);
        }
    }

    /// Empty a square and return what stood on it.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() {
            return None;
        }
        self.cells[sq.row as usize][sq.col as usize].take()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Bounds check for a square.
    #[inline]
    pub fn is_on_board(&self, sq: Square) -> bool {
        sq.is_on_board()
    }

    /// Linear scan for the king of `color`.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.piece_at(sq)
                .is_some_and(|p| p.is(color, PieceType::King))
        })
    }

    /// Every piece of `color` together with its square, row 0 first.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// Number of pieces of `color` and `kind` on the board.
    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        self.pieces(color).filter(|(_, p)| p.kind == kind).count()
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// One line per row, row 0 first, `.` for empty squares.
    pub fn rows(&self) -> [String; 8] {
        std::array::from_fn(|row| {
            (0..8)
                .map(|col| match self.cells[row][col] {
                    Some(p) => p.symbol(),
                    None => '.',
                })
                .collect()
        })
    }

    /// Render the board as an 8-line string (rank 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for (row, line) in self.rows().iter().enumerate() {
            s.push((b'8' - row as u8) as char);
            for ch in line.chars() {
                s.push(' ');
                s.push(ch);
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
