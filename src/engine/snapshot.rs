//! Plain-text save format.
//!
//! ```text
//! 1 1 1 1 0 1
//! rnbqkbnr
//! pppppppp
//! ........
//! ........
//! ........
//! ........
//! PPPPPPPP
//! RNBQKBNR
//! ```
//!
//! The header holds the four castling flags (white kingside, white
//! queenside, black kingside, black queenside as `1`/`0`), the half-move
//! clock and the full-move number. Eight rows follow, row 0 (rank 8) first.
//!
//! Neither the side to move, the previous move nor the per-piece moved
//! markers are stored. On load a king counts as unmoved when its colour
//! still holds a castling flag and it stands on its home square; a rook
//! counts as unmoved when it stands in a corner whose flag is set.

use std::path::Path;

use crate::engine::board::Board;
use crate::engine::position::Position;
use crate::engine::types::{
    CastleSide, CastlingRights, ChessError, Color, Piece, PieceType, Square,
};

/// The persisted part of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub castling_rights: CastlingRights,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub board: Board,
}

impl Snapshot {
    pub fn from_position(pos: &Position) -> Self {
        Snapshot {
            castling_rights: pos.castling_rights,
            halfmove_clock: pos.halfmove_clock,
            fullmove_number: pos.fullmove_number,
            board: pos.board,
        }
    }

    /// Rebuild a position. There is no previous move, so en passant is
    /// unavailable on the first ply after loading.
    pub fn into_position(self, side_to_move: Color) -> Position {
        Position::new(
            self.board,
            side_to_move,
            self.castling_rights,
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    // -----------------------------------------------------------------------
    // Text form
    // -----------------------------------------------------------------------

    /// Render the header line and the eight rows, each newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(96);
        for flag in self.castling_rights.flags() {
            out.push(if flag { '1' } else { '0' });
            out.push(' ');
        }
        out.push_str(&format!(
            "{} {}\n",
            self.halfmove_clock, self.fullmove_number
        ));
        for row in self.board.rows() {
            out.push_str(&row);
            out.push('\n');
        }
        out
    }

    /// Parse the text form, validating every field.
    pub fn parse(text: &str) -> Result<Self, ChessError> {
        let mut lines = text.lines();

        // ----- Header -----
        let header = lines
            .next()
            .ok_or_else(|| ChessError::InvalidSnapshot("empty file".to_string()))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidSnapshot(format!(
                "expected 6 header fields, got {}",
                fields.len()
            )));
        }

        let mut flags = [false; 4];
        for (flag, field) in flags.iter_mut().zip(&fields[..4]) {
            *flag = match *field {
                "1" => true,
                "0" => false,
                other => {
                    return Err(ChessError::InvalidSnapshot(format!(
                        "castling flag must be 0 or 1, got '{other}'"
                    )));
                }
            };
        }
        let castling_rights = CastlingRights::from_flags(flags);

        let halfmove_clock = fields[4].parse::<u32>().map_err(|_| {
            ChessError::InvalidSnapshot(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;
        let fullmove_number = fields[5].parse::<u32>().map_err(|_| {
            ChessError::InvalidSnapshot(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if fullmove_number == 0 {
            return Err(ChessError::InvalidSnapshot(
                "fullmove number must be >= 1".to_string(),
            ));
        }
        // Both counters must still be able to advance by one ply.
        if halfmove_clock == u32::MAX || fullmove_number == u32::MAX {
            return Err(ChessError::InvalidSnapshot(format!(
                "move counters out of range: {halfmove_clock} {fullmove_number}"
            )));
        }

        // ----- Rows -----
        let mut board = Board::empty();
        for row in 0..8i8 {
            let line = lines.next().map(str::trim_end).ok_or_else(|| {
                ChessError::InvalidSnapshot(format!("expected 8 rows, got {row}"))
            })?;
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != 8 {
                return Err(ChessError::InvalidSnapshot(format!(
                    "row {row} has {} squares instead of 8",
                    chars.len()
                )));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let (color, kind) = PieceType::from_char(ch).ok_or_else(|| {
                    ChessError::InvalidSnapshot(format!("invalid piece character '{ch}'"))
                })?;
                let sq = Square::new(row, col as i8);
                let mut piece = Piece::new(color, kind);
                if matches!(kind, PieceType::King | PieceType::Rook) {
                    piece.has_moved = !starts_unmoved(castling_rights, color, kind, sq);
                }
                board.set(sq, piece);
            }
        }
        if lines.any(|l| !l.trim().is_empty()) {
            return Err(ChessError::InvalidSnapshot(
                "unexpected content after the eighth row".to_string(),
            ));
        }

        // Exactly one king per side.
        for color in [Color::White, Color::Black] {
            let kings = board.count(color, PieceType::King);
            if kings != 1 {
                return Err(ChessError::InvalidSnapshot(format!(
                    "{color} has {kings} kings (expected 1)"
                )));
            }
        }

        Ok(Snapshot {
            castling_rights,
            halfmove_clock,
            fullmove_number,
            board,
        })
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    pub fn save(&self, path: &Path) -> Result<(), ChessError> {
        std::fs::write(path, self.render())?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ChessError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// Whether a loaded king or rook may still take part in castling.
fn starts_unmoved(rights: CastlingRights, color: Color, kind: PieceType, sq: Square) -> bool {
    if sq.row != color.home_row() {
        return false;
    }
    match kind {
        PieceType::King => sq.col == 4 && rights.any(color),
        _ => CastleSide::from_rook_col(sq.col).is_some_and(|side| rights.has(color, side)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
