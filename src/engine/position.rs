//! Board plus the history-dependent state the rules need.
//!
//! `Position` is `Copy`. Moves are never applied in place: [`Position::play`]
//! returns the successor position, so a rejected move cannot leave a trace
//! and check-safety is tested on a throwaway copy.

use crate::engine::board::Board;
use crate::engine::types::{
    CastleSide, CastlingRights, Color, Move, MoveFlags, MoveRejection, Piece, PieceType, Square,
};

// ---------------------------------------------------------------------------
// PlayedMove
// ---------------------------------------------------------------------------

/// A move that passed every legality check, with the position it leads to.
#[derive(Clone, Copy, Debug)]
pub struct PlayedMove {
    pub mv: Move,
    /// The piece as it stood on the source square.
    pub piece: Piece,
    pub flags: MoveFlags,
    /// The captured piece and the square it was removed from.
    pub captured: Option<(Square, Piece)>,
    pub next: Position,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A complete game position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: Board,

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// Squares of the previous ply. Only used to authorise en passant.
    pub last_move: Option<(Square, Square)>,

    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u32,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u32,
}

impl Position {
    /// Standard starting position.
    pub fn starting() -> Self {
        Position::new(Board::starting(), Color::White, CastlingRights::ALL, 0, 1)
    }

    /// A position with no previous move on record.
    pub fn new(
        board: Board,
        side_to_move: Color,
        castling_rights: CastlingRights,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Position {
            board,
            side_to_move,
            castling_rights,
            last_move: None,
            halfmove_clock,
            fullmove_number,
        }
    }

    // -----------------------------------------------------------------------
    // Move validation (geometry + rules, no check safety)
    // -----------------------------------------------------------------------

    /// Whether `piece` on `from` may move to `to`, ignoring self-check.
    pub fn validate_move(&self, piece: Piece, from: Square, to: Square) -> bool {
        self.classify(piece, from, to).is_some()
    }

    /// Validate a move and describe it. `None` means the move is illegal.
    pub fn classify(&self, piece: Piece, from: Square, to: Square) -> Option<MoveFlags> {
        if !from.is_on_board() || !to.is_on_board() || from == to {
            return None;
        }
        let target = self.board.piece_at(to);
        if target.is_some_and(|t| t.color == piece.color) {
            return None;
        }

        let mut flags = if target.is_some() {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::NONE
        };
        match piece.kind {
            PieceType::Pawn => flags |= self.classify_pawn(piece.color, from, to)?,
            PieceType::King => flags |= self.classify_king(piece, from, to)?,
            _ => {
                if !self.board.can_attack(piece, from, to) {
                    return None;
                }
            }
        }
        Some(flags)
    }

    fn classify_pawn(&self, color: Color, from: Square, to: Square) -> Option<MoveFlags> {
        let dir = color.forward();
        let dr = to.row - from.row;
        let dc = to.col - from.col;
        let promotion = if to.row == (!color).home_row() {
            MoveFlags::PROMOTION
        } else {
            MoveFlags::NONE
        };

        if dc == 0 {
            if !self.board.is_empty(to) {
                return None;
            }
            if dr == dir {
                return Some(promotion);
            }
            if dr == 2 * dir
                && from.row == color.pawn_row()
                && self.board.is_empty(from.offset(dir, 0))
            {
                return Some(MoveFlags::DOUBLE_PUSH);
            }
            return None;
        }

        if dr == dir && dc.abs() == 1 {
            if self.board.is_color(to, !color) {
                return Some(promotion);
            }
            if self.is_en_passant(color, from, to) {
                return Some(MoveFlags::CAPTURE | MoveFlags::EN_PASSANT);
            }
        }
        None
    }

    /// The previous ply was an enemy pawn's two-square advance that landed
    /// beside `from`, and `to` is the square it skipped.
    fn is_en_passant(&self, color: Color, from: Square, to: Square) -> bool {
        let victim = Square::new(from.row, to.col);
        let origin = victim.offset(2 * color.forward(), 0);
        self.board.is_empty(to)
            && self.last_move == Some((origin, victim))
            && self
                .board
                .piece_at(victim)
                .is_some_and(|p| p.is(!color, PieceType::Pawn))
    }

    fn classify_king(&self, king: Piece, from: Square, to: Square) -> Option<MoveFlags> {
        let dr = to.row - from.row;
        let dc = to.col - from.col;
        if dr.abs() <= 1 && dc.abs() <= 1 {
            return Some(MoveFlags::NONE);
        }
        let side = if dc > 0 {
            CastleSide::Kingside
        } else {
            CastleSide::Queenside
        };
        if dr == 0 && dc.abs() == 2 && self.can_castle(king, from, side) {
            return Some(MoveFlags::CASTLING);
        }
        None
    }

    /// Every castling precondition, including the safety of the squares the
    /// king starts on, crosses and lands on.
    fn can_castle(&self, king: Piece, from: Square, side: CastleSide) -> bool {
        let color = king.color;
        if king.has_moved || !self.castling_rights.has(color, side) {
            return false;
        }

        let rook_sq = Square::new(from.row, side.rook_col());
        match self.board.piece_at(rook_sq) {
            Some(rook) if rook.is(color, PieceType::Rook) && !rook.has_moved => {}
            _ => return false,
        }

        let step = side.step();
        let mut sq = from.offset(0, step);
        while sq != rook_sq {
            if !sq.is_on_board() || !self.board.is_empty(sq) {
                return false;
            }
            sq = sq.offset(0, step);
        }

        if self.board.is_in_check(color) {
            return false;
        }
        (1..=2).all(|i| {
            let mut probe = self.board;
            probe.take(from);
            probe.set(from.offset(0, i * step), king);
            !probe.is_in_check(color)
        })
    }

    // -----------------------------------------------------------------------
    // Applying moves
    // -----------------------------------------------------------------------

    /// The position after `piece` makes the already-classified move `mv`.
    ///
    /// Applies every side effect: rook relocation, en-passant removal,
    /// promotion, castling-rights revocation, clocks, last move and turn.
    /// Does not check whether the mover's king is left in check.
    pub fn play(&self, piece: Piece, mv: Move, flags: MoveFlags) -> Position {
        let mut next = *self;
        let color = piece.color;
        let board = &mut next.board;

        board.take(mv.from);
        let mut landed = Piece {
            has_moved: true,
            ..piece
        };
        if flags.is_promotion() {
            landed.kind = mv.promotion_kind();
        }
        board.set(mv.to, landed);

        if flags.is_en_passant() {
            board.take(Square::new(mv.from.row, mv.to.col));
        }

        if flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv.from, mv.to);
            if let Some(rook) = board.take(rook_from) {
                board.set(
                    rook_to,
                    Piece {
                        has_moved: true,
                        ..rook
                    },
                );
            }
        }

        // ---- Castling rights: one-way revocation ----
        match piece.kind {
            PieceType::King => next.castling_rights.revoke_all(color),
            PieceType::Rook => {
                if mv.from.row == color.home_row()
                    && let Some(side) = CastleSide::from_rook_col(mv.from.col)
                {
                    next.castling_rights.revoke(color, side);
                }
            }
            _ => {}
        }
        if flags.is_capture()
            && mv.to.row == (!color).home_row()
            && let Some(side) = CastleSide::from_rook_col(mv.to.col)
        {
            next.castling_rights.revoke(!color, side);
        }

        // ---- Clocks ----
        if piece.kind == PieceType::Pawn || flags.is_capture() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }
        if color == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }

        next.last_move = Some((mv.from, mv.to));
        next.side_to_move = !color;
        next
    }

    /// The piece a classified move removes, and where it stood.
    pub fn captured_piece(&self, mv: Move, flags: MoveFlags) -> Option<(Square, Piece)> {
        let sq = if flags.is_en_passant() {
            Square::new(mv.from.row, mv.to.col)
        } else {
            mv.to
        };
        self.board.piece_at(sq).map(|p| (sq, p))
    }

    /// Full legality check for the side to move.
    pub fn try_move(&self, mv: Move) -> Result<PlayedMove, MoveRejection> {
        if !mv.from.is_on_board() || !mv.to.is_on_board() {
            return Err(MoveRejection::OffBoard);
        }
        let piece = self
            .board
            .piece_at(mv.from)
            .ok_or(MoveRejection::EmptySquare)?;
        if piece.color != self.side_to_move {
            return Err(MoveRejection::WrongTurn);
        }
        self.try_move_piece(piece, mv)
    }

    /// Legality check for `piece` regardless of whose turn it is.
    pub fn try_move_piece(&self, piece: Piece, mv: Move) -> Result<PlayedMove, MoveRejection> {
        let flags = self
            .classify(piece, mv.from, mv.to)
            .ok_or(MoveRejection::IllegalMovement)?;
        let next = self.play(piece, mv, flags);
        if next.board.is_in_check(piece.color) {
            return Err(MoveRejection::LeavesKingInCheck);
        }
        Ok(PlayedMove {
            mv,
            piece,
            flags,
            captured: self.captured_piece(mv, flags),
            next,
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

/// For a castling king move, return (rook_from, rook_to).
pub fn castling_rook_squares(king_from: Square, king_to: Square) -> (Square, Square) {
    let side = if king_to.col > king_from.col {
        CastleSide::Kingside
    } else {
        CastleSide::Queenside
    };
    (
        Square::new(king_from.row, side.rook_col()),
        king_from.offset(0, side.step()),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
