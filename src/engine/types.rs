use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a pawn advance. White moves toward row 0.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this side's king and rooks at the start.
    #[inline]
    pub const fn home_row(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Row of this side's pawns at the start.
    #[inline]
    pub const fn pawn_row(self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Capitalised name for prompts ("White", "Black").
    pub fn title(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a piece character; the case decides the colour.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((color, piece))
    }

    /// Whether a pawn may promote into this kind.
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight
        )
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A coloured piece. `has_moved` only matters for kings and rooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    pub has_moved: bool,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece {
            color,
            kind,
            has_moved: false,
        }
    }

    pub fn symbol(self) -> char {
        self.kind.to_char(self.color)
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        PieceType::from_char(c).map(|(color, kind)| Piece::new(color, kind))
    }

    #[inline]
    pub fn is(self, color: Color, kind: PieceType) -> bool {
        self.color == color && self.kind == kind
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square addressed by `(row, col)`.
///
/// Row 0 is rank 8 (Black's back rank) and row 7 is rank 1; col 0 is the
/// a-file. Coordinates are signed so off-board squares can be represented
/// and rejected by [`Square::is_on_board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Square { row, col }
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Self {
        Square::new(self.row + dr, self.col + dc)
    }

    /// Every on-board square, row 0 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8i8).flat_map(|row| (0..8i8).map(move |col| Square::new(row, col)))
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Square::new(7 - rank as i8, file as i8))
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4". Off-board squares render as "??".
    pub fn to_algebraic(self) -> String {
        if !self.is_on_board() {
            return "??".to_string();
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = (b'8' - self.row as u8) as char;
        format!("{file}{rank}")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Flags for special move types packed in a single byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const CASTLING: MoveFlags = MoveFlags(4);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);
    pub const PROMOTION: MoveFlags = MoveFlags(16);

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & Self::CAPTURE.0 != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & Self::EN_PASSANT.0 != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & Self::CASTLING.0 != 0
    }

    #[inline]
    pub fn is_double_push(self) -> bool {
        self.0 & Self::DOUBLE_PUSH.0 != 0
    }

    #[inline]
    pub fn is_promotion(self) -> bool {
        self.0 & Self::PROMOTION.0 != 0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for MoveFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move request: from-square, to-square and an optional promotion choice.
///
/// The promotion choice is only consulted when a pawn reaches the last row;
/// anything other than Q/R/B/N falls back to a queen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// The piece kind a promoting pawn becomes.
    pub fn promotion_kind(self) -> PieceType {
        match self.promotion {
            Some(kind) if kind.is_promotion_target() => kind,
            _ => PieceType::Queen,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.to_char(Color::White))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Which wing a castle goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Column of the rook this side castles with.
    #[inline]
    pub const fn rook_col(self) -> i8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column direction the king travels.
    #[inline]
    pub const fn step(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }

    /// The side whose rook starts in `col`, if any.
    pub fn from_rook_col(col: i8) -> Option<Self> {
        match col {
            7 => Some(CastleSide::Kingside),
            0 => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
///
/// Rights are only ever removed once a game is under way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Bit order used by the save format: WK, WQ, BK, BQ.
    const ORDER: [u8; 4] = [
        Self::WHITE_KINGSIDE,
        Self::WHITE_QUEENSIDE,
        Self::BLACK_KINGSIDE,
        Self::BLACK_QUEENSIDE,
    ];

    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::bit(color, side);
    }

    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }

    /// Whether `color` may still castle on either wing.
    #[inline]
    pub fn any(self, color: Color) -> bool {
        self.has(color, CastleSide::Kingside) || self.has(color, CastleSide::Queenside)
    }

    /// The four flags in save-format order.
    pub fn flags(self) -> [bool; 4] {
        Self::ORDER.map(|bit| self.0 & bit != 0)
    }

    pub fn from_flags(flags: [bool; 4]) -> Self {
        let mut rights = 0u8;
        for (bit, set) in Self::ORDER.into_iter().zip(flags) {
            if set {
                rights |= bit;
            }
        }
        CastlingRights(rights)
    }

    /// Letters in the familiar "KQkq" style, "-" when none remain.
    pub fn to_letters(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        "KQkq"
            .chars()
            .zip(self.flags())
            .filter_map(|(c, set)| set.then_some(c))
            .collect()
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_letters())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Current status of a game, from the point of view of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
    /// House rule: the configured number of checks has been given.
    CheckLimit { winner: Color },
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw(reason) => reason.as_str(),
            GameStatus::CheckLimit { .. } => "check_limit",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate
                | GameStatus::Stalemate
                | GameStatus::Draw(_)
                | GameStatus::CheckLimit { .. }
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reason for a draw. Only the no-progress rule is tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
}

impl DrawReason {
    pub fn as_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
        }
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Why a move request was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("square is off the board")]
    OffBoard,

    #[error("no piece on the source square")]
    EmptySquare,

    #[error("piece belongs to the side not on move")]
    WrongTurn,

    #[error("piece cannot move that way")]
    IllegalMovement,

    #[error("move leaves own king in check")]
    LeavesKingInCheck,
}

/// Domain errors for the chess engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid move: {from} -> {to}: {reason}")]
    InvalidMove {
        from: String,
        to: String,
        reason: MoveRejection,
    },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("invalid saved game: {0}")]
    InvalidSnapshot(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("save file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChessError {
    pub(crate) fn rejected(mv: Move, reason: MoveRejection) -> Self {
        ChessError::InvalidMove {
            from: mv.from.to_algebraic(),
            to: mv.to.to_algebraic(),
            reason,
        }
    }

    /// The rejection reason, when this error is a refused move.
    pub fn rejection(&self) -> Option<MoveRejection> {
        match self {
            ChessError::InvalidMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_geometry() {
        assert_eq!(Color::White.forward(), -1);
        assert_eq!(Color::Black.forward(), 1);
        assert_eq!(Color::White.home_row(), 7);
        assert_eq!(Color::Black.pawn_row(), 1);
    }

    #[test]
    fn piece_symbols() {
        for pt in PieceType::ALL {
            let white = Piece::new(Color::White, pt);
            let black = Piece::new(Color::Black, pt);
            assert!(white.symbol().is_ascii_uppercase());
            assert!(black.symbol().is_ascii_lowercase());
            assert_eq!(Piece::from_symbol(white.symbol()), Some(white));
            assert_eq!(Piece::from_symbol(black.symbol()), Some(black));
        }
        assert_eq!(Piece::from_symbol('.'), None);
        assert_eq!(Piece::from_symbol('x'), None);
    }

    #[test]
    fn square_is_on_board_matches_bounds() {
        for row in -3i8..11 {
            for col in -3i8..11 {
                let expected = (0..8).contains(&row) && (0..8).contains(&col);
                assert_eq!(Square::new(row, col).is_on_board(), expected);
            }
        }
    }

    #[test]
    fn square_from_algebraic_uses_inverted_rows() {
        assert_eq!(Square::from_algebraic("a8"), Some(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic("h1"), Some(Square::new(7, 7)));
        assert_eq!(Square::from_algebraic("e2"), Some(Square::new(6, 4)));
        assert_eq!(Square::from_algebraic("e4"), Some(Square::new(4, 4)));
    }

    #[test]
    fn square_from_algebraic_invalid() {
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("a"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a0"), None);
        assert_eq!(Square::from_algebraic("abc"), None);
    }

    #[test]
    fn square_algebraic_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
        assert_eq!(Square::all().count(), 64);
        assert_eq!(Square::new(8, 0).to_algebraic(), "??");
    }

    #[test]
    fn move_promotion_defaults_to_queen() {
        let from = Square::from_algebraic("d7").unwrap();
        let to = Square::from_algebraic("d8").unwrap();
        assert_eq!(Move::new(from, to).promotion_kind(), PieceType::Queen);
        assert_eq!(
            Move::with_promotion(from, to, PieceType::Knight).promotion_kind(),
            PieceType::Knight
        );
        assert_eq!(
            Move::with_promotion(from, to, PieceType::King).promotion_kind(),
            PieceType::Queen
        );
        assert_eq!(
            Move::with_promotion(from, to, PieceType::Rook).to_string(),
            "d7 d8=R"
        );
    }

    #[test]
    fn move_flags() {
        let flags = MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
        assert!(flags.is_capture());
        assert!(flags.is_en_passant());
        assert!(!flags.is_castling());
        assert!(!flags.is_double_push());
        assert!(!flags.is_promotion());
    }

    #[test]
    fn castling_rights_revoke() {
        let mut cr = CastlingRights::ALL;
        cr.revoke(Color::White, CastleSide::Kingside);
        assert!(!cr.has(Color::White, CastleSide::Kingside));
        assert!(cr.has(Color::White, CastleSide::Queenside));
        assert!(cr.any(Color::White));

        cr.revoke_all(Color::Black);
        assert!(!cr.any(Color::Black));
        assert_eq!(cr.to_letters(), "Q");
    }

    #[test]
    fn castling_rights_flags_order() {
        let cr = CastlingRights::from_flags([true, false, false, true]);
        assert!(cr.has(Color::White, CastleSide::Kingside));
        assert!(cr.has(Color::Black, CastleSide::Queenside));
        assert_eq!(cr.flags(), [true, false, false, true]);
        assert_eq!(cr.to_letters(), "Kq");
        assert_eq!(CastlingRights::NONE.to_letters(), "-");
    }

    #[test]
    fn game_status_is_game_over() {
        assert!(!GameStatus::Active.is_game_over());
        assert!(!GameStatus::Check.is_game_over());
        assert!(GameStatus::Checkmate.is_game_over());
        assert!(GameStatus::Stalemate.is_game_over());
        assert!(GameStatus::Draw(DrawReason::FiftyMoveRule).is_game_over());
        assert!(
            GameStatus::CheckLimit {
                winner: Color::White
            }
            .is_game_over()
        );
        assert_eq!(
            GameStatus::Draw(DrawReason::FiftyMoveRule).as_str(),
            "fifty_move_rule"
        );
    }

    #[test]
    fn error_messages() {
        let mv = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e5").unwrap(),
        );
        let err = ChessError::rejected(mv, MoveRejection::IllegalMovement);
        assert_eq!(
            err.to_string(),
            "invalid move: e2 -> e5: piece cannot move that way"
        );
        assert_eq!(err.rejection(), Some(MoveRejection::IllegalMovement));
    }
}
