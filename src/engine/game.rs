//! Stateful game controller wrapping Position.
//!
//! `Game` owns the current position, both capture lists, the check counter
//! for the optional check-limit house rule, and the derived game status.
//! It is the type the console session talks to.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::position::{Position, castling_rook_squares};
use crate::engine::snapshot::Snapshot;
use crate::engine::types::{
    CastlingRights, ChessError, Color, DrawReason, GameStatus, Move, MoveFlags, Piece, Square,
};

/// Half-move clock value at which the game is drawn.
pub const FIFTY_MOVE_LIMIT: u32 = 50;

// =========================================================================
// MoveOutcome
// =========================================================================

/// Everything a committed move changed.
#[derive(Clone, Debug)]
pub struct MoveOutcome {
    pub mv: Move,
    /// The piece as it stood before moving (a pawn for promotions).
    pub piece: Piece,
    pub flags: MoveFlags,
    pub captured: Option<(Square, Piece)>,
    /// Every square whose contents differ from before the move.
    pub changed: Vec<Square>,
    pub board: Board,
    /// Whether the side now on move is in check.
    pub gives_check: bool,
    pub status: GameStatus,
}

// =========================================================================
// GameSummary
// =========================================================================

/// Serializable view of a game for JSON export.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: String,
    pub created_at: String,
    pub side_to_move: Color,
    pub status: String,
    pub board: [[String; 8]; 8],
    pub white_captures: String,
    pub black_captures: String,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub castling: String,
    pub checks_given: u32,
}

// =========================================================================
// Game
// =========================================================================

/// A two-player game with capture tracking and status detection.
#[derive(Clone, Debug)]
pub struct Game {
    // Core state
    position: Position,
    /// Symbols of the pieces each side has taken, oldest first.
    captures: [Vec<char>; 2],

    // Status
    status: GameStatus,
    checks_given: u32,
    check_limit: Option<u32>,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::with_check_limit(None)
    }

    /// A new game that ends once `limit` checks have been given in total.
    /// `None` or `Some(0)` plays standard chess.
    pub fn with_check_limit(limit: Option<u32>) -> Self {
        let game = Self::fresh(Position::starting(), limit);
        tracing::info!(game_id = %game.id, check_limit = ?game.check_limit, "new game");
        game
    }

    /// A game resuming from a saved snapshot with `side_to_move` on move,
    /// under the same house rule as [`Game::with_check_limit`].
    pub fn from_snapshot(snapshot: Snapshot, side_to_move: Color, limit: Option<u32>) -> Self {
        let mut game = Self::fresh(snapshot.into_position(side_to_move), limit);
        game.status = game.compute_status();
        tracing::info!(
            game_id = %game.id,
            check_limit = ?game.check_limit,
            status = game.status.as_str(),
            "game resumed from snapshot"
        );
        game
    }

    fn fresh(position: Position, limit: Option<u32>) -> Self {
        Self {
            position,
            captures: [Vec::new(), Vec::new()],
            status: GameStatus::Active,
            checks_given: 0,
            check_limit: limit.filter(|&n| n > 0),
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Start over from the initial position, keeping the house rule.
    pub fn reset(&mut self) {
        *self = Self::with_check_limit(self.check_limit);
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    /// Pieces taken by `captor`, oldest first.
    pub fn captures(&self, captor: Color) -> &[char] {
        &self.captures[captor.index()]
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.position.castling_rights
    }

    /// Squares of the previous ply, if any.
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.position.last_move
    }

    pub fn checks_given(&self) -> u32 {
        self.checks_given
    }

    pub fn check_limit(&self) -> Option<u32> {
        self.check_limit
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.position)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.position, sq)
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Validate and commit a move for the side to move.
    ///
    /// On any error the game is left exactly as it was.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        let played = self.position.try_move(mv).map_err(|reason| {
            tracing::debug!(game_id = %self.id, %mv, %reason, "move rejected");
            ChessError::rejected(mv, reason)
        })?;

        let mover = played.piece.color;
        if let Some((_, victim)) = played.captured {
            self.captures[mover.index()].push(victim.symbol());
        }

        let mut changed = vec![mv.from, mv.to];
        if let Some((sq, _)) = played.captured
            && sq != mv.to
        {
            changed.push(sq);
        }
        if played.flags.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv.from, mv.to);
            changed.extend([rook_from, rook_to]);
        }

        self.position = played.next;
        let gives_check = self.position.board.is_in_check(!mover);
        if gives_check {
            self.checks_given += 1;
        }
        self.status = self.compute_status();

        tracing::debug!(
            game_id = %self.id,
            %mv,
            piece = %played.piece,
            capture = played.flags.is_capture(),
            status = %self.status,
            "move applied"
        );

        Ok(MoveOutcome {
            mv,
            piece: played.piece,
            flags: played.flags,
            captured: played.captured,
            changed,
            board: self.position.board,
            gives_check,
            status: self.status,
        })
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    pub fn is_in_check(&self, color: Color) -> bool {
        self.position.board.is_in_check(color)
    }

    pub fn has_legal_moves(&self, color: Color) -> bool {
        movegen::has_legal_moves(&self.position, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_moves(color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_moves(color)
    }

    /// No capture or pawn move for fifty plies.
    pub fn is_draw(&self) -> bool {
        self.position.halfmove_clock >= FIFTY_MOVE_LIMIT
    }

    fn compute_status(&self) -> GameStatus {
        let side = self.position.side_to_move;
        let in_check = self.is_in_check(side);

        if !self.has_legal_moves(side) {
            return if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }

        if self.is_draw() {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }

        // The counter only grows on the move that gives check, so the
        // limit is always reached by the side that just moved.
        if let Some(limit) = self.check_limit
            && self.checks_given >= limit
        {
            return GameStatus::CheckLimit { winner: !side };
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }

    // -----------------------------------------------------------------
    // Save / load
    // -----------------------------------------------------------------

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::from_position(&self.position)
    }

    /// Replace the position with a snapshot. The side to move is kept,
    /// capture lists and the check counter start empty.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.position = snapshot.into_position(self.position.side_to_move);
        self.captures = [Vec::new(), Vec::new()];
        self.checks_given = 0;
        self.status = self.compute_status();
    }

    pub fn save(&self, path: &Path) -> Result<(), ChessError> {
        self.to_snapshot().save(path)?;
        tracing::info!(game_id = %self.id, path = %path.display(), "game saved");
        Ok(())
    }

    /// Load a saved game. On error the current game is untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), ChessError> {
        let snapshot = Snapshot::load(path)?;
        self.load_snapshot(snapshot);
        tracing::info!(
            game_id = %self.id,
            path = %path.display(),
            status = %self.status,
            "game loaded"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Board array / summary (for JSON export)
    // -----------------------------------------------------------------

    /// Generate an 8×8 board array (row-major, rank 8 first → rank 1 last).
    /// Empty squares are empty strings. Pieces are like "wP", "bK", etc.
    pub fn board_array(&self) -> [[String; 8]; 8] {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| {
                match self.position.board.piece_at(Square::new(row as i8, col as i8)) {
                    Some(p) => {
                        let c = match p.color {
                            Color::White => 'w',
                            Color::Black => 'b',
                        };
                        format!("{c}{}", p.kind.to_char(Color::White))
                    }
                    None => String::new(),
                }
            })
        })
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            created_at: self.created_at.to_rfc3339(),
            side_to_move: self.side_to_move(),
            status: self.status.to_string(),
            board: self.board_array(),
            white_captures: self.captures(Color::White).iter().collect(),
            black_captures: self.captures(Color::Black).iter().collect(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
            castling: self.castling_rights().to_letters(),
            checks_given: self.checks_given,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
