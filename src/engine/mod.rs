pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod position;
pub mod snapshot;
pub mod types;

pub use board::Board;
pub use game::{Game, GameSummary, MoveOutcome};
pub use movegen::{has_legal_moves, legal_moves, legal_moves_from};
pub use notation::{parse_move, parse_square};
pub use position::{PlayedMove, Position};
pub use snapshot::Snapshot;
pub use types::*;
