//! Pure Reversi domain: board value type and rules engine.

mod board;
mod rules;
mod types;

pub use board::{BOARD_SIZE, Board};
pub use rules::{Outcome, apply_move, flips_for, is_legal, legal_moves, resolve_outcome, winner};
pub use types::{Disc, InvalidDiscError, Move};
