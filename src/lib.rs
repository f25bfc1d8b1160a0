//! Turn-sourced Reversi game server.
//!
//! Persists a two-player Othello/Reversi game as an append-only sequence
//! of turns, each holding a full board snapshot plus the move that
//! produced it. The board at any turn count is independently reproducible
//! and auditable; no record is ever overwritten.
//!
//! # Architecture
//!
//! - **Game**: pure board value type and rules engine (legality, flips,
//!   forced passes, end-of-game detection)
//! - **Db**: diesel/SQLite gateways for games and turn history, taking an
//!   explicit connection per call
//! - **Service**: the coordinator tying rules to storage, one transaction
//!   per operation
//! - **Server**: a thin axum shell mapping HTTP to coordinator calls

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod db;
mod error;
mod game;
mod server;
mod service;

// Crate-level exports - configuration
pub use cli::Cli;

// Crate-level exports - persistence
pub use db::{
    DbError, GameDirectory, GameRecord, MoveRecord, SquareRecord, TurnRecord, TurnStore,
};

// Crate-level exports - error taxonomy
pub use error::EngineError;

// Crate-level exports - board and rules
pub use game::{
    BOARD_SIZE, Board, Disc, InvalidDiscError, Move, Outcome, apply_move, flips_for, is_legal,
    legal_moves, resolve_outcome, winner,
};

// Crate-level exports - transport
pub use server::router;

// Crate-level exports - coordination
pub use service::{GameCoordinator, TurnView};
