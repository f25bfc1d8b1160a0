//! Engine error taxonomy.
//!
//! Every failure the engine can produce is one of these variants, with
//! enough structure for the transport layer to map it to a user-facing
//! status. The engine never retries or swallows an error.

use crate::db::DbError;
use crate::game::Disc;
use derive_more::{Display, Error};

/// Errors raised by the game engine and its coordinator.
#[derive(Debug, Clone, Display, Error)]
pub enum EngineError {
    /// Referenced game or turn does not exist.
    #[display("not found: {message}")]
    NotFound {
        /// What was looked up and missed.
        message: String,
    },

    /// Move violates placement or flip rules.
    #[display("illegal move: {disc:?} at ({x}, {y}): {reason}")]
    IllegalMove {
        /// The color that attempted the move.
        disc: Disc,
        /// Submitted column.
        x: i64,
        /// Submitted row.
        y: i64,
        /// Which rule the placement violated.
        reason: String,
    },

    /// Submitted disc does not match the recorded next mover.
    #[display("out of turn: next to move is {expected:?}, got {submitted:?}")]
    OutOfTurn {
        /// The color recorded as next to move.
        expected: Disc,
        /// The color the caller submitted.
        submitted: Disc,
    },

    /// A turn already exists at this (game, turn count). The caller should
    /// refetch the latest state before retrying.
    #[display("turn {turn_count} of game {game_id} is already registered")]
    Conflict {
        /// Game the duplicate write targeted.
        game_id: i32,
        /// Turn index of the duplicate write.
        turn_count: i32,
    },

    /// Underlying persistence failed or the transaction aborted.
    #[display("storage failure: {source}")]
    Storage {
        /// The database error that caused the failure.
        source: DbError,
    },
}

impl EngineError {
    /// Wraps a database error as a storage failure.
    pub fn storage(source: DbError) -> Self {
        Self::Storage { source }
    }

    /// Builds a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(source: DbError) -> Self {
        Self::Storage { source }
    }
}

// Required so diesel transaction closures can surface commit/rollback
// failures as engine errors.
impl From<diesel::result::Error> for EngineError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Storage {
            source: DbError::from(err),
        }
    }
}
