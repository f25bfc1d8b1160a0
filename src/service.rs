//! Game session coordinator.
//!
//! Orchestrates the game directory, turn history store, and rules engine.
//! Each operation opens its own connection and runs as a single database
//! transaction, so a read-compute-append cycle is all-or-nothing and a
//! partially written turn is never observable. There is no in-process
//! locking: the unique `(game_id, turn_count)` constraint is the sole
//! concurrency guard, and of two racing writers exactly one succeeds.

use chrono::Utc;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameDirectory, TurnStore};
use crate::error::EngineError;
use crate::game::{self, Board, Disc, Move, Outcome};

/// A reconstructed turn of the latest game, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct TurnView {
    /// Turn index within the game.
    turn_count: i32,
    /// Full board snapshot after this turn.
    board: Board,
    /// Next color to move; `Empty` once the game is finished.
    next_disc: Disc,
    /// `None` while in progress; once finished, the winning color or
    /// `Empty` for a draw.
    winner_disc: Option<Disc>,
}

/// Coordinates reads and writes of the latest game.
#[derive(Debug, Clone)]
pub struct GameCoordinator {
    db_path: String,
}

impl GameCoordinator {
    /// Creates a coordinator backed by the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests, but
    /// note each connection then sees its own database).
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating game coordinator");
        Self { db_path }
    }

    /// Establishes a database connection with pragmas applied.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("failed to connect to '{}': {}", self.db_path, e)))?;
        // A racing writer briefly holds the whole database; wait for it
        // instead of surfacing a spurious storage failure.
        diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut conn)?;
        diesel::sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;
        Ok(conn)
    }

    /// Starts a new game: creates the game row and writes turn 0 with the
    /// initial board and dark to move, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] if persistence fails; nothing
    /// partial is left behind.
    #[instrument(skip(self))]
    pub fn start_new_game(&self) -> Result<(), EngineError> {
        let now = Utc::now().naive_utc();
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let game = GameDirectory::create(conn, now)?;
            TurnStore::append(conn, *game.id(), 0, &Board::initial(), Disc::Dark, None, now)?;
            info!(game_id = game.id(), "New game started");
            Ok(())
        })
    }

    /// Loads the turn at `turn_count` of the latest game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no game exists or the game has
    /// no turn at that index, and [`EngineError::Storage`] on persistence
    /// failure.
    #[instrument(skip(self))]
    pub fn find_turn(&self, turn_count: i32) -> Result<TurnView, EngineError> {
        let mut conn = self.connection()?;

        conn.transaction(|conn| {
            let game = GameDirectory::find_latest(conn)?
                .ok_or_else(|| EngineError::not_found("no game has been started"))?;
            let turn = TurnStore::find_by_game_and_count(conn, *game.id(), turn_count)?
                .ok_or_else(|| {
                    EngineError::not_found(format!(
                        "turn {} of game {}",
                        turn_count,
                        game.id()
                    ))
                })?;

            let board = TurnStore::load_board(conn, *turn.id())?;
            let next_disc = turn.next_disc_value()?;
            let winner_disc = if next_disc == Disc::Empty {
                Some(game::winner(&board).unwrap_or(Disc::Empty))
            } else {
                None
            };

            Ok(TurnView::new(turn_count, board, next_disc, winner_disc))
        })
    }

    /// Registers a move as turn `turn_count` of the latest game.
    ///
    /// Loads the previous turn, verifies it is `disc`'s move, applies the
    /// move through the rules engine, resolves the next mover (or terminal
    /// state), and appends the new turn — all inside one transaction. The
    /// caller decides whether to resubmit after a failure.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] — no game, or no turn at `turn_count - 1`.
    /// - [`EngineError::OutOfTurn`] — `disc` is not the recorded next mover
    ///   (including moves submitted after the game finished).
    /// - [`EngineError::IllegalMove`] — placement violates the rules.
    /// - [`EngineError::Conflict`] — a turn already exists at `turn_count`.
    /// - [`EngineError::Storage`] — persistence failed; the transaction is
    ///   rolled back.
    #[instrument(skip(self))]
    pub fn register_turn(
        &self,
        turn_count: i32,
        disc: Disc,
        x: i32,
        y: i32,
    ) -> Result<(), EngineError> {
        let (ux, uy) = match (usize::try_from(x), usize::try_from(y)) {
            (Ok(ux), Ok(uy)) => (ux, uy),
            _ => {
                return Err(EngineError::IllegalMove {
                    disc,
                    x: x as i64,
                    y: y as i64,
                    reason: "coordinate out of range 0-7".to_string(),
                });
            }
        };

        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            let game = GameDirectory::find_latest(conn)?
                .ok_or_else(|| EngineError::not_found("no game has been started"))?;
            let game_id = *game.id();

            let previous = TurnStore::find_by_game_and_count(conn, game_id, turn_count - 1)?
                .ok_or_else(|| {
                    EngineError::not_found(format!(
                        "turn {} of game {} (cannot register turn {})",
                        turn_count - 1,
                        game_id,
                        turn_count
                    ))
                })?;

            let expected = previous.next_disc_value()?;
            if expected != disc {
                return Err(EngineError::OutOfTurn {
                    expected,
                    submitted: disc,
                });
            }

            let board = TurnStore::load_board(conn, *previous.id())?;
            let next_board = game::apply_move(&board, disc, ux, uy)?;

            let next_disc = match game::resolve_outcome(&next_board, disc) {
                Outcome::Continue(next) => next,
                Outcome::Finished(winner) => {
                    info!(game_id, turn_count, ?winner, "Game finished");
                    Disc::Empty
                }
            };

            let mv = Move { disc, x: ux, y: uy };
            let now = Utc::now().naive_utc();
            TurnStore::append(conn, game_id, turn_count, &next_board, next_disc, Some(mv), now)
                .map_err(|e| {
                    if e.unique_violation {
                        EngineError::Conflict {
                            game_id,
                            turn_count,
                        }
                    } else {
                        EngineError::storage(e)
                    }
                })?;

            info!(
                game_id,
                turn_count,
                disc = disc.code(),
                x = ux,
                y = uy,
                next_disc = next_disc.code(),
                "Turn registered"
            );
            Ok(())
        })
    }
}
