//! Game directory: creates games and resolves the latest one.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRecord, NewGameRecord, schema};

/// Stateless gateway over the games table. Every call receives an
/// explicit connection so the caller controls the transaction boundary.
#[derive(Debug, Clone, Copy)]
pub struct GameDirectory;

impl GameDirectory {
    /// Creates a new game started at the given time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the insert fails.
    #[instrument(skip(conn))]
    pub fn create(
        conn: &mut SqliteConnection,
        started_at: NaiveDateTime,
    ) -> Result<GameRecord, DbError> {
        let game = diesel::insert_into(schema::games::table)
            .values(&NewGameRecord::new(started_at))
            .returning(GameRecord::as_returning())
            .get_result(conn)?;

        info!(game_id = game.id(), "Game created");
        Ok(game)
    }

    /// Resolves the most recently created game (highest id; ids are
    /// assigned monotonically). `None` if no game exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    #[instrument(skip(conn))]
    pub fn find_latest(conn: &mut SqliteConnection) -> Result<Option<GameRecord>, DbError> {
        let game = schema::games::table
            .order(schema::games::id.desc())
            .first::<GameRecord>(conn)
            .optional()?;

        debug!(found = game.is_some(), "Latest game lookup");
        Ok(game)
    }
}
