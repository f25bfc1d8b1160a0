//! Database models for games, turns, board snapshots, and moves.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};
use crate::game::Disc;

/// A played game. Immutable after creation, never deleted.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    started_at: NaiveDateTime,
}

/// Insertable game model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    started_at: NaiveDateTime,
}

/// One persisted turn: metadata for a full board snapshot. The snapshot
/// itself lives in the squares table, the producing move (turn_count > 0)
/// in the moves table. `(game_id, turn_count)` is unique.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::turns)]
#[diesel(belongs_to(GameRecord, foreign_key = game_id))]
pub struct TurnRecord {
    id: i32,
    game_id: i32,
    turn_count: i32,
    next_disc: i32,
    end_at: NaiveDateTime,
}

impl TurnRecord {
    /// Parses the stored next-mover code. `Empty` means the game was
    /// finished by this turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored code is not a valid disc value.
    pub fn next_disc_value(&self) -> Result<Disc, DbError> {
        Disc::from_code(self.next_disc)
            .map_err(|e| DbError::new(format!("corrupt turn {}: {}", self.id, e)))
    }
}

/// Insertable turn model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::turns)]
pub struct NewTurnRecord {
    game_id: i32,
    turn_count: i32,
    next_disc: i32,
    end_at: NaiveDateTime,
}

/// One cell of a turn's board snapshot (64 rows per turn).
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::squares)]
#[diesel(belongs_to(TurnRecord, foreign_key = turn_id))]
pub struct SquareRecord {
    id: i32,
    turn_id: i32,
    x: i32,
    y: i32,
    disc: i32,
}

/// Insertable square model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::squares)]
pub struct NewSquareRecord {
    turn_id: i32,
    x: i32,
    y: i32,
    disc: i32,
}

/// The move that produced a turn's snapshot from its predecessor.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(TurnRecord, foreign_key = turn_id))]
pub struct MoveRecord {
    id: i32,
    turn_id: i32,
    disc: i32,
    x: i32,
    y: i32,
}

/// Insertable move model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRecord {
    turn_id: i32,
    disc: i32,
    x: i32,
    y: i32,
}
