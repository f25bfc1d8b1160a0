//! Turn history store: an ordered, append-only log of turns per game.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, NewMoveRecord, NewSquareRecord, NewTurnRecord, SquareRecord, TurnRecord, schema,
};
use crate::game::{BOARD_SIZE, Board, Disc, Move};

/// Stateless gateway over the turns, squares, and moves tables. Callers
/// wrap reads and appends in a transaction so a partially written turn is
/// never observable.
#[derive(Debug, Clone, Copy)]
pub struct TurnStore;

impl TurnStore {
    /// Appends an immutable turn: the turn row, the 64-cell board
    /// snapshot, and the producing move (absent for turn 0).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] with `unique_violation` set if a turn already
    /// exists at this `(game_id, turn_count)`, or a plain [`DbError`] on
    /// any other failure.
    #[instrument(skip(conn, board, mv))]
    pub fn append(
        conn: &mut SqliteConnection,
        game_id: i32,
        turn_count: i32,
        board: &Board,
        next_disc: Disc,
        mv: Option<Move>,
        end_at: NaiveDateTime,
    ) -> Result<TurnRecord, DbError> {
        let turn = diesel::insert_into(schema::turns::table)
            .values(&NewTurnRecord::new(
                game_id,
                turn_count,
                next_disc.code(),
                end_at,
            ))
            .returning(TurnRecord::as_returning())
            .get_result(conn)?;

        let squares: Vec<NewSquareRecord> = board
            .iter_cells()
            .map(|(x, y, disc)| NewSquareRecord::new(*turn.id(), x as i32, y as i32, disc.code()))
            .collect();
        diesel::insert_into(schema::squares::table)
            .values(&squares)
            .execute(conn)?;

        if let Some(mv) = mv {
            diesel::insert_into(schema::moves::table)
                .values(&NewMoveRecord::new(
                    *turn.id(),
                    mv.disc.code(),
                    mv.x as i32,
                    mv.y as i32,
                ))
                .execute(conn)?;
        }

        info!(
            turn_id = turn.id(),
            game_id,
            turn_count,
            next_disc = next_disc.code(),
            "Turn appended"
        );
        Ok(turn)
    }

    /// Looks up the turn at `(game_id, turn_count)`. `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    #[instrument(skip(conn))]
    pub fn find_by_game_and_count(
        conn: &mut SqliteConnection,
        game_id: i32,
        turn_count: i32,
    ) -> Result<Option<TurnRecord>, DbError> {
        let turn = schema::turns::table
            .filter(schema::turns::game_id.eq(game_id))
            .filter(schema::turns::turn_count.eq(turn_count))
            .first::<TurnRecord>(conn)
            .optional()?;

        debug!(game_id, turn_count, found = turn.is_some(), "Turn lookup");
        Ok(turn)
    }

    /// Reconstructs the board snapshot stored for a turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or the snapshot is not a
    /// complete, valid 8x8 grid.
    #[instrument(skip(conn))]
    pub fn load_board(conn: &mut SqliteConnection, turn_id: i32) -> Result<Board, DbError> {
        let squares = schema::squares::table
            .filter(schema::squares::turn_id.eq(turn_id))
            .load::<SquareRecord>(conn)?;

        if squares.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(DbError::new(format!(
                "turn {} snapshot has {} squares, expected {}",
                turn_id,
                squares.len(),
                BOARD_SIZE * BOARD_SIZE
            )));
        }

        let mut board = Board::empty();
        for square in &squares {
            let (x, y) = (*square.x() as usize, *square.y() as usize);
            if x >= BOARD_SIZE || y >= BOARD_SIZE {
                return Err(DbError::new(format!(
                    "turn {} snapshot has cell out of range at ({}, {})",
                    turn_id, x, y
                )));
            }
            let disc = Disc::from_code(*square.disc())
                .map_err(|e| DbError::new(format!("corrupt square {}: {}", square.id(), e)))?;
            board.set(x, y, disc);
        }
        Ok(board)
    }

    /// Highest turn count recorded for a game, or `None` if the game has
    /// no turns yet (which should never happen past creation).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    #[instrument(skip(conn))]
    pub fn latest_turn_count(
        conn: &mut SqliteConnection,
        game_id: i32,
    ) -> Result<Option<i32>, DbError> {
        let latest = schema::turns::table
            .filter(schema::turns::game_id.eq(game_id))
            .select(diesel::dsl::max(schema::turns::turn_count))
            .first::<Option<i32>>(conn)?;

        debug!(game_id, ?latest, "Latest turn count");
        Ok(latest)
    }
}
