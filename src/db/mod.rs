//! Database persistence layer for games and their turn history.

mod directory;
mod error;
mod models;
mod schema;
mod turn_store;

pub use directory::GameDirectory;
pub use error::DbError;
pub use models::{
    GameRecord, MoveRecord, NewGameRecord, NewMoveRecord, NewSquareRecord, NewTurnRecord,
    SquareRecord, TurnRecord,
};
pub use turn_store::TurnStore;
