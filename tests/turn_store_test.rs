//! Tests for the game directory and turn history store.

use chrono::NaiveDate;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use reversi_server::{Board, Disc, GameDirectory, Move, TurnStore};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a connection.
fn setup_test_db() -> (NamedTempFile, SqliteConnection) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    (db_file, conn)
}

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 28)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

#[test]
fn test_create_game() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");
    assert!(*game.id() > 0);
    assert_eq!(*game.started_at(), timestamp());
}

#[test]
fn test_find_latest_none_before_any_game() {
    let (_db, mut conn) = setup_test_db();
    let latest = GameDirectory::find_latest(&mut conn).expect("Query failed");
    assert!(latest.is_none());
}

#[test]
fn test_find_latest_returns_most_recent_game() {
    let (_db, mut conn) = setup_test_db();
    let first = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");
    let second = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let latest = GameDirectory::find_latest(&mut conn)
        .expect("Query failed")
        .expect("Game missing");
    assert_eq!(latest.id(), second.id());
    assert!(second.id() > first.id());
}

#[test]
fn test_append_and_find_round_trip() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let board = Board::initial();
    let appended = TurnStore::append(
        &mut conn,
        *game.id(),
        0,
        &board,
        Disc::Dark,
        None,
        timestamp(),
    )
    .expect("Append failed");

    let found = TurnStore::find_by_game_and_count(&mut conn, *game.id(), 0)
        .expect("Query failed")
        .expect("Turn missing");
    assert_eq!(found.id(), appended.id());
    assert_eq!(*found.turn_count(), 0);
    assert_eq!(found.next_disc_value().expect("valid disc"), Disc::Dark);

    let loaded = TurnStore::load_board(&mut conn, *found.id()).expect("Load failed");
    assert_eq!(loaded, board, "snapshot must round-trip unchanged");
}

#[test]
fn test_append_with_move_record() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    TurnStore::append(
        &mut conn,
        *game.id(),
        0,
        &Board::initial(),
        Disc::Dark,
        None,
        timestamp(),
    )
    .expect("Append failed");

    let board = Board::initial();
    let mv = Move {
        disc: Disc::Dark,
        x: 4,
        y: 2,
    };
    TurnStore::append(&mut conn, *game.id(), 1, &board, Disc::Light, Some(mv), timestamp())
        .expect("Append with move failed");

    let latest = TurnStore::latest_turn_count(&mut conn, *game.id()).expect("Query failed");
    assert_eq!(latest, Some(1));
}

#[test]
fn test_duplicate_turn_count_is_unique_violation() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let board = Board::initial();
    TurnStore::append(&mut conn, *game.id(), 0, &board, Disc::Dark, None, timestamp())
        .expect("First append failed");

    let err = TurnStore::append(&mut conn, *game.id(), 0, &board, Disc::Dark, None, timestamp())
        .expect_err("Duplicate append must fail");
    assert!(err.unique_violation, "duplicate turn must be a unique violation");
}

#[test]
fn test_same_turn_count_allowed_across_games() {
    let (_db, mut conn) = setup_test_db();
    let first = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");
    let second = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let board = Board::initial();
    TurnStore::append(&mut conn, *first.id(), 0, &board, Disc::Dark, None, timestamp())
        .expect("Append failed");
    TurnStore::append(&mut conn, *second.id(), 0, &board, Disc::Dark, None, timestamp())
        .expect("Same index in another game must succeed");
}

#[test]
fn test_find_missing_turn_returns_none() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let found =
        TurnStore::find_by_game_and_count(&mut conn, *game.id(), 3).expect("Query failed");
    assert!(found.is_none());
}

#[test]
fn test_latest_turn_count_none_without_turns() {
    let (_db, mut conn) = setup_test_db();
    let game = GameDirectory::create(&mut conn, timestamp()).expect("Create failed");

    let latest = TurnStore::latest_turn_count(&mut conn, *game.id()).expect("Query failed");
    assert!(latest.is_none());
}
