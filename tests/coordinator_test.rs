//! Tests for the game session coordinator: the read and write paths over
//! a real database.

use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use reversi_server::{Disc, EngineError, GameCoordinator, legal_moves};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a coordinator.
fn setup() -> (NamedTempFile, GameCoordinator) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    (db_file, GameCoordinator::new(db_path))
}

#[test]
fn new_game_writes_initial_turn() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let view = coordinator.find_turn(0).expect("Turn 0 missing");
    let board = view.board();
    assert_eq!(board.get(3, 3), Some(Disc::Dark));
    assert_eq!(board.get(4, 4), Some(Disc::Dark));
    assert_eq!(board.get(3, 4), Some(Disc::Light));
    assert_eq!(board.get(4, 3), Some(Disc::Light));
    assert_eq!(board.count(Disc::Empty), 60);
    assert_eq!(*view.next_disc(), Disc::Dark);
    assert!(view.winner_disc().is_none());
}

#[test]
fn read_path_is_idempotent() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let first = coordinator.find_turn(0).expect("Read failed");
    let second = coordinator.find_turn(0).expect("Read failed");
    assert_eq!(first, second);
}

#[test]
fn registering_the_canonical_opening_move() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    coordinator
        .register_turn(1, Disc::Dark, 4, 2)
        .expect("Opening move failed");

    let view = coordinator.find_turn(1).expect("Turn 1 missing");
    let board = view.board();
    assert_eq!(board.get(4, 2), Some(Disc::Dark));
    assert_eq!(board.get(4, 3), Some(Disc::Dark), "light at (4,3) flips");
    assert_eq!(board.get(3, 3), Some(Disc::Dark));
    assert_eq!(board.get(3, 4), Some(Disc::Light));
    assert_eq!(board.get(4, 4), Some(Disc::Dark));
    assert_eq!(*view.next_disc(), Disc::Light);
    assert!(view.winner_disc().is_none());
}

#[test]
fn occupied_cell_is_rejected() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let err = coordinator.register_turn(1, Disc::Dark, 3, 3).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
}

#[test]
fn negative_coordinate_is_rejected() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let err = coordinator.register_turn(1, Disc::Dark, -1, 2).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
}

#[test]
fn wrong_color_is_out_of_turn() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let err = coordinator.register_turn(1, Disc::Light, 2, 4).unwrap_err();
    assert!(matches!(
        err,
        EngineError::OutOfTurn {
            expected: Disc::Dark,
            submitted: Disc::Light,
        }
    ));
}

#[test]
fn reading_past_latest_turn_is_not_found() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");
    coordinator
        .register_turn(1, Disc::Dark, 4, 2)
        .expect("Move failed");

    let err = coordinator.find_turn(5).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn skipping_ahead_is_not_found() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let err = coordinator.register_turn(3, Disc::Dark, 4, 2).unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn operations_without_a_game_are_not_found() {
    let (_db, coordinator) = setup();

    assert!(matches!(
        coordinator.find_turn(0).unwrap_err(),
        EngineError::NotFound { .. }
    ));
    assert!(matches!(
        coordinator.register_turn(1, Disc::Dark, 4, 2).unwrap_err(),
        EngineError::NotFound { .. }
    ));
}

#[test]
fn duplicate_registration_is_a_conflict() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    coordinator
        .register_turn(1, Disc::Dark, 4, 2)
        .expect("First registration failed");
    let err = coordinator.register_turn(1, Disc::Dark, 2, 4).unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));

    // The stored turn is the first submission, untouched.
    let view = coordinator.find_turn(1).expect("Turn 1 missing");
    assert_eq!(view.board().get(4, 2), Some(Disc::Dark));
    assert_eq!(view.board().get(2, 4), Some(Disc::Empty));
}

#[test]
fn racing_registrations_yield_one_conflict() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let a = coordinator.clone();
    let b = coordinator.clone();
    let ta = std::thread::spawn(move || a.register_turn(1, Disc::Dark, 4, 2));
    let tb = std::thread::spawn(move || b.register_turn(1, Disc::Dark, 2, 4));
    let results = [ta.join().expect("thread a"), tb.join().expect("thread b")];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racing write may win");
    let conflict = results
        .iter()
        .any(|r| matches!(r, Err(EngineError::Conflict { .. })));
    assert!(conflict, "the loser must observe a conflict: {results:?}");
}

#[test]
fn registration_targets_the_latest_game() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");
    coordinator
        .register_turn(1, Disc::Dark, 4, 2)
        .expect("Move failed");

    // A fresh game resets the readable history to its own turn 0.
    coordinator.start_new_game().expect("Second start failed");
    let view = coordinator.find_turn(0).expect("Turn 0 missing");
    assert_eq!(*view.next_disc(), Disc::Dark);
    assert!(matches!(
        coordinator.find_turn(1).unwrap_err(),
        EngineError::NotFound { .. }
    ));
}

#[test]
fn playthrough_terminates_with_a_consistent_winner() {
    let (_db, coordinator) = setup();
    coordinator.start_new_game().expect("Start failed");

    let mut turn_count = 0;
    loop {
        let view = coordinator.find_turn(turn_count).expect("Read failed");
        let next = *view.next_disc();

        if next == Disc::Empty {
            let winner = view.winner_disc().expect("finished game has a result");
            let dark = view.board().count(Disc::Dark);
            let light = view.board().count(Disc::Light);
            match winner {
                Disc::Dark => assert!(dark > light),
                Disc::Light => assert!(light > dark),
                Disc::Empty => assert_eq!(dark, light),
            }
            break;
        }

        // The engine never hands the turn to a color without a move.
        let moves = legal_moves(view.board(), next);
        assert!(!moves.is_empty(), "next mover must have a legal move");

        let (x, y) = moves[0];
        coordinator
            .register_turn(turn_count + 1, next, x as i32, y as i32)
            .expect("Scripted move failed");
        turn_count += 1;
        assert!(turn_count <= 120, "game failed to terminate");
    }
}
