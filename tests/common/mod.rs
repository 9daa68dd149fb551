#![allow(dead_code)]

use chrono::NaiveDate;
use liftlog::core::store::{AppState, Store};
use liftlog::db::Database;
use liftlog::models::{CardioMode, CardioSession, StrengthSetEntry};
use std::rc::Rc;
use tempfile::TempDir;

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

/// A store backed by a fresh temporary database, persisting every change.
pub fn setup_store() -> (TempDir, Rc<Database>, Store) {
    let (dir, db) = setup_db();
    let db = Rc::new(db);
    let store = Store::open(Rc::clone(&db)).unwrap();
    (dir, db, store)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One strength set; order 0, tonnage computed.
pub fn make_set(
    date: NaiveDate,
    session: &str,
    exercise: &str,
    weight: f64,
    reps: u32,
    set_number: u32,
) -> StrengthSetEntry {
    StrengthSetEntry::new(
        date,
        session.to_string(),
        exercise.to_string(),
        0,
        weight,
        reps,
        set_number,
    )
}

/// The sets from the two "Push A" workouts of January 2024.
pub fn push_a_sets() -> Vec<StrengthSetEntry> {
    vec![
        make_set(day(2024, 1, 10), "Push A", "Bench Press", 50.0, 8, 1),
        make_set(day(2024, 1, 10), "Push A", "Bench Press", 60.0, 8, 2),
        make_set(day(2024, 1, 10), "Push A", "Bench Press", 70.0, 8, 3),
        make_set(day(2024, 1, 12), "Push A", "Bench Press", 65.0, 8, 1),
    ]
}

pub fn make_cardio(id: &str, date: NaiveDate, type_name: &str, distance: f64) -> CardioSession {
    CardioSession {
        id: id.to_string(),
        date,
        cardio_type_name: type_name.to_string(),
        mode: CardioMode::Continuous,
        distance,
        duration: distance * 6.0,
        elevation: 0.0,
        heart_rate: None,
        power: None,
        cadence: None,
        calories: None,
        intervals: Vec::new(),
        notes: None,
        effort: 5,
    }
}

pub fn state_with_sets(sets: Vec<StrengthSetEntry>) -> AppState {
    AppState {
        strength_sets: sets,
        ..AppState::default()
    }
}
