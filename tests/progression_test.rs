mod common;

use common::{day, make_set};
use liftlog::core::progression::{Trend, classify_trend, compute_exercise_progression};
use liftlog::core::volume::{compute_volume_time_series, tonnage_by_exercise};

/// Scenario: daily maxima 50, 55, 55, 52 flag flat, up, flat, down
#[test]
fn test_trend_flags_follow_daily_max() {
    let sets = vec![
        make_set(day(2024, 4, 1), "A", "Squat", 50.0, 5, 1),
        make_set(day(2024, 4, 1), "A", "Squat", 45.0, 5, 2),
        make_set(day(2024, 4, 3), "A", "Squat", 55.0, 5, 1),
        make_set(day(2024, 4, 5), "A", "Squat", 55.0, 5, 1),
        make_set(day(2024, 4, 8), "A", "Squat", 52.0, 5, 1),
        make_set(day(2024, 4, 8), "A", "Bench", 80.0, 5, 1),
    ];
    let p = compute_exercise_progression(&sets, "Squat").unwrap();

    let maxima: Vec<f64> = p.points.iter().map(|pt| pt.max_weight).collect();
    assert_eq!(maxima, vec![50.0, 55.0, 55.0, 52.0]);

    let chronological: Vec<Trend> = p.history.iter().rev().map(|d| d.trend).collect();
    assert_eq!(
        chronological,
        vec![Trend::Flat, Trend::Up, Trend::Flat, Trend::Down]
    );
    assert_eq!(p.history[0].date, day(2024, 4, 8));
    assert_eq!(p.history.last().unwrap().sets.len(), 2);
}

#[test]
fn test_personal_record_is_first_day_at_top_weight() {
    let sets = vec![
        make_set(day(2024, 4, 1), "A", "Squat", 50.0, 5, 1),
        make_set(day(2024, 4, 3), "A", "Squat", 55.0, 5, 1),
        make_set(day(2024, 4, 5), "A", "Squat", 55.0, 5, 1),
    ];
    let p = compute_exercise_progression(&sets, "Squat").unwrap();
    assert_eq!(p.personal_record.weight, 55.0);
    assert_eq!(p.personal_record.date, day(2024, 4, 3));
}

#[test]
fn test_progression_without_data_is_none() {
    assert!(compute_exercise_progression(&[], "Squat").is_none());
    let sets = vec![make_set(day(2024, 4, 1), "A", "Bench", 80.0, 5, 1)];
    assert!(compute_exercise_progression(&sets, "Squat").is_none());
}

#[test]
fn test_classify_trend() {
    assert_eq!(classify_trend(5.0, 4.0), Trend::Up);
    assert_eq!(classify_trend(4.0, 5.0), Trend::Down);
    assert_eq!(classify_trend(5.0, 5.0), Trend::Flat);
}

#[test]
fn test_volume_window_is_inclusive_and_zero_filled() {
    let today = day(2024, 5, 10);
    let sets = vec![
        make_set(day(2024, 5, 10), "A", "Squat", 100.0, 5, 1),
        make_set(day(2024, 5, 10), "A", "Squat", 100.0, 5, 2),
        make_set(day(2024, 5, 8), "A", "Bench", 60.0, 10, 1),
        make_set(day(2024, 5, 4), "A", "Bench", 60.0, 10, 1),
        make_set(day(2024, 5, 3), "A", "Bench", 60.0, 10, 1),
    ];
    let points = compute_volume_time_series(&sets, 7, today).unwrap();

    assert_eq!(points.len(), 7);
    assert_eq!(points[0].date, day(2024, 5, 4));
    assert_eq!(points[0].tonnage, 600.0);
    assert_eq!(points[4].date, day(2024, 5, 8));
    assert_eq!(points[4].tonnage, 600.0);
    assert_eq!(points[5].tonnage, 0.0);
    assert_eq!(points[6].tonnage, 1000.0);
    assert_eq!(points[6].set_count, 2);
}

#[test]
fn test_volume_without_data_is_none() {
    let today = day(2024, 5, 10);
    assert!(compute_volume_time_series(&[], 7, today).is_none());
    let sets = vec![make_set(today, "A", "Squat", 100.0, 5, 1)];
    assert!(compute_volume_time_series(&sets, 0, today).is_none());
}

#[test]
fn test_volume_window_past_calendar_start_is_none() {
    let today = day(2024, 5, 10);
    let sets = vec![make_set(today, "A", "Squat", 100.0, 5, 1)];
    assert!(compute_volume_time_series(&sets, u32::MAX, today).is_none());
}

#[test]
fn test_tonnage_by_exercise() {
    let sets = vec![
        make_set(day(2024, 5, 1), "A", "Squat", 100.0, 5, 1),
        make_set(day(2024, 5, 2), "B", "Squat", 100.0, 3, 1),
        make_set(day(2024, 5, 2), "B", "Bench", 50.0, 10, 1),
    ];
    let totals = tonnage_by_exercise(&sets);
    assert_eq!(totals["Squat"], 800.0);
    assert_eq!(totals["Bench"], 500.0);
}
