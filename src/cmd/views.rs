use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use liftlog::core::dates;
use liftlog::core::journal;
use liftlog::core::progression;
use liftlog::core::sessions::{self, MonthBucket};
use liftlog::core::volume;
use liftlog::output::human;

use super::{open_store, print_ok};

pub fn run_sessions(month: Option<&str>, human_flag: bool) -> Result<()> {
    let store = open_store()?;
    let state = store.state();
    let summaries = sessions::group_sessions_by_key(&state.strength_sets, &state.routines);
    let mut buckets = sessions::bucket_by_calendar_month(&summaries);
    if let Some(m) = month {
        let key = dates::parse_month_key(m)?;
        buckets.retain(|b| b.key == key);
    }

    if human_flag {
        if buckets.is_empty() {
            println!("No sessions logged");
        } else {
            println!("{}", human::format_sessions(&buckets));
        }
    } else {
        print_ok("sessions", json!({ "months": buckets }))?;
    }
    Ok(())
}

pub fn run_progress(exercise: Option<&str>, human_flag: bool) -> Result<()> {
    let store = open_store()?;
    let entries = &store.state().strength_sets;

    let Some(exercise) = exercise else {
        let names = sessions::exercise_names(entries);
        if human_flag {
            if names.is_empty() {
                println!("No exercises logged");
            }
            for n in &names {
                println!("{}", n);
            }
        } else {
            print_ok("progress", json!({ "exercises": names }))?;
        }
        return Ok(());
    };

    let result = progression::compute_exercise_progression(entries, exercise);
    if human_flag {
        match &result {
            Some(p) => println!("{}", human::format_progression(p)),
            None => println!("No data for '{}'", exercise),
        }
    } else {
        print_ok("progress", json!({ "exercise": exercise, "progression": result }))?;
    }
    Ok(())
}

pub fn run_volume(days: u32, today: NaiveDate, human_flag: bool) -> Result<()> {
    let store = open_store()?;
    let entries = &store.state().strength_sets;
    let points = volume::compute_volume_time_series(entries, days, today);

    if human_flag {
        match &points {
            Some(p) => println!("{}", human::format_volume(p)),
            None => println!("No training volume to show"),
        }
    } else {
        let total: f64 = points.iter().flatten().map(|p| p.tonnage).sum();
        print_ok(
            "volume",
            json!({ "days": days, "end": dates::date_key(today), "total": total, "points": points }),
        )?;
    }
    Ok(())
}

pub fn run_cardio(human_flag: bool) -> Result<()> {
    let store = open_store()?;
    let state = store.state();
    let items = journal::cardio_timeline(&state.cardio_sessions, &state.cardio_types);
    let buckets: Vec<MonthBucket<journal::CardioJournalItem>> =
        sessions::bucket_by_calendar_month(&items);

    if human_flag {
        if buckets.is_empty() {
            println!("No cardio sessions logged");
        } else {
            println!("{}", human::format_cardio(&buckets));
        }
    } else {
        print_ok("cardio", json!({ "months": buckets }))?;
    }
    Ok(())
}

pub fn run_nutrition(human_flag: bool) -> Result<()> {
    let store = open_store()?;
    let state = store.state();
    let days = journal::nutrition_journal(&state.nutrient_logs, &state.nutrients);

    if human_flag {
        if days.is_empty() {
            println!("No nutrition logged");
        } else {
            println!("{}", human::format_nutrition(&days));
        }
    } else {
        print_ok("nutrition", json!({ "days": days }))?;
    }
    Ok(())
}
