use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use liftlog::core::dates;
use liftlog::core::logging::{self, CardioInput, SetInput};
use liftlog::core::lookup;

use super::{open_store, print_ok};
use crate::cli::LogCommand;

pub fn run(what: LogCommand, today: NaiveDate, human: bool) -> Result<()> {
    let mut store = open_store()?;

    match what {
        LogCommand::Set {
            session,
            exercise,
            sets,
        } => {
            let inputs = sets
                .iter()
                .map(|spec| {
                    let (weight, reps) = logging::parse_set_spec(spec)?;
                    Ok(SetInput {
                        exercise: exercise.clone(),
                        weight,
                        reps,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let entries = logging::log_sets(&mut store, today, &session, &inputs)?;
            if human {
                for e in &entries {
                    println!(
                        "Logged: {} | {} | {} set {} = {}x{} ({} kg)",
                        dates::date_key(e.date),
                        e.session_name,
                        e.exercise_name,
                        e.set_number,
                        e.weight,
                        e.reps,
                        e.tonnage
                    );
                }
            } else {
                print_ok("log", json!({ "entries": entries }))?;
            }
        }
        LogCommand::Cardio {
            cardio_type,
            distance,
            duration,
            elevation,
            heart_rate,
            power,
            cadence,
            calories,
            intervals,
            notes,
            effort,
        } => {
            let intervals = intervals
                .iter()
                .map(|spec| logging::parse_interval_spec(spec))
                .collect::<Result<Vec<_>>>()?;
            let session = logging::log_cardio(
                &mut store,
                CardioInput {
                    date: Some(today),
                    cardio_type,
                    distance,
                    duration,
                    elevation,
                    heart_rate,
                    power,
                    cadence,
                    calories,
                    intervals,
                    notes,
                    effort,
                },
                today,
            )?;
            if human {
                println!(
                    "Logged: {} {} {} km in {} min (effort {}/10)",
                    dates::date_key(session.date),
                    session.cardio_type_name,
                    session.distance,
                    session.duration,
                    session.effort
                );
            } else {
                print_ok("log", json!({ "entry": session }))?;
            }
        }
        LogCommand::Sleep { score, hours } => {
            let entry = logging::log_sleep(&mut store, today, score, hours)?;
            if human {
                println!(
                    "Logged: {} sleep {} h (score {})",
                    dates::date_key(entry.date),
                    entry.hours,
                    entry.score
                );
            } else {
                print_ok("log", json!({ "entry": entry }))?;
            }
        }
        LogCommand::Nutrient { nutrient, amount } => {
            let id = resolve_nutrient_id(&store, &nutrient)?;
            let total = logging::add_nutrient(&mut store, today, &id, amount)?;
            let label = lookup::nutrient_label(&store.state().nutrients, &id);
            let unit = lookup::nutrient_unit(&store.state().nutrients, &id);
            if human {
                println!("Logged: {} +{} {} (today: {} {})", label, amount, unit, total, unit);
            } else {
                print_ok(
                    "log",
                    json!({
                        "date": dates::date_key(today),
                        "nutrient_id": id,
                        "nutrient": label,
                        "added": amount,
                        "total": total,
                        "unit": unit,
                    }),
                )?;
            }
        }
    }
    Ok(())
}

/// Accept either a nutrient id or its display name.
fn resolve_nutrient_id(store: &liftlog::core::store::Store, input: &str) -> Result<String> {
    let defs = &store.state().nutrients;
    defs.iter()
        .find(|n| n.id == input)
        .or_else(|| defs.iter().find(|n| n.name.eq_ignore_ascii_case(input)))
        .map(|n| n.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown nutrient: {}", input))
}
