use anyhow::Result;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::export::ImportedSet;
use crate::core::lookup;
use crate::core::store::{Patch, Store};
use crate::models::{CardioMode, CardioSession, IntervalSegment, SleepEntry, StrengthSetEntry};

/// One set as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct SetInput {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

/// Parse `WEIGHTxREPS`, e.g. `62.5x8`.
pub fn parse_set_spec(spec: &str) -> Result<(f64, u32)> {
    let (w, r) = spec
        .trim()
        .split_once(['x', 'X', '*'])
        .ok_or_else(|| anyhow::anyhow!("invalid set: {} (expected WEIGHTxREPS, e.g. 60x8)", spec))?;
    let weight: f64 = w
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid weight in set: {}", spec))?;
    let reps: u32 = r
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid reps in set: {}", spec))?;
    Ok((weight, reps))
}

/// Log sets into a session. Set numbers continue from sets already logged for
/// the same exercise in the same session. An exercise keeps its position in
/// the session once it has one; new exercises take their routine position, or
/// go after everything else.
pub fn log_sets(
    store: &mut Store,
    date: NaiveDate,
    session_name: &str,
    sets: &[SetInput],
) -> Result<Vec<StrengthSetEntry>> {
    let session_name = session_name.trim();
    let state = store.state();
    let routine = lookup::routine(&state.routines, session_name);

    let mut orders: HashMap<String, u32> = HashMap::new();
    let mut last_set: HashMap<String, u32> = HashMap::new();
    for e in state
        .strength_sets
        .iter()
        .filter(|e| e.date == date && e.session_name == session_name)
    {
        orders.insert(e.exercise_name.clone(), e.order);
        let n = last_set.entry(e.exercise_name.clone()).or_insert(0);
        *n = (*n).max(e.set_number);
    }
    let mut next_order = orders
        .values()
        .map(|o| o + 1)
        .max()
        .unwrap_or(0)
        .max(routine.map(|r| r.exercises.len() as u32).unwrap_or(0));

    let mut entries = Vec::with_capacity(sets.len());
    for s in sets {
        let exercise = s.exercise.trim().to_string();
        let order = match orders.get(&exercise) {
            Some(o) => *o,
            None => {
                let o = match routine.and_then(|r| r.position_of(&exercise)) {
                    Some(pos) => pos,
                    None => {
                        next_order += 1;
                        next_order - 1
                    }
                };
                orders.insert(exercise.clone(), o);
                o
            }
        };
        let n = last_set.entry(exercise.clone()).or_insert(0);
        *n += 1;
        entries.push(StrengthSetEntry::new(
            date,
            session_name.to_string(),
            exercise,
            order,
            s.weight,
            s.reps,
            *n,
        ));
    }

    store.mutate(Patch::AddStrengthSets(entries.clone()))?;
    Ok(entries)
}

/// Recreate sets read from an exported CSV, keeping their order and numbering.
pub fn import_sets(store: &mut Store, rows: Vec<ImportedSet>) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }
    let entries: Vec<StrengthSetEntry> = rows
        .into_iter()
        .map(|r| {
            StrengthSetEntry::new(
                r.date,
                r.session_name,
                r.exercise_name,
                r.order,
                r.weight,
                r.reps,
                r.set_number,
            )
        })
        .collect();
    let report = store.mutate(Patch::AddStrengthSets(entries))?;
    Ok(report.affected)
}

#[derive(Debug, Clone, Default)]
pub struct CardioInput {
    pub date: Option<NaiveDate>,
    pub cardio_type: String,
    pub distance: f64,
    pub duration: f64,
    pub elevation: f64,
    pub heart_rate: Option<u32>,
    pub power: Option<u32>,
    pub cadence: Option<u32>,
    pub calories: Option<u32>,
    pub intervals: Vec<IntervalSegment>,
    pub notes: Option<String>,
    pub effort: u8,
}

/// Log a cardio session of a defined type. The mode comes from the type;
/// interval segments keep only the metrics the type tracks.
pub fn log_cardio(store: &mut Store, input: CardioInput, today: NaiveDate) -> Result<CardioSession> {
    let def = lookup::cardio_type(&store.state().cardio_types, &input.cardio_type)
        .ok_or_else(|| anyhow::anyhow!("unknown cardio type: {}", input.cardio_type))?
        .clone();
    for (name, v) in [
        ("distance", input.distance),
        ("duration", input.duration),
        ("elevation", input.elevation),
    ] {
        if !v.is_finite() || v < 0.0 {
            anyhow::bail!("invalid {}: {} (must be >= 0)", name, v);
        }
    }

    let intervals = if def.mode == CardioMode::Interval {
        input
            .intervals
            .into_iter()
            .enumerate()
            .map(|(i, seg)| {
                IntervalSegment {
                    set_number: i as u32 + 1,
                    ..seg
                }
                .retain_tracked(&def)
            })
            .filter(|seg| !seg.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    let session = CardioSession {
        id: Uuid::new_v4().to_string(),
        date: input.date.unwrap_or(today),
        cardio_type_name: def.name.clone(),
        mode: def.mode,
        distance: input.distance,
        duration: input.duration,
        elevation: input.elevation,
        heart_rate: input.heart_rate,
        power: input.power,
        cadence: input.cadence,
        calories: input.calories,
        intervals,
        notes: input.notes.filter(|n| !n.trim().is_empty()),
        effort: input.effort,
    };
    store.mutate(Patch::AddCardio(session.clone()))?;
    Ok(session)
}

/// Parse an interval segment such as `distance=0.4,duration=1.5,hr=165`.
pub fn parse_interval_spec(spec: &str) -> Result<IntervalSegment> {
    let mut seg = IntervalSegment::default();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (k, v) = part
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid interval field: {} (expected key=value)", part))?;
        let v = v.trim();
        let bad = || anyhow::anyhow!("invalid value for {}: {}", k, v);
        match k.trim() {
            "distance" => seg.distance = Some(v.parse().map_err(|_| bad())?),
            "duration" => seg.duration = Some(v.parse().map_err(|_| bad())?),
            "hr" | "heart_rate" => seg.heart_rate = Some(v.parse().map_err(|_| bad())?),
            "power" => seg.power = Some(v.parse().map_err(|_| bad())?),
            "speed" => seg.speed = Some(v.parse().map_err(|_| bad())?),
            "notes" => seg.notes = Some(v.to_string()),
            other => anyhow::bail!("unknown interval field: {}", other),
        }
    }
    Ok(seg)
}

/// Add to one nutrient's running total for a day. Returns the new total.
pub fn add_nutrient(store: &mut Store, date: NaiveDate, nutrient_id: &str, delta: f64) -> Result<f64> {
    if lookup::nutrient(&store.state().nutrients, nutrient_id).is_none() {
        anyhow::bail!("unknown nutrient: {}", nutrient_id);
    }
    store.mutate(Patch::AddNutrient {
        date,
        nutrient_id: nutrient_id.to_string(),
        delta,
    })?;
    let total = store
        .state()
        .nutrient_logs
        .iter()
        .find(|l| l.date == date)
        .and_then(|l| l.totals.get(nutrient_id).copied())
        .unwrap_or(delta);
    Ok(total)
}

/// Record the night's sleep, replacing any entry already logged for the day.
pub fn log_sleep(store: &mut Store, date: NaiveDate, score: u8, hours: f64) -> Result<SleepEntry> {
    if score > 100 {
        anyhow::bail!("invalid sleep score: {} (expected 0-100)", score);
    }
    let entry = SleepEntry { date, score, hours };
    store.mutate(Patch::LogSleep(entry.clone()))?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_spec_accepts_decimal_weights() {
        assert_eq!(parse_set_spec("62.5x8").unwrap(), (62.5, 8));
        assert_eq!(parse_set_spec(" 100 X 3 ").unwrap(), (100.0, 3));
        assert!(parse_set_spec("60").is_err());
        assert!(parse_set_spec("60x-1").is_err());
    }

    #[test]
    fn interval_spec_sets_named_fields() {
        let seg = parse_interval_spec("distance=0.4, duration=1.5,hr=165").unwrap();
        assert_eq!(seg.distance, Some(0.4));
        assert_eq!(seg.duration, Some(1.5));
        assert_eq!(seg.heart_rate, Some(165));
        assert!(parse_interval_spec("pace=4").is_err());
    }
}
