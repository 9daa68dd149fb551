use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::StrengthSetEntry;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub tonnage: f64,
    pub set_count: u32,
}

/// Daily tonnage for the `window_days` calendar days ending at `today`,
/// both ends inclusive, oldest first. Days without training are zero.
///
/// Returns `None` when there is nothing to chart: no entries at all, an
/// empty window, or a window reaching past the earliest representable date.
pub fn compute_volume_time_series(
    entries: &[StrengthSetEntry],
    window_days: u32,
    today: NaiveDate,
) -> Option<Vec<VolumePoint>> {
    if entries.is_empty() || window_days == 0 {
        return None;
    }
    let start = today.checked_sub_days(Days::new(u64::from(window_days) - 1))?;

    let mut per_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for e in entries.iter().filter(|e| e.date >= start && e.date <= today) {
        let day = per_day.entry(e.date).or_insert((0.0, 0));
        day.0 += e.tonnage;
        day.1 += 1;
    }

    let points = start
        .iter_days()
        .take(window_days as usize)
        .map(|date| {
            let (tonnage, set_count) = per_day.get(&date).copied().unwrap_or((0.0, 0));
            VolumePoint {
                date,
                tonnage,
                set_count,
            }
        })
        .collect();
    Some(points)
}

/// Total tonnage per exercise.
pub fn tonnage_by_exercise(entries: &[StrengthSetEntry]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for e in entries {
        *totals.entry(e.exercise_name.clone()).or_insert(0.0) += e.tonnage;
    }
    totals
}
