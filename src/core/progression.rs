use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::StrengthSetEntry;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Compare a value with its predecessor.
pub fn classify_trend(current: f64, previous: f64) -> Trend {
    if current > previous {
        Trend::Up
    } else if current < previous {
        Trend::Down
    } else {
        Trend::Flat
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub trend: Trend,
    pub sets: Vec<StrengthSetEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalRecord {
    pub weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExerciseProgression {
    pub exercise: String,
    /// Daily maxima, oldest first.
    pub points: Vec<ProgressPoint>,
    /// Newest first, each day flagged against the previous training day.
    pub history: Vec<HistoryDay>,
    pub personal_record: PersonalRecord,
}

/// Build the progression of one exercise from all logged sets.
///
/// Returns `None` when the exercise has never been performed.
pub fn compute_exercise_progression(
    entries: &[StrengthSetEntry],
    exercise_name: &str,
) -> Option<ExerciseProgression> {
    let mut days: BTreeMap<NaiveDate, Vec<StrengthSetEntry>> = BTreeMap::new();
    for e in entries.iter().filter(|e| e.exercise_name == exercise_name) {
        days.entry(e.date).or_default().push(e.clone());
    }
    if days.is_empty() {
        return None;
    }

    let mut chronological: Vec<HistoryDay> = Vec::with_capacity(days.len());
    let mut previous: Option<f64> = None;
    for (date, mut sets) in days {
        sets.sort_by_key(|s| s.set_number);
        let max_weight = sets.iter().map(|s| s.weight).fold(f64::NEG_INFINITY, f64::max);
        let trend = previous
            .map(|p| classify_trend(max_weight, p))
            .unwrap_or(Trend::Flat);
        previous = Some(max_weight);
        chronological.push(HistoryDay {
            date,
            max_weight,
            trend,
            sets,
        });
    }

    let points = chronological
        .iter()
        .map(|d| ProgressPoint {
            date: d.date,
            max_weight: d.max_weight,
        })
        .collect();

    // First day the top weight was reached.
    let mut personal_record = PersonalRecord {
        weight: chronological[0].max_weight,
        date: chronological[0].date,
    };
    for d in &chronological {
        if d.max_weight > personal_record.weight {
            personal_record = PersonalRecord {
                weight: d.max_weight,
                date: d.date,
            };
        }
    }

    chronological.reverse();
    Some(ExerciseProgression {
        exercise: exercise_name.to_string(),
        points,
        history: chronological,
        personal_record,
    })
}
