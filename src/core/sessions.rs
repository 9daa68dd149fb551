use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::{dates, lookup};
use crate::models::{Dated, RoutineDefinition, StrengthSetEntry};

/// One strength workout: every set sharing a (date, session name) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub key: String,
    pub date: NaiveDate,
    pub session_name: String,
    pub color: String,
    pub tonnage: f64,
    pub exercise_count: usize,
    pub set_count: usize,
    pub entries: Vec<StrengthSetEntry>,
}

impl Dated for SessionSummary {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Composite key identifying a session.
pub fn session_key(date: NaiveDate, session_name: &str) -> String {
    format!("{}|{}", dates::date_key(date), session_name)
}

/// Group flat set entries into session summaries, newest first.
///
/// Sessions on the same day are ordered by name. Member entries are sorted by
/// exercise order then set number, so the summed tonnage does not depend on the
/// order the entries were logged in.
pub fn group_sessions_by_key(
    entries: &[StrengthSetEntry],
    routines: &[RoutineDefinition],
) -> Vec<SessionSummary> {
    let mut groups: BTreeMap<(NaiveDate, &str), Vec<StrengthSetEntry>> = BTreeMap::new();
    for e in entries {
        groups
            .entry((e.date, e.session_name.as_str()))
            .or_default()
            .push(e.clone());
    }

    let mut sessions: Vec<SessionSummary> = groups
        .into_iter()
        .map(|((date, name), mut members)| {
            members.sort_by(|a, b| {
                a.order
                    .cmp(&b.order)
                    .then_with(|| a.exercise_name.cmp(&b.exercise_name))
                    .then_with(|| a.set_number.cmp(&b.set_number))
            });
            let tonnage = members.iter().map(|m| m.tonnage).sum();
            let exercise_count = members
                .iter()
                .map(|m| m.exercise_name.as_str())
                .collect::<BTreeSet<_>>()
                .len();
            SessionSummary {
                key: session_key(date, name),
                date,
                session_name: name.to_string(),
                color: lookup::routine_color(routines, name),
                tonnage,
                exercise_count,
                set_count: members.len(),
                entries: members,
            }
        })
        .collect();

    sessions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.session_name.cmp(&b.session_name))
    });
    sessions
}

/// Items sharing a calendar month, used for list section headers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthBucket<T> {
    pub key: String,
    pub label: String,
    pub items: Vec<T>,
}

/// Bucket items by (month, year), preserving their input order both across and
/// within buckets.
pub fn bucket_by_calendar_month<T: Dated + Clone>(items: &[T]) -> Vec<MonthBucket<T>> {
    let mut buckets: Vec<MonthBucket<T>> = Vec::new();
    for item in items {
        let key = dates::month_key(item.date());
        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.items.push(item.clone()),
            None => buckets.push(MonthBucket {
                key,
                label: dates::month_label(item.date()),
                items: vec![item.clone()],
            }),
        }
    }
    buckets
}

/// Distinct exercise names, alphabetically.
pub fn exercise_names(entries: &[StrengthSetEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.exercise_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(date: (i32, u32, u32), session: &str, exercise: &str, w: f64, set_no: u32) -> StrengthSetEntry {
        let d = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        StrengthSetEntry::new(d, session.into(), exercise.into(), 0, w, 5, set_no)
    }

    #[test]
    fn same_day_sessions_sort_by_name() {
        let entries = vec![
            set((2024, 1, 10), "Pull", "Row", 50.0, 1),
            set((2024, 1, 10), "Legs", "Squat", 100.0, 1),
        ];
        let sessions = group_sessions_by_key(&entries, &[]);
        assert_eq!(sessions[0].session_name, "Legs");
        assert_eq!(sessions[1].session_name, "Pull");
        assert_eq!(sessions[0].color, "slate");
    }

    #[test]
    fn buckets_keep_descending_input_order() {
        let entries = vec![
            set((2024, 2, 3), "A", "Row", 50.0, 1),
            set((2024, 1, 20), "A", "Row", 50.0, 1),
            set((2024, 1, 5), "A", "Row", 50.0, 1),
        ];
        let sessions = group_sessions_by_key(&entries, &[]);
        let buckets = bucket_by_calendar_month(&sessions);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "February 2024");
        assert_eq!(buckets[1].key, "2024-01");
        assert_eq!(buckets[1].items[0].date, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
    }

    #[test]
    fn exercise_names_are_distinct_and_sorted() {
        let entries = vec![
            set((2024, 1, 1), "A", "Squat", 1.0, 1),
            set((2024, 1, 1), "A", "Bench", 1.0, 1),
            set((2024, 1, 2), "A", "Squat", 1.0, 1),
        ];
        assert_eq!(exercise_names(&entries), vec!["Bench", "Squat"]);
    }
}
