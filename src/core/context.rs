//! Plain-text training context handed to the coaching service.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

use crate::core::store::AppState;
use crate::core::{dates, lookup};
use crate::models::Dated;

pub const DEFAULT_DAYS: u32 = 30;

/// Whether a record's day falls inside the window. Days are compared at
/// midnight against `now - days`, so the oldest partial day drops out.
fn in_window(date: NaiveDate, cutoff: NaiveDateTime) -> bool {
    date.and_hms_opt(0, 0, 0).is_some_and(|midnight| midnight >= cutoff)
}

fn recent<'a, T: Dated>(items: &'a [T], cutoff: NaiveDateTime) -> Vec<&'a T> {
    let mut out: Vec<&T> = items.iter().filter(|i| in_window(i.date(), cutoff)).collect();
    out.sort_by_key(|i| i.date());
    out
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Render the last `days` days of records as fixed-label text blocks.
pub fn build(
    state: &AppState,
    body_weight_kg: Option<f64>,
    now: DateTime<Local>,
    days: u32,
) -> String {
    let cutoff = now.naive_local() - Duration::days(days as i64);
    let mut out = String::new();

    let weight = body_weight_kg
        .map(|w| format!("{} kg", fmt_num(w)))
        .unwrap_or_else(|| "unknown".to_string());
    out.push_str(&format!("ATHLETE BODY WEIGHT: {}\n", weight));
    out.push_str(&format!(
        "PERIOD: last {} days up to {}\n",
        days,
        dates::date_key(now.date_naive())
    ));

    out.push_str("\nCARDIO HISTORY:\n");
    let cardio = recent(&state.cardio_sessions, cutoff);
    if cardio.is_empty() {
        out.push_str("- none\n");
    }
    for s in cardio {
        let mut line = format!(
            "- {} | {} ({}) | {} km | {} min | {} m elevation | effort {}/10",
            dates::date_key(s.date),
            lookup::cardio_type_label(&state.cardio_types, &s.cardio_type_name),
            s.mode,
            fmt_num(s.distance),
            fmt_num(s.duration),
            fmt_num(s.elevation),
            s.effort
        );
        if let Some(hr) = s.heart_rate {
            line.push_str(&format!(" | HR {}", hr));
        }
        if let Some(p) = s.power {
            line.push_str(&format!(" | {} W", p));
        }
        if !s.intervals.is_empty() {
            line.push_str(&format!(" | {} intervals", s.intervals.len()));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str("\nSTRENGTH HISTORY:\n");
    let mut strength = recent(&state.strength_sets, cutoff);
    strength.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.session_name.cmp(&b.session_name))
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.set_number.cmp(&b.set_number))
    });
    if strength.is_empty() {
        out.push_str("- none\n");
    }
    for e in strength {
        out.push_str(&format!(
            "- {} | {} | {} | set {} | {} kg x {}\n",
            dates::date_key(e.date),
            e.session_name,
            e.exercise_name,
            e.set_number,
            fmt_num(e.weight),
            e.reps
        ));
    }

    out.push_str("\nNUTRITION HISTORY:\n");
    let nutrition = recent(&state.nutrient_logs, cutoff);
    if nutrition.is_empty() {
        out.push_str("- none\n");
    }
    for log in nutrition {
        let totals: Vec<String> = log
            .totals
            .iter()
            .map(|(id, total)| {
                format!(
                    "{}: {} {}",
                    lookup::nutrient_label(&state.nutrients, id),
                    fmt_num(*total),
                    lookup::nutrient_unit(&state.nutrients, id)
                )
                .trim_end()
                .to_string()
            })
            .collect();
        out.push_str(&format!("- {} | {}\n", dates::date_key(log.date), totals.join(", ")));
    }

    out.push_str("\nSLEEP HISTORY:\n");
    let sleep = recent(&state.sleep, cutoff);
    if sleep.is_empty() {
        out.push_str("- none\n");
    }
    for s in sleep {
        out.push_str(&format!(
            "- {} | score {} | {} h\n",
            dates::date_key(s.date),
            s.score,
            fmt_num(s.hours)
        ));
    }

    out
}
