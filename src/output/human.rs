use colored::{ColoredString, Colorize};
use comfy_table::Table;

use crate::core::dates;
use crate::core::journal::{CardioJournalItem, NutritionDay};
use crate::core::progression::{ExerciseProgression, Trend};
use crate::core::sessions::{MonthBucket, SessionSummary};
use crate::core::volume::VolumePoint;
use crate::models::coaching::CoachingSummary;

pub fn trend_arrow(trend: Trend) -> ColoredString {
    match trend {
        Trend::Up => "▲".green(),
        Trend::Down => "▼".red(),
        Trend::Flat => "=".dimmed(),
    }
}

fn num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Strength timeline, one table per month.
pub fn format_sessions(buckets: &[MonthBucket<SessionSummary>]) -> String {
    let mut out = String::new();
    for bucket in buckets {
        out.push_str(&format!("{}\n", bucket.label.bold()));
        let mut table = Table::new();
        table.set_header(vec!["Date", "Session", "Exercises", "Sets", "Tonnage (kg)"]);
        for s in &bucket.items {
            table.add_row(vec![
                dates::date_key(s.date),
                s.session_name.clone(),
                s.exercise_count.to_string(),
                s.set_count.to_string(),
                num(s.tonnage),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    out.trim_end().to_string()
}

pub fn format_progression(p: &ExerciseProgression) -> String {
    let mut out = format!(
        "{}: best {} kg on {}\n\n",
        p.exercise.bold(),
        num(p.personal_record.weight),
        dates::date_key(p.personal_record.date)
    );
    for day in &p.history {
        let sets: Vec<String> = day
            .sets
            .iter()
            .map(|s| format!("{}x{}", num(s.weight), s.reps))
            .collect();
        out.push_str(&format!(
            "{} {} max {} kg  [{}]\n",
            dates::date_key(day.date),
            trend_arrow(day.trend),
            num(day.max_weight),
            sets.join(", ")
        ));
    }
    out.trim_end().to_string()
}

/// Daily tonnage as a horizontal bar chart.
pub fn format_volume(points: &[VolumePoint]) -> String {
    let peak = points.iter().map(|p| p.tonnage).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for p in points {
        let width = if peak > 0.0 {
            (p.tonnage / peak * 30.0).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{} {:>8} {}\n",
            p.date.format("%a %d"),
            num(p.tonnage),
            "█".repeat(width).cyan()
        ));
    }
    out.trim_end().to_string()
}

pub fn format_cardio(buckets: &[MonthBucket<CardioJournalItem>]) -> String {
    let mut out = String::new();
    for bucket in buckets {
        out.push_str(&format!("{}\n", bucket.label.bold()));
        let mut table = Table::new();
        table.set_header(vec!["Date", "Type", "Distance", "Duration", "Effort", "", "Id"]);
        for item in &bucket.items {
            let s = &item.session;
            table.add_row(vec![
                dates::date_key(s.date),
                item.label.clone(),
                format!("{} km", num(s.distance)),
                format!("{} min", num(s.duration)),
                format!("{}/10", s.effort),
                trend_arrow(item.distance_trend).to_string(),
                s.id.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    out.trim_end().to_string()
}

pub fn format_nutrition(days: &[NutritionDay]) -> String {
    let mut out = String::new();
    for day in days {
        out.push_str(&format!("--- {} ---\n", dates::date_key(day.date)));
        for line in &day.lines {
            let goal = line
                .goal_ratio
                .map(|r| format!("  ({:.0}% of goal)", r * 100.0))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {} = {} {}{}\n",
                line.label,
                num(line.total),
                line.unit,
                goal
            ));
        }
    }
    out.trim_end().to_string()
}

pub fn format_summary(s: &CoachingSummary) -> String {
    let mut out = format!("{}\n\n{}\n", s.headline.bold(), s.advice);
    out.push_str(&format!("\nTrend: {}", s.trend));
    if let Some(score) = s.score {
        out.push_str(&format!("  Score: {:.0}/100", score));
    }
    if let Some(pr) = &s.personal_record {
        out.push_str(&format!("\nPersonal record: {}", pr));
    }
    for c in &s.sources {
        out.push_str(&format!("\n  - {} <{}>", c.title, c.url));
    }
    out
}
