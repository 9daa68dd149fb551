use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{dates, lookup};
use crate::models::{
    CardioSession, CardioTypeDefinition, IntervalSegment, NutrientDailyLog, NutrientDefinition,
    StrengthSetEntry,
};

pub const BOM: char = '\u{FEFF}';

/// A scalar CSV value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Empty,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<u32> for Cell {
    fn from(v: u32) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<u8> for Cell {
    fn from(v: u8) -> Self {
        Self::Integer(v as i64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Empty => Ok(()),
        }
    }
}

/// Quote a field if it contains a comma, a double quote or a line break.
pub fn escape_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Serialize rows as CSV text prefixed with a UTF-8 byte-order mark.
/// Rows are written in the order given.
pub fn to_csv(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let mut out = String::new();
    out.push(BOM);
    let header: Vec<String> = headers.iter().map(|h| escape_field(h)).collect();
    out.push_str(&header.join(","));
    for row in rows {
        out.push('\n');
        let cells: Vec<String> = row.iter().map(|c| escape_field(&c.to_string())).collect();
        out.push_str(&cells.join(","));
    }
    out
}

/// Split CSV text into records, honouring quoted fields (which may contain
/// commas, doubled quotes and line breaks). A leading BOM is ignored.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        anyhow::bail!("unterminated quoted field");
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

pub const STRENGTH_HEADERS: [&str; 8] = [
    "Date",
    "Session",
    "Exercise",
    "Order",
    "Set",
    "Weight (kg)",
    "Reps",
    "Tonnage",
];

/// Canonical export order: date descending, then session name, exercise
/// order and set number ascending.
pub fn sort_for_export(entries: &mut [StrengthSetEntry]) {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.session_name.cmp(&b.session_name))
            .then_with(|| a.order.cmp(&b.order))
            .then_with(|| a.set_number.cmp(&b.set_number))
    });
}

pub fn strength_csv(entries: &[StrengthSetEntry]) -> String {
    let mut sorted = entries.to_vec();
    sort_for_export(&mut sorted);
    let rows: Vec<Vec<Cell>> = sorted
        .iter()
        .map(|e| {
            vec![
                Cell::from(dates::date_key(e.date)),
                e.session_name.as_str().into(),
                e.exercise_name.as_str().into(),
                e.order.into(),
                e.set_number.into(),
                e.weight.into(),
                e.reps.into(),
                e.tonnage.into(),
            ]
        })
        .collect();
    to_csv(&STRENGTH_HEADERS, &rows)
}

pub const CARDIO_HEADERS: [&str; 13] = [
    "Date",
    "Type",
    "Mode",
    "Distance (km)",
    "Duration (min)",
    "Elevation (m)",
    "Heart Rate",
    "Power",
    "Cadence",
    "Calories",
    "Effort",
    "Intervals",
    "Notes",
];

fn format_interval(seg: &IntervalSegment) -> String {
    let mut parts = vec![format!("#{}", seg.set_number)];
    if let Some(d) = seg.distance {
        parts.push(format!("{}km", d));
    }
    if let Some(d) = seg.duration {
        parts.push(format!("{}min", d));
    }
    if let Some(hr) = seg.heart_rate {
        parts.push(format!("{}bpm", hr));
    }
    if let Some(p) = seg.power {
        parts.push(format!("{}W", p));
    }
    if let Some(s) = seg.speed {
        parts.push(format!("{}km/h", s));
    }
    if let Some(n) = &seg.notes {
        parts.push(n.clone());
    }
    parts.join(" ")
}

pub fn cardio_csv(sessions: &[CardioSession], types: &[CardioTypeDefinition]) -> String {
    let mut sorted: Vec<&CardioSession> = sessions.iter().collect();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.cardio_type_name.cmp(&b.cardio_type_name))
    });
    let rows: Vec<Vec<Cell>> = sorted
        .iter()
        .map(|s| {
            let intervals: Vec<String> = s.intervals.iter().map(format_interval).collect();
            vec![
                Cell::from(dates::date_key(s.date)),
                lookup::cardio_type_label(types, &s.cardio_type_name).into(),
                s.mode.to_string().into(),
                s.distance.into(),
                s.duration.into(),
                s.elevation.into(),
                s.heart_rate.into(),
                s.power.into(),
                s.cadence.into(),
                s.calories.into(),
                s.effort.into(),
                intervals.join("; ").into(),
                s.notes.clone().into(),
            ]
        })
        .collect();
    to_csv(&CARDIO_HEADERS, &rows)
}

pub const NUTRITION_HEADERS: [&str; 4] = ["Date", "Nutrient", "Amount", "Unit"];

pub fn nutrition_csv(logs: &[NutrientDailyLog], defs: &[NutrientDefinition]) -> String {
    let mut sorted: Vec<&NutrientDailyLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for log in sorted {
        let mut lines: Vec<(String, f64, String)> = log
            .totals
            .iter()
            .map(|(id, total)| {
                (
                    lookup::nutrient_label(defs, id),
                    *total,
                    lookup::nutrient_unit(defs, id),
                )
            })
            .collect();
        lines.sort_by(|a, b| a.0.cmp(&b.0));
        for (label, total, unit) in lines {
            rows.push(vec![
                Cell::from(dates::date_key(log.date)),
                label.into(),
                total.into(),
                unit.into(),
            ]);
        }
    }
    to_csv(&NUTRITION_HEADERS, &rows)
}

/// File name embedding the export category and the day of export.
pub fn export_filename(label: &str, today: NaiveDate) -> String {
    let slug: String = label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("liftlog_{}_{}.csv", slug, dates::date_key(today))
}

/// A serialized export ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Where an export goes: a native share target when one exists, otherwise a
/// plain download.
pub trait Delivery {
    fn can_share(&self) -> bool;
    fn share(&self, filename: &str, bytes: &[u8]) -> Result<()>;
    fn download(&self, filename: &str, bytes: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Shared,
    Downloaded,
}

/// Try to share, fall back to download. Both paths receive the same bytes.
pub fn deliver(target: &dyn Delivery, file: &ExportFile) -> Result<DeliveryOutcome> {
    if target.can_share() {
        match target.share(&file.filename, file.bytes()) {
            Ok(()) => {
                debug!(filename = %file.filename, "export shared");
                return Ok(DeliveryOutcome::Shared);
            }
            Err(e) => warn!(error = %e, "share failed, falling back to download"),
        }
    }
    target.download(&file.filename, file.bytes())?;
    debug!(filename = %file.filename, "export downloaded");
    Ok(DeliveryOutcome::Downloaded)
}

/// A strength row read back from an exported CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSet {
    pub date: NaiveDate,
    pub session_name: String,
    pub exercise_name: String,
    pub order: u32,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
}

/// Read strength rows from CSV produced by [`strength_csv`]. Tonnage is not
/// read back; it is recomputed when the sets are recreated.
pub fn parse_strength_csv(text: &str) -> Result<Vec<ImportedSet>> {
    let records = parse_csv(text)?;
    let mut out = Vec::new();
    for (line, record) in records.iter().enumerate().skip(1) {
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < 7 {
            anyhow::bail!("line {}: expected at least 7 fields, got {}", line + 1, record.len());
        }
        let field = move |i: usize| record[i].trim();
        out.push(ImportedSet {
            date: dates::parse_calendar_date(field(0))?,
            session_name: field(1).to_string(),
            exercise_name: field(2).to_string(),
            order: field(3)
                .parse()
                .map_err(|_| anyhow::anyhow!("line {}: invalid order: {}", line + 1, field(3)))?,
            set_number: field(4)
                .parse()
                .map_err(|_| anyhow::anyhow!("line {}: invalid set: {}", line + 1, field(4)))?,
            weight: field(5)
                .parse()
                .map_err(|_| anyhow::anyhow!("line {}: invalid weight: {}", line + 1, field(5)))?,
            reps: field(6)
                .parse()
                .map_err(|_| anyhow::anyhow!("line {}: invalid reps: {}", line + 1, field(6)))?,
        });
    }
    Ok(out)
}
