//! The single parsing boundary for calendar dates.
//!
//! Records reach the store with dates in either ISO `YYYY-MM-DD` form (optionally
//! followed by a time) or day-first `DD/MM/YYYY` form. Everything is converted to
//! a `NaiveDate` here, at ingestion, so grouping and ordering downstream never see
//! two spellings of the same day.

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ].*)?$").expect("static pattern")
});
static DAY_FIRST_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("static pattern"));

/// Parse a raw date string into its canonical calendar day.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    let (year, month, day): (i32, u32, u32) = if let Some(c) = ISO_DATE.captures(s) {
        (c[1].parse()?, c[2].parse()?, c[3].parse()?)
    } else if let Some(c) = DAY_FIRST_DATE.captures(s) {
        (c[3].parse()?, c[2].parse()?, c[1].parse()?)
    } else {
        anyhow::bail!("invalid date: {} (expected YYYY-MM-DD or DD/MM/YYYY)", raw);
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid date: {} (no such calendar day)", raw))
}

/// Canonical map key for a day.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Sortable month key, e.g. `2024-01`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Section header label, e.g. `January 2024`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Validate a `YYYY-MM` month key supplied by a user.
pub fn parse_month_key(raw: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid month: {} (expected YYYY-MM)", raw))?;
    Ok(month_key(date))
}

/// Serde adapter: dates are written as ISO and read through [`parse_calendar_date`].
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn both_spellings_reach_the_same_day() {
        assert_eq!(parse_calendar_date("2024-03-05").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_calendar_date("05/03/2024").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_calendar_date("5/3/2024").unwrap(), ymd(2024, 3, 5));
    }

    #[test]
    fn iso_timestamp_keeps_only_the_day() {
        assert_eq!(
            parse_calendar_date("2024-03-05T22:15:00.000Z").unwrap(),
            ymd(2024, 3, 5)
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_days() {
        assert!(parse_calendar_date("yesterday").is_err());
        assert!(parse_calendar_date("31/02/2024").is_err());
        assert!(parse_calendar_date("03-05-2024").is_err());
    }

    #[test]
    fn month_keys_and_labels() {
        let d = ymd(2024, 1, 10);
        assert_eq!(month_key(d), "2024-01");
        assert_eq!(month_label(d), "January 2024");
        assert_eq!(date_key(d), "2024-01-10");
        assert_eq!(parse_month_key("2024-1").unwrap(), "2024-01");
        assert!(parse_month_key("2024-13").is_err());
    }
}
