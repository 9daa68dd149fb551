use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Dated;
use crate::core::dates;

/// At most one per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepEntry {
    #[serde(with = "dates::serde_date")]
    pub date: NaiveDate,
    pub score: u8,
    pub hours: f64,
}

impl Dated for SleepEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
