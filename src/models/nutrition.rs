use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::Dated;
use super::strength::default_color;
use crate::core::dates;

/// Running totals for one day, keyed by nutrient id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutrientDailyLog {
    #[serde(with = "dates::serde_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub totals: BTreeMap<String, f64>,
}

impl NutrientDailyLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: BTreeMap::new(),
        }
    }

    /// Add `delta` to one nutrient's running total, returning the new total.
    pub fn add(&mut self, nutrient_id: &str, delta: f64) -> f64 {
        let total = self.totals.entry(nutrient_id.to_string()).or_insert(0.0);
        *total += delta;
        *total
    }
}

impl Dated for NutrientDailyLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutrientDefinition {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub goal: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl NutrientDefinition {
    pub fn new(name: String, unit: String, goal: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            unit,
            goal,
            color: default_color(),
            icon: None,
        }
    }
}
