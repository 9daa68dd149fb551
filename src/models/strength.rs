use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Dated;
use crate::core::dates;

/// One performed set. Tonnage is fixed when the set is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrengthSetEntry {
    #[serde(with = "dates::serde_date")]
    pub date: NaiveDate,
    #[serde(alias = "sessionName")]
    pub session_name: String,
    #[serde(alias = "exerciseName")]
    pub exercise_name: String,
    pub order: u32,
    pub weight: f64,
    pub reps: u32,
    #[serde(alias = "setNumber")]
    pub set_number: u32,
    pub tonnage: f64,
}

impl StrengthSetEntry {
    pub fn new(
        date: NaiveDate,
        session_name: String,
        exercise_name: String,
        order: u32,
        weight: f64,
        reps: u32,
        set_number: u32,
    ) -> Self {
        Self {
            date,
            session_name,
            exercise_name,
            order,
            weight,
            reps,
            set_number,
            tonnage: weight * reps as f64,
        }
    }
}

impl Dated for StrengthSetEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

impl RoutineDefinition {
    pub fn new(name: String, exercises: Vec<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            exercises,
            color: color.unwrap_or_else(default_color),
        }
    }

    /// Position of an exercise in this routine, if it is part of it.
    pub fn position_of(&self, exercise: &str) -> Option<u32> {
        self.exercises
            .iter()
            .position(|e| e.eq_ignore_ascii_case(exercise))
            .map(|i| i as u32)
    }
}

pub(crate) fn default_color() -> String {
    crate::core::lookup::DEFAULT_COLOR.to_string()
}
