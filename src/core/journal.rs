use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::lookup;
use crate::core::progression::{Trend, classify_trend};
use crate::models::{
    CardioSession, CardioTypeDefinition, Dated, NutrientDailyLog, NutrientDefinition,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardioJournalItem {
    pub session: CardioSession,
    pub label: String,
    pub color: String,
    /// Distance compared with the previous session of the same type.
    pub distance_trend: Trend,
}

impl Dated for CardioJournalItem {
    fn date(&self) -> NaiveDate {
        self.session.date
    }
}

/// Cardio sessions newest first (ties broken by id), each annotated with its
/// resolved label/color and a distance trend.
pub fn cardio_timeline(
    sessions: &[CardioSession],
    types: &[CardioTypeDefinition],
) -> Vec<CardioJournalItem> {
    let mut chronological: Vec<&CardioSession> = sessions.iter().collect();
    chronological.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut last_distance: HashMap<&str, f64> = HashMap::new();
    let mut items: Vec<CardioJournalItem> = chronological
        .into_iter()
        .map(|s| {
            let trend = last_distance
                .get(s.cardio_type_name.as_str())
                .map(|prev| classify_trend(s.distance, *prev))
                .unwrap_or(Trend::Flat);
            last_distance.insert(s.cardio_type_name.as_str(), s.distance);
            CardioJournalItem {
                session: s.clone(),
                label: lookup::cardio_type_label(types, &s.cardio_type_name),
                color: lookup::cardio_type_color(types, &s.cardio_type_name),
                distance_trend: trend,
            }
        })
        .collect();
    items.reverse();
    items
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutrientLine {
    pub nutrient_id: String,
    pub label: String,
    pub unit: String,
    pub color: String,
    pub total: f64,
    /// Share of the goal reached, when a goal is defined.
    pub goal_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutritionDay {
    pub date: NaiveDate,
    pub lines: Vec<NutrientLine>,
}

impl Dated for NutritionDay {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Daily nutrient logs newest first, with labels resolved.
pub fn nutrition_journal(
    logs: &[NutrientDailyLog],
    defs: &[NutrientDefinition],
) -> Vec<NutritionDay> {
    let mut days: Vec<NutritionDay> = logs
        .iter()
        .map(|log| NutritionDay {
            date: log.date,
            lines: log
                .totals
                .iter()
                .map(|(id, total)| {
                    let goal = lookup::nutrient(defs, id).map(|d| d.goal).filter(|g| *g > 0.0);
                    NutrientLine {
                        nutrient_id: id.clone(),
                        label: lookup::nutrient_label(defs, id),
                        unit: lookup::nutrient_unit(defs, id),
                        color: lookup::nutrient_color(defs, id),
                        total: *total,
                        goal_ratio: goal.map(|g| (total / g * 100.0).round() / 100.0),
                    }
                })
                .collect(),
        })
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}
