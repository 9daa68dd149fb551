use anyhow::Result;
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CollectionKey, Database};
use crate::core::store::AppState;
use crate::models::{CardioTypeDefinition, NutrientDailyLog, SleepEntry};

impl Database {
    /// Raw JSON stored under a collection key, if it was ever saved.
    pub fn load_raw(&self, key: CollectionKey) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn save_raw(&self, key: CollectionKey, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO collections (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load a collection, using `fallback` when nothing was saved or the stored
    /// value is not a JSON array. Individual items that fail to parse are skipped.
    pub fn load_collection_or<T: DeserializeOwned>(
        &self,
        key: CollectionKey,
        fallback: impl FnOnce() -> Vec<T>,
    ) -> Result<Vec<T>> {
        let Some(raw) = self.load_raw(key)? else {
            return Ok(fallback());
        };
        let items: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(_) => {
                warn!(collection = %key, "stored value is not a list, using default");
                return Ok(fallback());
            }
            Err(e) => {
                warn!(collection = %key, error = %e, "stored value is not valid JSON, using default");
                return Ok(fallback());
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(v) => out.push(v),
                Err(e) => warn!(collection = %key, index, error = %e, "skipping malformed record"),
            }
        }
        Ok(out)
    }

    /// Load a collection that defaults to empty.
    pub fn load_collection<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        self.load_collection_or(key, Vec::new)
    }

    pub fn save_collection<T: Serialize>(&self, key: CollectionKey, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.save_raw(key, &json)?;
        debug!(collection = %key, count = items.len(), "collection persisted");
        Ok(())
    }

    /// Load every collection. Cardio types fall back to the built-in seed list;
    /// everything else falls back to empty.
    pub fn load_state(&self) -> Result<AppState> {
        Ok(AppState {
            strength_sets: self.load_collection(CollectionKey::StrengthSets)?,
            sleep: merge_sleep_days(self.load_collection(CollectionKey::Sleep)?),
            nutrient_logs: merge_nutrient_days(self.load_collection(CollectionKey::NutrientLogs)?),
            nutrients: self.load_collection(CollectionKey::Nutrients)?,
            cardio_sessions: self.load_collection(CollectionKey::CardioSessions)?,
            cardio_types: self
                .load_collection_or(CollectionKey::CardioTypes, CardioTypeDefinition::seed)?,
            routines: self.load_collection(CollectionKey::Routines)?,
        })
    }

    /// Write one collection of `state` in full.
    pub fn save_state_collection(&self, state: &AppState, key: CollectionKey) -> Result<()> {
        match key {
            CollectionKey::StrengthSets => self.save_collection(key, &state.strength_sets),
            CollectionKey::Sleep => self.save_collection(key, &state.sleep),
            CollectionKey::NutrientLogs => self.save_collection(key, &state.nutrient_logs),
            CollectionKey::Nutrients => self.save_collection(key, &state.nutrients),
            CollectionKey::CardioSessions => self.save_collection(key, &state.cardio_sessions),
            CollectionKey::CardioTypes => self.save_collection(key, &state.cardio_types),
            CollectionKey::Routines => self.save_collection(key, &state.routines),
        }
    }
}

/// One sleep entry per day; when two spellings of a date collapse onto the
/// same day, the later record wins.
fn merge_sleep_days(entries: Vec<SleepEntry>) -> Vec<SleepEntry> {
    let mut merged: Vec<SleepEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => {
                debug!(date = %entry.date, "merging duplicate sleep day");
                *existing = entry;
            }
            None => merged.push(entry),
        }
    }
    merged
}

/// One nutrient log per day; duplicates sum their totals.
fn merge_nutrient_days(logs: Vec<NutrientDailyLog>) -> Vec<NutrientDailyLog> {
    let mut merged: Vec<NutrientDailyLog> = Vec::with_capacity(logs.len());
    for log in logs {
        match merged.iter_mut().find(|l| l.date == log.date) {
            Some(existing) => {
                debug!(date = %log.date, "merging duplicate nutrient day");
                for (id, amount) in &log.totals {
                    existing.add(id, *amount);
                }
            }
            None => merged.push(log),
        }
    }
    merged
}
