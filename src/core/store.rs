//! The in-memory record store.
//!
//! All seven collections live in one [`AppState`]. Changes go through
//! [`Store::mutate`] as a [`Patch`]; after a patch applies, every subscribed
//! listener sees the collections it touched together with the new state.
//! Persistence is just such a listener ([`persister`]) and always writes each
//! touched collection in full.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::core::dates;
use crate::db::{CollectionKey, Database};
use crate::models::{
    CardioSession, CardioTypeDefinition, NutrientDailyLog, NutrientDefinition, RoutineDefinition,
    SleepEntry, StrengthSetEntry,
};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AppState {
    pub strength_sets: Vec<StrengthSetEntry>,
    pub sleep: Vec<SleepEntry>,
    pub nutrient_logs: Vec<NutrientDailyLog>,
    pub nutrients: Vec<NutrientDefinition>,
    pub cardio_sessions: Vec<CardioSession>,
    pub cardio_types: Vec<CardioTypeDefinition>,
    pub routines: Vec<RoutineDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    AddStrengthSets(Vec<StrengthSetEntry>),
    DeleteSession { date: NaiveDate, session_name: String },
    AddCardio(CardioSession),
    DeleteCardio { id: String },
    AddNutrient { date: NaiveDate, nutrient_id: String, delta: f64 },
    LogSleep(SleepEntry),
    UpsertRoutine(RoutineDefinition),
    DeleteRoutine { id: String },
    UpsertNutrientDefinition(NutrientDefinition),
    DeleteNutrientDefinition { id: String },
    UpsertCardioType(CardioTypeDefinition),
    DeleteCardioType { id: String },
}

impl Patch {
    /// The collection this patch writes to.
    pub fn collection(&self) -> CollectionKey {
        match self {
            Self::AddStrengthSets(_) | Self::DeleteSession { .. } => CollectionKey::StrengthSets,
            Self::AddCardio(_) | Self::DeleteCardio { .. } => CollectionKey::CardioSessions,
            Self::AddNutrient { .. } => CollectionKey::NutrientLogs,
            Self::LogSleep(_) => CollectionKey::Sleep,
            Self::UpsertRoutine(_) | Self::DeleteRoutine { .. } => CollectionKey::Routines,
            Self::UpsertNutrientDefinition(_) | Self::DeleteNutrientDefinition { .. } => {
                CollectionKey::Nutrients
            }
            Self::UpsertCardioType(_) | Self::DeleteCardioType { .. } => CollectionKey::CardioTypes,
        }
    }
}

/// What a listener is told after a successful mutation.
pub struct Change<'a> {
    pub touched: &'a [CollectionKey],
    pub state: &'a AppState,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MutationReport {
    pub touched: Vec<CollectionKey>,
    /// Records added, replaced or removed.
    pub affected: usize,
}

type Listener = Box<dyn FnMut(&Change<'_>)>;

pub struct Store {
    state: AppState,
    listeners: Vec<Listener>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
        }
    }

    /// Load every collection from `db` and persist every later change back to it.
    pub fn open(db: Rc<Database>) -> Result<Self> {
        let mut store = Self::new(db.load_state()?);
        store.subscribe(persister(db));
        Ok(store)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a patch. On error the state is left untouched and no listener runs.
    pub fn mutate(&mut self, patch: Patch) -> Result<MutationReport> {
        let key = patch.collection();
        let affected = apply(&mut self.state, patch)?;
        let touched = vec![key];
        let change = Change {
            touched: &touched,
            state: &self.state,
        };
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
        Ok(MutationReport { touched, affected })
    }
}

/// Listener that writes each touched collection to `db`. Failures are logged;
/// the in-memory change stands.
pub fn persister(db: Rc<Database>) -> impl FnMut(&Change<'_>) + 'static {
    move |change: &Change<'_>| {
        for key in change.touched {
            if let Err(e) = db.save_state_collection(change.state, *key) {
                warn!(collection = %key, error = %e, "persist failed");
            }
        }
    }
}

fn apply(state: &mut AppState, patch: Patch) -> Result<usize> {
    match patch {
        Patch::AddStrengthSets(entries) => {
            if entries.is_empty() {
                anyhow::bail!("no sets to add");
            }
            for e in &entries {
                if !e.weight.is_finite() || e.weight < 0.0 {
                    anyhow::bail!("invalid weight: {} (must be >= 0)", e.weight);
                }
                if e.session_name.trim().is_empty() || e.exercise_name.trim().is_empty() {
                    anyhow::bail!("session and exercise names must not be empty");
                }
            }
            let n = entries.len();
            state.strength_sets.extend(entries);
            Ok(n)
        }
        Patch::DeleteSession { date, session_name } => {
            let before = state.strength_sets.len();
            state
                .strength_sets
                .retain(|e| !(e.date == date && e.session_name == session_name));
            let removed = before - state.strength_sets.len();
            if removed == 0 {
                anyhow::bail!(
                    "no session '{}' on {}",
                    session_name,
                    dates::date_key(date)
                );
            }
            debug!(session = %session_name, removed, "session deleted");
            Ok(removed)
        }
        Patch::AddCardio(session) => {
            if !(1..=10).contains(&session.effort) {
                anyhow::bail!("invalid effort: {} (expected 1-10)", session.effort);
            }
            if state.cardio_sessions.iter().any(|s| s.id == session.id) {
                anyhow::bail!("cardio session {} already exists", session.id);
            }
            state.cardio_sessions.push(session);
            Ok(1)
        }
        Patch::DeleteCardio { id } => {
            remove_by(&mut state.cardio_sessions, |s| s.id == id)
                .ok_or_else(|| anyhow::anyhow!("no cardio session with id {}", id))
        }
        Patch::AddNutrient {
            date,
            nutrient_id,
            delta,
        } => {
            if !delta.is_finite() {
                anyhow::bail!("invalid amount: {}", delta);
            }
            let index = match state.nutrient_logs.iter().position(|l| l.date == date) {
                Some(i) => i,
                None => {
                    state.nutrient_logs.push(NutrientDailyLog::empty(date));
                    state.nutrient_logs.len() - 1
                }
            };
            state.nutrient_logs[index].add(&nutrient_id, delta);
            Ok(1)
        }
        Patch::LogSleep(entry) => {
            if !entry.hours.is_finite() || entry.hours < 0.0 || entry.hours > 24.0 {
                anyhow::bail!("invalid sleep hours: {} (expected 0-24)", entry.hours);
            }
            match state.sleep.iter_mut().find(|s| s.date == entry.date) {
                Some(existing) => *existing = entry,
                None => state.sleep.push(entry),
            }
            Ok(1)
        }
        Patch::UpsertRoutine(routine) => {
            ensure_unique_name(&state.routines, &routine.id, &routine.name, |r| (&r.id, &r.name))?;
            upsert(&mut state.routines, routine, |a, b| a.id == b.id);
            Ok(1)
        }
        Patch::DeleteRoutine { id } => remove_by(&mut state.routines, |r| r.id == id)
            .ok_or_else(|| anyhow::anyhow!("no routine with id {}", id)),
        Patch::UpsertNutrientDefinition(def) => {
            upsert(&mut state.nutrients, def, |a, b| a.id == b.id);
            Ok(1)
        }
        Patch::DeleteNutrientDefinition { id } => remove_by(&mut state.nutrients, |n| n.id == id)
            .ok_or_else(|| anyhow::anyhow!("no nutrient with id {}", id)),
        Patch::UpsertCardioType(def) => {
            ensure_unique_name(&state.cardio_types, &def.id, &def.name, |t| (&t.id, &t.name))?;
            upsert(&mut state.cardio_types, def, |a, b| a.id == b.id);
            Ok(1)
        }
        Patch::DeleteCardioType { id } => remove_by(&mut state.cardio_types, |t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("no cardio type with id {}", id)),
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<usize> {
    let before = items.len();
    items.retain(|i| !pred(i));
    let removed = before - items.len();
    (removed > 0).then_some(removed)
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|i| same(i, &item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Definitions referenced by name must keep their names unique.
fn ensure_unique_name<T>(
    items: &[T],
    id: &str,
    name: &str,
    fields: impl Fn(&T) -> (&String, &String),
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("name must not be empty");
    }
    let clash = items.iter().any(|i| {
        let (other_id, other_name) = fields(i);
        other_id != id && other_name.eq_ignore_ascii_case(name)
    });
    if clash {
        anyhow::bail!("'{}' already exists", name);
    }
    Ok(())
}
