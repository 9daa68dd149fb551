//! Multi-select over a filtered list, with group-toggle shortcuts.
//!
//! A `Selection` is owned by one view (strength timeline, cardio journal,
//! nutrition journal). Bulk operations only ever look at the items that are
//! currently visible: the search text and the category filter both narrow the
//! list, and they compose (an item must pass both).

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::dates;
use crate::core::journal::{CardioJournalItem, NutritionDay};
use crate::core::sessions::SessionSummary;

pub trait Selectable {
    fn selection_id(&self) -> String;
    fn selection_date(&self) -> NaiveDate;
    fn category(&self) -> &str;
    /// Text matched (case-insensitively) by the search box.
    fn search_text(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartCriterion {
    AllVisible,
    /// Month key, `YYYY-MM`.
    SameMonth(String),
    SameCategory(String),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "action", content = "count", rename_all = "snake_case")]
pub enum SmartOutcome {
    Selected(usize),
    Deselected(usize),
    Unchanged,
}

#[derive(Debug, Default, Clone)]
pub struct Selection {
    selected: BTreeSet<String>,
    search: String,
    category_filter: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Add one id without toggling. Returns whether it was newly selected.
    pub fn select(&mut self, id: &str) -> bool {
        self.selected.insert(id.to_string())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// True iff every candidate is selected. An empty group is never "fully selected".
    pub fn is_group_fully_selected(&self, ids: &[String]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.category_filter = category;
    }

    pub fn is_visible<T: Selectable>(&self, item: &T) -> bool {
        let search_ok = self.search.is_empty()
            || item
                .search_text()
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let category_ok = self
            .category_filter
            .as_deref()
            .is_none_or(|c| item.category() == c);
        search_ok && category_ok
    }

    /// The currently visible subset of `items`, in input order.
    pub fn visible<'a, T: Selectable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|i| self.is_visible(*i)).collect()
    }

    /// Ids of visible items matching a shortcut criterion.
    pub fn target_ids<T: Selectable>(&self, criterion: &SmartCriterion, items: &[T]) -> Vec<String> {
        self.visible(items)
            .into_iter()
            .filter(|item| match criterion {
                SmartCriterion::AllVisible => true,
                SmartCriterion::SameMonth(month) => {
                    dates::month_key(item.selection_date()) == *month
                }
                SmartCriterion::SameCategory(category) => item.category() == category,
            })
            .map(|item| item.selection_id())
            .collect()
    }

    /// Whether a shortcut would currently deselect (used for checkmarks).
    pub fn is_criterion_fully_selected<T: Selectable>(
        &self,
        criterion: &SmartCriterion,
        items: &[T],
    ) -> bool {
        self.is_group_fully_selected(&self.target_ids(criterion, items))
    }

    /// Toggle a whole group: deselect it when fully selected, otherwise select
    /// the missing members. Only visible items of `items` are considered.
    pub fn apply_smart_select<T: Selectable>(
        &mut self,
        criterion: &SmartCriterion,
        items: &[T],
    ) -> SmartOutcome {
        let targets = self.target_ids(criterion, items);
        if targets.is_empty() {
            return SmartOutcome::Unchanged;
        }
        if self.is_group_fully_selected(&targets) {
            for id in &targets {
                self.selected.remove(id);
            }
            SmartOutcome::Deselected(targets.len())
        } else {
            let mut added = 0;
            for id in targets {
                if self.selected.insert(id) {
                    added += 1;
                }
            }
            SmartOutcome::Selected(added)
        }
    }

    /// Add every visible item matching `criterion`, never removing any.
    /// Returns how many ids were newly selected.
    pub fn include<T: Selectable>(&mut self, criterion: &SmartCriterion, items: &[T]) -> usize {
        self.target_ids(criterion, items)
            .into_iter()
            .filter(|id| self.selected.insert(id.clone()))
            .count()
    }

    /// Selected records, in the order of `items`.
    pub fn selected_items<'a, T: Selectable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|i| self.selected.contains(&i.selection_id()))
            .collect()
    }

    /// Leave selection mode: drop the selection and any transient filters.
    pub fn exit_selection_mode(&mut self) {
        self.selected.clear();
        self.search.clear();
        self.category_filter = None;
    }
}

impl Selectable for SessionSummary {
    fn selection_id(&self) -> String {
        self.key.clone()
    }

    fn selection_date(&self) -> NaiveDate {
        self.date
    }

    fn category(&self) -> &str {
        &self.session_name
    }

    fn search_text(&self) -> String {
        let mut text = self.session_name.clone();
        for e in &self.entries {
            text.push(' ');
            text.push_str(&e.exercise_name);
        }
        text
    }
}

impl Selectable for CardioJournalItem {
    fn selection_id(&self) -> String {
        self.session.id.clone()
    }

    fn selection_date(&self) -> NaiveDate {
        self.session.date
    }

    fn category(&self) -> &str {
        &self.session.cardio_type_name
    }

    fn search_text(&self) -> String {
        format!(
            "{} {}",
            self.label,
            self.session.notes.as_deref().unwrap_or_default()
        )
    }
}

impl Selectable for NutritionDay {
    fn selection_id(&self) -> String {
        dates::date_key(self.date)
    }

    fn selection_date(&self) -> NaiveDate {
        self.date
    }

    fn category(&self) -> &str {
        "nutrition"
    }

    fn search_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.label.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
