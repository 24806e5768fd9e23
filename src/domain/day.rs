/// Day entity aggregating habit entries for one calendar date
///
/// A day is keyed by its date and holds the entries recorded for it. The
/// counting helpers here feed the daily summary computed by the service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::HabitEntry;

/// Key used in the completion value histogram for entries with no value
pub const ABSENT_VALUE_KEY: &str = "absent";

/// All habit entries recorded for a single calendar date
///
/// At most one entry per habit id is the intended invariant; the service
/// enforces it when recording, the type does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// The date this day represents (unique key in storage)
    pub date: NaiveDate,
    /// Entries recorded for this date
    #[serde(default)]
    pub habit_entries: Vec<HabitEntry>,
}

impl Day {
    /// Create an empty day for the given date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            habit_entries: Vec::new(),
        }
    }

    /// Add a habit entry to this day
    pub fn add_habit_entry(&mut self, entry: HabitEntry) {
        self.habit_entries.push(entry);
    }

    /// Find the entry for a habit, if one was recorded
    pub fn entry_for(&self, habit_id: &str) -> Option<&HabitEntry> {
        self.habit_entries.iter().find(|e| e.habit_id == habit_id)
    }

    /// Drop every entry for a habit, reporting whether any existed
    pub fn remove_entries_for(&mut self, habit_id: &str) -> bool {
        let before = self.habit_entries.len();
        self.habit_entries.retain(|e| e.habit_id != habit_id);
        self.habit_entries.len() < before
    }

    /// Total number of habit entries recorded for this day
    pub fn total_habits_count(&self) -> usize {
        self.habit_entries.len()
    }

    /// Number of completed habit entries for this day
    pub fn completed_habits_count(&self) -> usize {
        self.habit_entries.iter().filter(|e| e.is_completed()).count()
    }

    /// Completion rate for this day (0.0 to 1.0; 0.0 when no entries)
    pub fn completion_rate(&self) -> f64 {
        let total = self.total_habits_count();
        if total == 0 {
            return 0.0;
        }
        self.completed_habits_count() as f64 / total as f64
    }

    /// Histogram of entries by legacy completion value
    ///
    /// Keys are the decimal value, or "absent" for entries with no outcome.
    pub fn completion_value_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.habit_entries {
            let key = match entry.completion_value() {
                Some(value) => value.to_string(),
                None => ABSENT_VALUE_KEY.to_string(),
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }
}
