/// HabitEntry entity for tracking habit outcomes
///
/// This module defines the HabitEntry struct that records the outcome of one
/// habit on one day. Internally an entry holds a single tagged Outcome; on
/// the wire it keeps the legacy dual representation (completion_value and
/// status) for compatibility with previously stored documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit status for a recorded habit outcome
///
/// The third state, "not recorded", is implicit: no entry exists for the
/// habit on that day. It is never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitStatus {
    Completed,
    Failed,
}

impl HabitStatus {
    /// Convert a legacy completion value to a status
    ///
    /// A non-negative value means completed, a negative value means failed,
    /// and no value means no status can be derived.
    pub fn from_completion_value(value: Option<i64>) -> Option<Self> {
        match value {
            None => None,
            Some(v) if v >= 0 => Some(HabitStatus::Completed),
            Some(_) => Some(HabitStatus::Failed),
        }
    }

    /// Convert this status to its legacy completion value
    pub fn to_completion_value(self) -> i64 {
        match self {
            HabitStatus::Completed => 1,
            HabitStatus::Failed => -1,
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitStatus::Completed => write!(f, "completed"),
            HabitStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The outcome recorded for a habit on a day
///
/// The optional value carries the legacy free-form completion value when one
/// was supplied; status-authoritative entries leave it unset and serialize
/// the default value for their tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { value: Option<i64> },
    Failed { value: Option<i64> },
}

impl Outcome {
    /// Build an outcome from a legacy completion value (sign decides the tag)
    pub fn from_completion_value(value: i64) -> Self {
        if value >= 0 {
            Outcome::Completed { value: Some(value) }
        } else {
            Outcome::Failed { value: Some(value) }
        }
    }

    /// The status tag of this outcome
    pub fn status(&self) -> HabitStatus {
        match self {
            Outcome::Completed { .. } => HabitStatus::Completed,
            Outcome::Failed { .. } => HabitStatus::Failed,
        }
    }

    /// The legacy completion value: the explicit value when present, else
    /// the default for the status tag (1 completed, -1 failed)
    pub fn completion_value(&self) -> i64 {
        match self {
            Outcome::Completed { value } => value.unwrap_or(1),
            Outcome::Failed { value } => value.unwrap_or(-1),
        }
    }
}

/// A record of one habit's outcome on one day
///
/// At most one entry per habit exists on a day; the service enforces this,
/// not the type. An entry with no outcome was recorded without a value or
/// status and counts as neither completed nor failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HabitEntryRecord", into = "HabitEntryRecord")]
pub struct HabitEntry {
    /// Which habit this entry is for
    pub habit_id: String,
    /// The recorded outcome, if any was specified
    pub outcome: Option<Outcome>,
    /// User's notes about this entry
    pub notes: Option<String>,
    /// When the entry was recorded
    pub completed_at: Option<DateTime<Utc>>,
}

impl HabitEntry {
    /// Record a legacy free-form entry with an optional completion value
    ///
    /// No value means the entry exists but specifies no outcome.
    pub fn recorded(
        habit_id: impl Into<String>,
        completion_value: Option<i64>,
        notes: Option<String>,
    ) -> Self {
        Self {
            habit_id: habit_id.into(),
            outcome: completion_value.map(Outcome::from_completion_value),
            notes,
            completed_at: Some(Utc::now()),
        }
    }

    /// Record a completion with no explicit value (status is authoritative)
    pub fn completed(habit_id: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            outcome: Some(Outcome::Completed { value: None }),
            notes,
            completed_at: Some(Utc::now()),
        }
    }

    /// Record a failure with no explicit value (status is authoritative)
    pub fn failed(habit_id: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            outcome: Some(Outcome::Failed { value: None }),
            notes,
            completed_at: Some(Utc::now()),
        }
    }

    /// Check if the habit was completed successfully
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Completed { .. }))
    }

    /// Check if the habit attempt failed
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Failed { .. }))
    }

    /// The legacy completion value for this entry, if an outcome is recorded
    pub fn completion_value(&self) -> Option<i64> {
        self.outcome.map(|o| o.completion_value())
    }

    /// The status of this entry, if an outcome is recorded
    pub fn status(&self) -> Option<HabitStatus> {
        self.outcome.map(|o| o.status())
    }

    /// Check if this entry carries non-blank notes
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// Legacy wire shape for habit entries
///
/// Stored documents carry both completion_value and status. When both are
/// present, completion_value wins: its sign decides the outcome, matching
/// the legacy predicates which consult it first.
#[derive(Serialize, Deserialize)]
struct HabitEntryRecord {
    habit_id: String,
    #[serde(default)]
    completion_value: Option<i64>,
    #[serde(default)]
    status: Option<HabitStatus>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl From<HabitEntryRecord> for HabitEntry {
    fn from(record: HabitEntryRecord) -> Self {
        let outcome = match (record.completion_value, record.status) {
            (Some(value), _) => Some(Outcome::from_completion_value(value)),
            (None, Some(HabitStatus::Completed)) => Some(Outcome::Completed { value: None }),
            (None, Some(HabitStatus::Failed)) => Some(Outcome::Failed { value: None }),
            (None, None) => None,
        };
        Self {
            habit_id: record.habit_id,
            outcome,
            notes: record.notes,
            completed_at: record.completed_at,
        }
    }
}

impl From<HabitEntry> for HabitEntryRecord {
    fn from(entry: HabitEntry) -> Self {
        Self {
            habit_id: entry.habit_id,
            completion_value: entry.outcome.map(|o| o.completion_value()),
            status: entry.outcome.map(|o| o.status()),
            notes: entry.notes,
            completed_at: entry.completed_at,
        }
    }
}
