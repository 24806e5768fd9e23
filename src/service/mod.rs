/// Habit tracking service orchestrating the repositories
///
/// This is where the recording rules live: one entry per habit per day,
/// enforced differently by the two recording modes. The unconstrained path
/// replaces whatever is there; the constrained paths refuse to touch a day
/// that already has an entry for the habit. Streaks and daily summaries are
/// computed here from repository reads.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{Day, DomainError, Habit, HabitEntry, HabitStatus, UserConfig};
use crate::storage::{DayRepository, StorageError, UserConfigRepository};

/// How many days back a streak walk will look by default
pub const DEFAULT_STREAK_LOOKBACK_DAYS: u32 = 365;

/// Errors that can occur during service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A constrained recording hit an existing entry for the same habit
    /// and day. Recoverable: surfaced to the caller as a rejection, never
    /// retried.
    #[error("Habit '{habit_id}' already recorded for {date} with status: {status}")]
    AlreadyRecorded {
        habit_id: String,
        date: NaiveDate,
        status: String,
    },

    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Aggregate completion statistics for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_habits: usize,
    pub completed_habits: usize,
    /// completed / total, 0.0 when the day has no entries
    pub completion_rate: f64,
    /// Histogram over legacy completion values; "absent" keys unset values
    pub completion_value_counts: BTreeMap<String, usize>,
}

/// Service for managing habit tracking operations
///
/// Holds one write lock per logical collection and takes it across every
/// load-check-mutate-save sequence, so a constrained recording cannot pass
/// its existence check concurrently with another writer of the same
/// collection. Read-only operations go straight to the repositories.
pub struct HabitTrackingService<D, C> {
    day_repo: D,
    config_repo: C,
    day_write_lock: Mutex<()>,
    config_write_lock: Mutex<()>,
}

impl<D: DayRepository, C: UserConfigRepository> HabitTrackingService<D, C> {
    pub fn new(day_repo: D, config_repo: C) -> Self {
        Self {
            day_repo,
            config_repo,
            day_write_lock: Mutex::new(()),
            config_write_lock: Mutex::new(()),
        }
    }

    /// Get an existing day or create and persist an empty one
    pub async fn get_or_create_day(&self, date: NaiveDate) -> Result<Day, ServiceError> {
        let _guard = self.day_write_lock.lock().await;

        if let Some(day) = self.day_repo.get_day(date).await? {
            return Ok(day);
        }
        let day = Day::new(date);
        self.day_repo.save_day(&day).await?;
        tracing::info!(date = %date, "created empty day record");
        Ok(day)
    }

    /// Record a habit entry for a date, replacing any existing entry for
    /// the same habit unconditionally
    ///
    /// This is the unconstrained path: corrections, including marking a
    /// completed habit incomplete, go through here. Always succeeds barring
    /// storage failure.
    pub async fn record_habit_entry(
        &self,
        date: NaiveDate,
        habit_id: &str,
        completion_value: Option<i64>,
        notes: Option<String>,
    ) -> Result<HabitEntry, ServiceError> {
        let _guard = self.day_write_lock.lock().await;

        let mut day = self
            .day_repo
            .get_day(date)
            .await?
            .unwrap_or_else(|| Day::new(date));
        let replaced_existing = day.remove_entries_for(habit_id);

        let entry = HabitEntry::recorded(habit_id, completion_value, notes);
        day.add_habit_entry(entry.clone());
        self.day_repo.save_day(&day).await?;

        tracing::info!(
            date = %date,
            habit_id,
            completion_value,
            replaced_existing,
            is_completed = entry.is_completed(),
            "recorded habit entry"
        );
        Ok(entry)
    }

    /// Record a successful habit completion
    ///
    /// Constrained path: fails with AlreadyRecorded if any entry exists
    /// for this habit and day, whatever its status.
    pub async fn record_habit_completion(
        &self,
        date: NaiveDate,
        habit_id: &str,
        notes: Option<String>,
    ) -> Result<HabitEntry, ServiceError> {
        self.record_with_status(date, habit_id, HabitStatus::Completed, notes)
            .await
    }

    /// Record a failed habit attempt
    ///
    /// Constrained path: same refusal rule as record_habit_completion.
    pub async fn record_habit_failure(
        &self,
        date: NaiveDate,
        habit_id: &str,
        notes: Option<String>,
    ) -> Result<HabitEntry, ServiceError> {
        self.record_with_status(date, habit_id, HabitStatus::Failed, notes)
            .await
    }

    async fn record_with_status(
        &self,
        date: NaiveDate,
        habit_id: &str,
        status: HabitStatus,
        notes: Option<String>,
    ) -> Result<HabitEntry, ServiceError> {
        let _guard = self.day_write_lock.lock().await;

        let mut day = self
            .day_repo
            .get_day(date)
            .await?
            .unwrap_or_else(|| Day::new(date));

        if let Some(existing) = day.entry_for(habit_id) {
            let existing_status = existing
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            tracing::warn!(
                date = %date,
                habit_id,
                existing_status = %existing_status,
                "rejected duplicate recording"
            );
            return Err(ServiceError::AlreadyRecorded {
                habit_id: habit_id.to_string(),
                date,
                status: existing_status,
            });
        }

        let entry = match status {
            HabitStatus::Completed => HabitEntry::completed(habit_id, notes),
            HabitStatus::Failed => HabitEntry::failed(habit_id, notes),
        };
        day.add_habit_entry(entry.clone());
        self.day_repo.save_day(&day).await?;

        tracing::info!(date = %date, habit_id, status = %status, "recorded habit status");
        Ok(entry)
    }

    /// Complete a habit only if it is not already completed
    ///
    /// Legacy compatibility wrapper. Returns the entry and whether the
    /// habit was already completed: an existing completed entry is
    /// returned unchanged with true; an absent or failed entry is
    /// overwritten through the unconstrained rules with false.
    pub async fn complete_habit_if_not_already(
        &self,
        date: NaiveDate,
        habit_id: &str,
        completion_value: Option<i64>,
        notes: Option<String>,
    ) -> Result<(HabitEntry, bool), ServiceError> {
        let _guard = self.day_write_lock.lock().await;

        let mut day = self
            .day_repo
            .get_day(date)
            .await?
            .unwrap_or_else(|| Day::new(date));

        if let Some(existing) = day.entry_for(habit_id) {
            if existing.is_completed() {
                tracing::info!(date = %date, habit_id, "habit already completed");
                return Ok((existing.clone(), true));
            }
        }

        day.remove_entries_for(habit_id);
        let entry = HabitEntry::recorded(habit_id, completion_value, notes);
        day.add_habit_entry(entry.clone());
        self.day_repo.save_day(&day).await?;

        tracing::info!(date = %date, habit_id, completion_value, "completed habit");
        Ok((entry, false))
    }

    /// Get the habit entry for a date and habit, if one exists
    pub async fn get_habit_entry(
        &self,
        date: NaiveDate,
        habit_id: &str,
    ) -> Result<Option<HabitEntry>, ServiceError> {
        let day = self.day_repo.get_day(date).await?;
        Ok(day.and_then(|d| d.entry_for(habit_id).cloned()))
    }

    /// Calculate the current streak for a habit ending at a date
    ///
    /// Walks backward one day at a time from end_date (inclusive), counting
    /// consecutive days with a completed entry for the habit. Stops at the
    /// first day without one, at a day with no stored record, or after
    /// max_days iterations, whichever comes first.
    pub async fn get_habit_streak(
        &self,
        habit_id: &str,
        end_date: NaiveDate,
        max_days: u32,
    ) -> Result<u32, ServiceError> {
        let mut streak = 0;
        let mut current = end_date;

        for _ in 0..max_days {
            let Some(day) = self.day_repo.get_day(current).await? else {
                break;
            };

            let completed = day
                .habit_entries
                .iter()
                .any(|e| e.habit_id == habit_id && e.is_completed());
            if !completed {
                break;
            }

            streak += 1;
            current = current - chrono::Duration::days(1);
        }

        tracing::debug!(habit_id, end_date = %end_date, streak, "calculated habit streak");
        Ok(streak)
    }

    /// Get habit progress for a date range (inclusive, ascending)
    pub async fn get_habit_progress(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Day>, ServiceError> {
        Ok(self.day_repo.get_days_range(start_date, end_date).await?)
    }

    /// Get all habits configured for a user; empty if no config exists
    pub async fn get_user_habits(&self, user_id: &str) -> Result<Vec<Habit>, ServiceError> {
        let config = self.config_repo.get_config(user_id).await?;
        Ok(config.map(|c| c.habits).unwrap_or_default())
    }

    /// Add a habit to a user's configuration
    ///
    /// Creates the config if absent. The habit is appended only when no
    /// existing habit shares its title; on a duplicate title the new habit,
    /// including its freshly generated id, is discarded and nothing is
    /// persisted. Returns the resulting configuration either way.
    pub async fn add_habit_to_user(
        &self,
        user_id: &str,
        habit: Habit,
    ) -> Result<UserConfig, ServiceError> {
        let _guard = self.config_write_lock.lock().await;

        let mut config = match self.config_repo.get_config(user_id).await? {
            Some(config) => config,
            None => UserConfig::new(user_id)?,
        };

        if config.has_habit_with_title(&habit.title) {
            tracing::info!(user_id, title = %habit.title, "habit title already configured, discarding");
        } else {
            tracing::info!(user_id, title = %habit.title, habit_id = %habit.id, "added habit");
            config.habits.push(habit);
            self.config_repo.save_config(&config).await?;
        }
        Ok(config)
    }

    /// Remove every habit matching the title from a user's configuration
    ///
    /// Persists only when something changed. Returns whether a removal
    /// occurred.
    pub async fn remove_habit_from_user(
        &self,
        user_id: &str,
        habit_title: &str,
    ) -> Result<bool, ServiceError> {
        let _guard = self.config_write_lock.lock().await;

        let Some(mut config) = self.config_repo.get_config(user_id).await? else {
            return Ok(false);
        };

        let before = config.habits.len();
        config.habits.retain(|h| h.title != habit_title);
        let removed = config.habits.len() < before;

        if removed {
            self.config_repo.save_config(&config).await?;
            tracing::info!(user_id, title = habit_title, "removed habit");
        }
        Ok(removed)
    }

    /// Get the completion summary for a day, or None if no record exists
    pub async fn get_daily_summary(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailySummary>, ServiceError> {
        let Some(day) = self.day_repo.get_day(date).await? else {
            return Ok(None);
        };

        Ok(Some(DailySummary {
            date,
            total_habits: day.total_habits_count(),
            completed_habits: day.completed_habits_count(),
            completion_rate: day.completion_rate(),
            completion_value_counts: day.completion_value_counts(),
        }))
    }
}
