/// Public library interface for the habits tracker
///
/// This module exports the domain types, the date path utilities, the
/// repository interfaces with their JSON file implementations, and the
/// habit tracking service, plus a small facade bundling them behind one
/// constructor.

use std::path::Path;
use thiserror::Error;

// Internal modules
mod domain;
mod dates;
mod storage;
mod service;

// Re-export public modules and types
pub use domain::*;
pub use dates::{format_date_path, navigation_for, parse_date_path, DateNavigation, DateParseError};
pub use storage::{
    DayRepository, JsonDayRepository, JsonUserConfigRepository, StorageError,
    UserConfigRepository,
};
pub use service::{DailySummary, HabitTrackingService, ServiceError, DEFAULT_STREAK_LOOKBACK_DAYS};

/// Errors that can occur at the application boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Date parse error: {0}")]
    DateParse(#[from] DateParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application facade wiring the JSON repositories into the service
///
/// Constructed once and passed around by reference; there is no
/// module-level state. Day records live under `<data_dir>/days`, user
/// configurations under `<data_dir>/configs`.
pub struct HabitTracker {
    service: HabitTrackingService<JsonDayRepository, JsonUserConfigRepository>,
}

impl HabitTracker {
    /// Open a tracker rooted at the given data directory
    ///
    /// Fails fast when the directory is unsafe (see the storage layer's
    /// path validation).
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        tracing::info!(data_dir = %data_dir.display(), "initializing habit tracker");

        let day_repo = JsonDayRepository::new(data_dir.join("days"))?;
        let config_repo = JsonUserConfigRepository::new(data_dir.join("configs"))?;
        Ok(Self {
            service: HabitTrackingService::new(day_repo, config_repo),
        })
    }

    /// The habit tracking service backed by the JSON repositories
    pub fn service(&self) -> &HabitTrackingService<JsonDayRepository, JsonUserConfigRepository> {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_and_use_tracker() {
        let dir = tempdir().unwrap();
        let tracker = HabitTracker::open(dir.path()).unwrap();

        let habit = Habit::new("Read", "Read a chapter").unwrap();
        tracker
            .service()
            .add_habit_to_user("default_user", habit)
            .await
            .unwrap();

        let habits = tracker
            .service()
            .get_user_habits("default_user")
            .await
            .unwrap();
        assert_eq!(habits.len(), 1);
    }
}
