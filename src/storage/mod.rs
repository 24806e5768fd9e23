/// Storage layer for persisting habit data
///
/// This module defines the two repository capability interfaces consumed by
/// the service, one per entity type, and the JSON file implementation. The
/// traits keep the backing store swappable: any alternative implementation
/// must honor the same contracts, including "missing means empty or absent,
/// never an error" for reads.

pub mod json;

// Re-export the main storage types
pub use json::{JsonDayRepository, JsonUserConfigRepository};

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Day, UserConfig};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The configured data directory is unsafe: it contains a parent
    /// directory segment or resolves outside the working directory.
    /// Fatal at startup.
    #[error("Invalid data directory path: {}", .0.display())]
    InvalidDataDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Repository interface for Day entities
///
/// save is an upsert keyed by date and is idempotent; reads of a missing
/// record yield None rather than an error.
#[async_trait]
pub trait DayRepository: Send + Sync {
    /// Save a day record (upsert by date)
    async fn save_day(&self, day: &Day) -> Result<(), StorageError>;

    /// Get a day record by date
    async fn get_day(&self, date: NaiveDate) -> Result<Option<Day>, StorageError>;

    /// Get all days within a date range, inclusive of both bounds,
    /// sorted by date ascending
    async fn get_days_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Day>, StorageError>;

    /// Delete a day record. Returns true iff something was deleted.
    async fn delete_day(&self, date: NaiveDate) -> Result<bool, StorageError>;
}

/// Repository interface for UserConfig entities
#[async_trait]
pub trait UserConfigRepository: Send + Sync {
    /// Save a user configuration (upsert by user id)
    async fn save_config(&self, config: &UserConfig) -> Result<(), StorageError>;

    /// Get a user configuration by user id
    async fn get_config(&self, user_id: &str) -> Result<Option<UserConfig>, StorageError>;

    /// Delete a user configuration. Returns true iff something was deleted.
    async fn delete_config(&self, user_id: &str) -> Result<bool, StorageError>;
}
