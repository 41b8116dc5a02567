//! Persisted task list snapshot.
//!
//! The task list is written as a JSON array under one fixed key of a durable
//! string-keyed slot, and read back once when a store is mounted. Loading
//! never fails: a missing, unreadable, or corrupt snapshot yields an empty
//! list so the session can still start.

use crate::types::{Task, TodoState};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use todo_store_runtime::StateObserver;

/// Key the task list is stored under
pub const DEFAULT_SNAPSHOT_KEY: &str = "todos";

/// Errors raised by a [`KeyValueSlot`]
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed
    #[error("I/O error on slot `{key}`: {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Cause
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading or writing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The slot could not be accessed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored value is not a JSON task list, or the list could not be encoded
    #[error("Snapshot encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Durable string-keyed storage
pub trait KeyValueSlot: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Slot backed by a directory, one `<key>.json` file per key
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir` (created on first write)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(|e| Self::io_error(key, e))?;
        std::fs::rename(&tmp, &target).map_err(|e| Self::io_error(key, e))
    }
}

/// In-memory slot
///
/// Clones share the same entries, so a test can keep one clone to inspect
/// what the store wrote through the other.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    /// Create an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-populated with one entry
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        slot
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the task list snapshot
#[derive(Clone, Debug)]
pub struct SnapshotStore<K> {
    slot: K,
    key: String,
}

impl<K: KeyValueSlot> SnapshotStore<K> {
    /// Create a snapshot store over `slot` using [`DEFAULT_SNAPSHOT_KEY`]
    #[must_use]
    pub fn new(slot: K) -> Self {
        Self {
            slot,
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }

    /// Use a different key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Key the snapshot lives under
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying slot
    #[must_use]
    pub const fn slot(&self) -> &K {
        &self.slot
    }

    /// Read the snapshot, reporting any failure
    ///
    /// A missing or blank entry is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the slot cannot be read or the stored
    /// value is not a JSON task list.
    pub fn try_load(&self) -> Result<Vec<Task>, SnapshotError> {
        match self.slot.get(&self.key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Read the snapshot, falling back to an empty list on any failure
    #[must_use]
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(todos) => {
                tracing::debug!(key = %self.key, tasks = todos.len(), "Loaded task snapshot");
                todos
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Discarding unreadable task snapshot");
                metrics::counter!("todo.snapshot.load_failed").increment(1);
                Vec::new()
            }
        }
    }

    /// Write the task list
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the list cannot be encoded or the slot
    /// cannot be written.
    pub fn save(&self, todos: &[Task]) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(todos)?;
        self.slot.set(&self.key, &raw)?;
        tracing::trace!(key = %self.key, tasks = todos.len(), "Saved task snapshot");
        metrics::counter!("todo.snapshot.saved").increment(1);
        Ok(())
    }
}

/// Post-dispatch hook that persists the task list when it changes
///
/// Only `todos` is compared; changes to the filter, error, or loading flags
/// never cause a write.
///
/// The save runs synchronously inside the dispatch. With a [`FileSlot`] that
/// means a blocking write and rename per list change while the store lock is
/// held, which keeps snapshots in dispatch order but costs one disk write of
/// latency per change. Slots backed by slow storage should not be used here.
#[derive(Debug)]
pub struct SnapshotSync<K> {
    snapshots: SnapshotStore<K>,
}

impl<K: KeyValueSlot> SnapshotSync<K> {
    /// Persist through `snapshots`
    #[must_use]
    pub const fn new(snapshots: SnapshotStore<K>) -> Self {
        Self { snapshots }
    }
}

impl<K: KeyValueSlot> StateObserver<TodoState> for SnapshotSync<K> {
    fn on_change(&self, previous: &TodoState, current: &TodoState) {
        if previous.todos == current.todos {
            return;
        }

        if let Err(error) = self.snapshots.save(&current.todos) {
            tracing::error!(key = %self.snapshots.key(), %error, "Failed to persist task snapshot");
            metrics::counter!("todo.snapshot.save_failed").increment(1);
        }
    }
}
