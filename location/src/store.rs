//! Durable persistence for the cached location.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, io};

use crate::Location;

/// Storage key under which the service persists its last known location.
///
/// Exactly one record lives under this key; there is no history and no
/// versioning.
pub const STORED_LOCATION_KEY: &str = "geokit.location.last-known";

/// Errors a [`LocationStore`] may report.
///
/// The service swallows all of them: a failed read counts as "no cached
/// value" and a failed write is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage io: {0}")]
    Io(#[from] io::Error),
    /// A stored record could not be encoded or decoded.
    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Durable key/value persistence for location records.
pub trait LocationStore: Send + Sync {
    /// Persist `location` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, location: &Location, key: &str) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or decoded.
    fn retrieve(&self, key: &str) -> Result<Option<Location>, StoreError>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be updated.
    fn reset(&self, key: &str) -> Result<(), StoreError>;
}

/// Volatile in-process store, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Location>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryStore {
    fn save(&self, location: &Location, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.insert(key.to_owned(), *location);
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Location>, StoreError> {
        let records = self.records.lock().expect("store mutex poisoned");
        Ok(records.get(key).copied())
    }

    fn reset(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        records.remove(key);
        Ok(())
    }
}

/// File-backed store keeping all records in one JSON document.
///
/// This is what lets the cached-location fallback survive an app relaunch.
/// Saves rewrite the whole document; with a single record that is one
/// small file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // serializes read-modify-write cycles on the backing file
    guard: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store backed by the JSON document at `path`.
    ///
    /// The file is created on first save; a missing file reads as empty.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, Location>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, records: &HashMap<String, Location>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(records)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl LocationStore for JsonFileStore {
    fn save(&self, location: &Location, key: &str) -> Result<(), StoreError> {
        let _guard = self.guard.lock().expect("store mutex poisoned");
        let mut records = self.read_all()?;
        records.insert(key.to_owned(), *location);
        self.write_all(&records)
    }

    fn retrieve(&self, key: &str) -> Result<Option<Location>, StoreError> {
        let _guard = self.guard.lock().expect("store mutex poisoned");
        Ok(self.read_all()?.get(key).copied())
    }

    fn reset(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.guard.lock().expect("store mutex poisoned");
        let mut records = self.read_all()?;
        if records.remove(key).is_some() {
            self.write_all(&records)?;
        }
        Ok(())
    }
}
