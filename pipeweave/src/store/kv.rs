//! Key-value store trait and implementations.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{PipeweaveError, Result};

/// String-keyed, string-valued storage with last-writer-wins semantics.
///
/// Access is single-threaded by construction in the wizard, so no
/// locking discipline is required of callers.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a value. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used in tests and as an ephemeral fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.write().remove(key);
        Ok(())
    }
}

/// A store persisted as one JSON object in a file.
///
/// The file is read once at open; an unreadable or unparsable file yields
/// an empty store rather than an error. Every write rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Opens a store backed by the given file.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = Self::load(&path).unwrap_or_default();
        Self {
            path,
            map: RwLock::new(map),
        }
    }

    fn load(path: &Path) -> Option<HashMap<String, String>> {
        let raw = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn flush(&self, map: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| PipeweaveError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| PipeweaveError::Storage(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.map.write();
        map.insert(key.to_string(), value.to_string());
        self.flush(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.map.write();
        map.remove(key);
        self.flush(&map)
    }
}
