//! Key-value persistence behind the application state
//!
//! The session decides what to store under which key; a store only keeps
//! opaque bytes. [`FjallStore`] keeps them on disk, [`MemoryStore`] keeps
//! them for the lifetime of the process.

use chrono::Utc;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

use crate::{CityGuideError, Result};

/// Persistence strategy injected into a session
pub trait StateStore {
    /// Bytes saved under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn save(&self, key: &str, value: &[u8]) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CityGuideError::storage("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CityGuideError::storage("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CityGuideError::storage("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    value: Vec<u8>,
    saved_at: i64, // Unix timestamp (seconds)
}

/// On-disk store backed by a `fjall` keyspace
pub struct FjallStore {
    store: Keyspace,
    // must outlive the keyspace handle
    db: fjall::Database,
}

fn storage_err(err: impl std::fmt::Display) -> CityGuideError {
    CityGuideError::storage(err.to_string())
}

impl FjallStore {
    /// Open (or create) the store under `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening state store at {}", path.display());
        let db = fjall::Database::builder(path).open().map_err(storage_err)?;
        let store = db
            .keyspace("state", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_err)?;
        Ok(Self { store, db })
    }

    /// When `key` was last saved, as a Unix timestamp
    pub fn saved_at(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.entry(key)?.map(|entry| entry.saved_at))
    }

    fn entry(&self, key: &str) -> Result<Option<StoredEntry>> {
        let Some(bytes) = self
            .store
            .get(key.as_bytes().to_vec())
            .map_err(storage_err)?
        else {
            return Ok(None);
        };
        let entry: StoredEntry = postcard::from_bytes(&bytes).map_err(storage_err)?;
        Ok(Some(entry))
    }
}

impl StateStore for FjallStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entry(key)?.map(|entry| entry.value))
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = StoredEntry {
            value: value.to_vec(),
            saved_at: Utc::now().timestamp(),
        };
        let bytes = postcard::to_stdvec(&entry).map_err(storage_err)?;
        self.store
            .insert(key.as_bytes().to_vec(), bytes)
            .map_err(storage_err)?;
        self.db
            .persist(fjall::PersistMode::Buffer)
            .map_err(storage_err)?;
        debug!("Saved {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.store
            .remove(key.as_bytes().to_vec())
            .map_err(storage_err)?;
        self.db
            .persist(fjall::PersistMode::Buffer)
            .map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn StateStore) {
        assert_eq!(store.load("visited-sites").unwrap(), None);
        store.save("visited-sites", br#"["giralda"]"#).unwrap();
        assert_eq!(
            store.load("visited-sites").unwrap().as_deref(),
            Some(br#"["giralda"]"#.as_slice())
        );
        store.save("visited-sites", b"[]").unwrap();
        assert_eq!(store.load("visited-sites").unwrap().as_deref(), Some(b"[]".as_slice()));
        store.remove("visited-sites").unwrap();
        assert_eq!(store.load("visited-sites").unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_fjall_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FjallStore::open(temp_dir.path()).unwrap();
        exercise(&store);
    }

    #[test]
    fn test_fjall_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FjallStore::open(temp_dir.path()).unwrap();
            store.save("language", br#""de""#).unwrap();
            assert!(store.saved_at("language").unwrap().is_some());
        }

        let store = FjallStore::open(temp_dir.path()).unwrap();
        assert_eq!(
            store.load("language").unwrap().as_deref(),
            Some(br#""de""#.as_slice())
        );
    }
}
