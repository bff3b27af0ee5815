//! In-memory adapter: Implementation of KeyValueStore.
//!
//! Nothing survives the process. Used by tests and `NEUROAI_EPHEMERAL` runs.

use std::collections::HashMap;
use std::sync::Mutex;

use super::StorageError;
use crate::ports::KeyValueStore;

/// HashMap-backed key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), Self::Error> {
        // Single lock acquisition: all entries land together.
        let mut map = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        for &(key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").expect("Should read").is_none());

        store.set("a", "1").expect("Should write");
        assert_eq!(store.get("a").expect("Should read").as_deref(), Some("1"));

        store.remove("a").expect("Should remove");
        store.remove("a").expect("Removing twice is fine");
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_all() {
        let store = MemoryStore::new();
        store
            .set_all(&[("primary", "x"), ("legacy", "x")])
            .expect("Should write");
        assert_eq!(store.len(), 2);
    }
}
