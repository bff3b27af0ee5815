//! Test doubles shared by the application tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::adapters::StorageError;
use crate::ports::KeyValueStore;

/// Key-value store that can be told to reject reads or writes to chosen keys.
///
/// Uses the trait's default `set_all`, so failed multi-key writes go through
/// the rollback path.
#[derive(Default)]
pub(crate) struct FlakyStore {
    entries: Mutex<HashMap<String, String>>,
    failing_keys: Mutex<HashSet<String>>,
    failing_reads: Mutex<bool>,
    writes: Mutex<usize>,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_writes_to(&self, key: &str) {
        self.failing_keys
            .lock()
            .expect("failing keys lock")
            .insert(key.to_string());
    }

    pub(crate) fn heal(&self) {
        self.failing_keys.lock().expect("failing keys lock").clear();
        *self.failing_reads.lock().expect("failing reads lock") = false;
    }

    pub(crate) fn fail_reads(&self) {
        *self.failing_reads.lock().expect("failing reads lock") = true;
    }

    /// Stored value, bypassing injected failures.
    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("entries lock").get(key).cloned()
    }

    /// Number of successful `set` calls.
    pub(crate) fn write_count(&self) -> usize {
        *self.writes.lock().expect("writes lock")
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        if self.failing_keys.lock().expect("failing keys lock").contains(key) {
            return Err(StorageError::Unavailable(format!("quota exceeded for {key}")));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        if *self.failing_reads.lock().expect("failing reads lock") {
            return Err(StorageError::Unavailable("read failure".to_string()));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.check_write(key)?;
        self.entries
            .lock()
            .expect("entries lock")
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().expect("writes lock") += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.check_write(key)?;
        self.entries.lock().expect("entries lock").remove(key);
        Ok(())
    }
}
