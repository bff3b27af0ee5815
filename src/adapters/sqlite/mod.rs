//! SQLite adapter: Implementation of KeyValueStore.
//!
//! Provides durable local storage for the dashboard: one table of string
//! keys and values, the terminal counterpart of browser `localStorage`.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex surfaces as
//! [`StorageError::LockPoisoned`]; the session layer treats that like any
//! other storage failure (no session, write did not happen).

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::StorageError;
use crate::ports::KeyValueStore;

/// SQLite key-value store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given database path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// List stored keys (diagnostics).
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

const UPSERT: &str = r"
    INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

impl KeyValueStore for SqliteStore {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(UPSERT, params![key, value, now])?;
        tracing::trace!("Stored key {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), Self::Error> {
        let mut conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();

        // Dropping the transaction without commit rolls back every entry.
        let tx = conn.transaction()?;
        for &(key, value) in entries {
            tx.execute(UPSERT, params![key, value, now])?;
        }
        tx.commit()?;

        tracing::debug!("Stored {} keys in one transaction", entries.len());
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_crud() {
        let store = SqliteStore::in_memory().expect("Should create db");

        assert!(store.get("neuroai_user").expect("Should read").is_none());

        store.set("neuroai_user", "{}").expect("Should write");
        assert_eq!(
            store.get("neuroai_user").expect("Should read").as_deref(),
            Some("{}")
        );

        store.set("neuroai_user", "{\"a\":1}").expect("Should overwrite");
        assert_eq!(
            store.get("neuroai_user").expect("Should read").as_deref(),
            Some("{\"a\":1}")
        );

        store.remove("neuroai_user").expect("Should delete");
        assert!(store.get("neuroai_user").expect("Should read").is_none());
    }

    #[test]
    fn test_set_all_and_remove_all() {
        let store = SqliteStore::in_memory().expect("Should create db");

        store
            .set_all(&[("neuroai_user", "v"), ("neuroAIUser", "v")])
            .expect("Should write");
        assert_eq!(
            store.keys().expect("Should list"),
            vec!["neuroAIUser".to_string(), "neuroai_user".to_string()]
        );

        store
            .remove_all(&["neuroai_user", "neuroAIUser"])
            .expect("Should delete");
        assert!(store.keys().expect("Should list").is_empty());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("neuroai.db");

        {
            let store = SqliteStore::new(&path).expect("Should open");
            store.set("neuroai_user", "persisted").expect("Should write");
        }

        let reopened = SqliteStore::new(&path).expect("Should reopen");
        assert_eq!(
            reopened.get("neuroai_user").expect("Should read").as_deref(),
            Some("persisted")
        );
    }
}
