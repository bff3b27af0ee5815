//! Session store: The persisted neurologist record under two keys.
//!
//! Every successful save writes identical JSON under [`PRIMARY_KEY`] and
//! [`LEGACY_KEY`], so sessions created by older builds stay readable and the
//! store converges on the current layout on the next write. The legacy key has
//! no removal date and is kept indefinitely.
//!
//! Storage failures never escape this type: reads degrade to "no record",
//! writes report `false`, and both are logged.

use std::sync::Arc;

use crate::domain::UserRecord;
use crate::ports::KeyValueStore;

/// Current storage key.
pub const PRIMARY_KEY: &str = "neuroai_user";

/// Key written by older builds; still read as a fallback and still written.
pub const LEGACY_KEY: &str = "neuroAIUser";

/// Durable persistence for the single user record.
pub struct SessionStore<S: KeyValueStore> {
    storage: Arc<S>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Serialize `record` and write it under both keys in one atomic step.
    ///
    /// # Returns
    /// `false` if nothing was written; `load` then sees the previous contents.
    pub fn save(&self, record: &UserRecord) -> bool {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize user record: {}", e);
                return false;
            }
        };

        match self
            .storage
            .set_all(&[(PRIMARY_KEY, json.as_str()), (LEGACY_KEY, json.as_str())])
        {
            Ok(()) => {
                tracing::debug!("Persisted user record {}", record.id);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to persist user record: {}", e);
                false
            }
        }
    }

    /// Read the stored record: primary key first, legacy key if the primary is absent.
    ///
    /// A primary entry that exists but does not parse counts as "no record";
    /// the legacy key is only consulted when the primary is missing.
    #[must_use]
    pub fn load(&self) -> Option<UserRecord> {
        match self.read(PRIMARY_KEY) {
            Slot::Found(record) => Some(record),
            Slot::Unusable => None,
            Slot::Empty => match self.read(LEGACY_KEY) {
                Slot::Found(record) => {
                    tracing::debug!("Loaded user record from legacy key");
                    Some(record)
                }
                Slot::Empty | Slot::Unusable => None,
            },
        }
    }

    /// Remove both keys. Clearing an empty store is a no-op.
    ///
    /// # Returns
    /// `false` if the removal failed.
    pub fn clear(&self) -> bool {
        match self.storage.remove_all(&[PRIMARY_KEY, LEGACY_KEY]) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to clear user record: {}", e);
                false
            }
        }
    }

    /// End the stored session: clear both keys, or failing that, flag
    /// whatever is left as signed out so a restart does not restore it.
    ///
    /// # Returns
    /// `false` if a signed-in record is still stored.
    pub fn revoke(&self) -> bool {
        if self.clear() {
            return true;
        }

        for key in [PRIMARY_KEY, LEGACY_KEY] {
            let Slot::Found(mut record) = self.read(key) else {
                continue;
            };
            if !record.is_authenticated {
                continue;
            }
            record.is_authenticated = false;
            let demoted = serde_json::to_string(&record)
                .map_err(|e| e.to_string())
                .and_then(|json| self.storage.set(key, &json).map_err(|e| e.to_string()));
            if let Err(e) = demoted {
                tracing::warn!("Failed to mark {} as signed out: {}", key, e);
            }
        }

        let restorable = self.load().is_some_and(|record| record.is_authenticated);
        if restorable {
            tracing::error!("A signed-in record is still stored after sign-out");
        }
        !restorable
    }

    /// Rewrite a legacy-only record under both keys.
    ///
    /// Saves already re-emit both keys, so this only matters for a session
    /// that is restored and never written again.
    ///
    /// # Returns
    /// `true` if a legacy record was copied forward.
    pub fn migrate_legacy(&self) -> bool {
        if !matches!(self.read(PRIMARY_KEY), Slot::Empty) {
            return false;
        }
        match self.read(LEGACY_KEY) {
            Slot::Found(record) => {
                let migrated = self.save(&record);
                if migrated {
                    tracing::info!("Migrated legacy session record to {}", PRIMARY_KEY);
                }
                migrated
            }
            Slot::Empty | Slot::Unusable => false,
        }
    }

    fn read(&self, key: &str) -> Slot {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Slot::Empty,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return Slot::Unusable;
            }
        };

        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(record) => Slot::Found(record),
            Err(e) => {
                tracing::warn!("Ignoring malformed record under {}: {}", key, e);
                Slot::Unusable
            }
        }
    }
}

impl<S: KeyValueStore> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

/// Outcome of reading one key.
enum Slot {
    Empty,
    Found(UserRecord),
    Unusable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryStore, SqliteStore};
    use crate::application::testing::FlakyStore;
    use crate::domain::sample_user;

    fn memory_store() -> (Arc<MemoryStore>, SessionStore<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        (Arc::clone(&storage), SessionStore::new(storage))
    }

    #[test]
    fn test_save_writes_identical_json_under_both_keys() {
        let (storage, store) = memory_store();
        let record = sample_user("jane@x.com");

        assert!(store.save(&record));

        let primary = storage.get(PRIMARY_KEY).expect("read").expect("primary");
        let legacy = storage.get(LEGACY_KEY).expect("read").expect("legacy");
        assert_eq!(primary, legacy);
        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn test_load_round_trip_from_primary_only() {
        let (storage, store) = memory_store();
        let record = sample_user("jane@x.com");
        let json = serde_json::to_string(&record).expect("serialize");
        storage.set(PRIMARY_KEY, &json).expect("write");

        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn test_load_round_trip_from_legacy_only() {
        let (storage, store) = memory_store();
        let record = sample_user("jane@x.com");
        let json = serde_json::to_string(&record).expect("serialize");
        storage.set(LEGACY_KEY, &json).expect("write");

        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn test_malformed_primary_is_no_record() {
        let (storage, store) = memory_store();
        let json = serde_json::to_string(&sample_user("jane@x.com")).expect("serialize");
        storage.set(PRIMARY_KEY, "{not json").expect("write");
        storage.set(LEGACY_KEY, &json).expect("write");

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_malformed_legacy_is_no_record() {
        let (storage, store) = memory_store();
        storage.set(LEGACY_KEY, "[]").expect("write");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (storage, store) = memory_store();
        assert!(store.save(&sample_user("jane@x.com")));

        assert!(store.clear());
        assert_eq!(store.load(), None);
        assert!(store.clear());
        assert_eq!(store.load(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_previous_record_visible() {
        let storage = Arc::new(FlakyStore::new());
        let store = SessionStore::new(Arc::clone(&storage));
        let original = sample_user("jane@x.com");
        assert!(store.save(&original));

        storage.fail_writes_to(LEGACY_KEY);
        let mut replacement = sample_user("john@x.com");
        replacement.last_name = "Smith".to_string();
        assert!(!store.save(&replacement));

        assert_eq!(store.load(), Some(original.clone()));
        assert_eq!(
            storage.raw(PRIMARY_KEY),
            Some(serde_json::to_string(&original).expect("serialize"))
        );
    }

    #[test]
    fn test_failed_first_save_writes_nothing() {
        let storage = Arc::new(FlakyStore::new());
        storage.fail_writes_to(LEGACY_KEY);
        let store = SessionStore::new(Arc::clone(&storage));

        assert!(!store.save(&sample_user("jane@x.com")));
        assert_eq!(store.load(), None);
        assert_eq!(storage.raw(PRIMARY_KEY), None);
    }

    #[test]
    fn test_read_failure_is_no_record() {
        let storage = Arc::new(FlakyStore::new());
        let store = SessionStore::new(Arc::clone(&storage));
        assert!(store.save(&sample_user("jane@x.com")));

        storage.fail_reads();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_revoke_demotes_record_it_cannot_remove() {
        let storage = Arc::new(FlakyStore::new());
        let store = SessionStore::new(Arc::clone(&storage));
        assert!(store.save(&sample_user("jane@x.com")));

        storage.fail_writes_to(LEGACY_KEY);
        assert!(store.revoke());

        let left = store.load().expect("primary keeps a signed-out copy");
        assert!(!left.is_authenticated);
        assert_eq!(left.email, "jane@x.com");

        storage.heal();
        assert!(store.revoke());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_revoke_reports_record_it_cannot_touch() {
        let storage = Arc::new(FlakyStore::new());
        let store = SessionStore::new(Arc::clone(&storage));
        assert!(store.save(&sample_user("jane@x.com")));

        storage.fail_writes_to(PRIMARY_KEY);
        storage.fail_writes_to(LEGACY_KEY);
        assert!(!store.revoke());
    }

    #[test]
    fn test_migrate_legacy_copies_forward() {
        let (storage, store) = memory_store();
        let record = sample_user("jane@x.com");
        let json = serde_json::to_string(&record).expect("serialize");
        storage.set(LEGACY_KEY, &json).expect("write");

        assert!(store.migrate_legacy());
        assert_eq!(storage.get(PRIMARY_KEY).expect("read"), Some(json));
        assert!(!store.migrate_legacy());
    }

    #[test]
    fn test_session_store_over_sqlite() {
        let storage = Arc::new(SqliteStore::in_memory().expect("Should create db"));
        let store = SessionStore::new(Arc::clone(&storage));
        let record = sample_user("jane@x.com");

        assert!(store.save(&record));
        assert_eq!(store.load(), Some(record));
        assert!(store.clear());
        assert!(storage.keys().expect("Should list").is_empty());
    }
}
