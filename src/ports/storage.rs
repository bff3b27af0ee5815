//! Storage port: Durable string key-value persistence.
//!
//! Plays the role of browser `localStorage`: a flat namespace of string keys
//! holding serialized strings. The session layer decides what to store.

/// Trait for local key-value storage.
///
/// Implementations need only be safe for a single writer; concurrent writers
/// from separate processes follow last-write-wins.
pub trait KeyValueStore {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `None` if the key is absent.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the backend rejects the write (e.g. quota, I/O).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns error if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;

    /// Write several entries so that either all of them or none become visible.
    ///
    /// The default implementation writes entries in order and, on failure,
    /// restores the previous value of every key it already touched. Backends
    /// with native transactions should override it.
    ///
    /// # Errors
    /// Returns the first write error after rollback has been attempted.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), Self::Error> {
        let mut previous: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());

        for &(key, value) in entries {
            let before = match self.get(key) {
                Ok(before) => before,
                Err(e) => {
                    rollback(self, &previous);
                    return Err(e);
                }
            };
            previous.push((key, before));

            if let Err(e) = self.set(key, value) {
                rollback(self, &previous);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Remove several keys so that either all of them or none disappear.
    ///
    /// The default implementation removes keys in order and, on failure,
    /// puts back every key it already removed.
    ///
    /// # Errors
    /// Returns the first error after rollback has been attempted.
    fn remove_all(&self, keys: &[&str]) -> Result<(), Self::Error> {
        let mut removed: Vec<(&str, Option<String>)> = Vec::with_capacity(keys.len());

        for &key in keys {
            let before = match self.get(key) {
                Ok(before) => before,
                Err(e) => {
                    rollback(self, &removed);
                    return Err(e);
                }
            };

            if let Err(e) = self.remove(key) {
                rollback(self, &removed);
                return Err(e);
            }
            removed.push((key, before));
        }

        Ok(())
    }
}

/// Put back the values captured before a failed multi-entry write or removal.
fn rollback<S: KeyValueStore + ?Sized>(store: &S, previous: &[(&str, Option<String>)]) {
    for (key, before) in previous.iter().rev() {
        let outcome = match before {
            Some(value) => store.set(key, value),
            None => store.remove(key),
        };
        if let Err(e) = outcome {
            tracing::error!("Rollback of key {} failed: {}", key, e);
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    type Error = T::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), Self::Error> {
        (**self).set_all(entries)
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), Self::Error> {
        (**self).remove_all(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FlakyStore;

    #[test]
    fn test_set_all_rolls_back_on_failure() {
        let store = FlakyStore::new();
        store.set("a", "old").expect("Should write");
        store.fail_writes_to("b");

        assert!(store.set_all(&[("a", "new"), ("b", "new")]).is_err());
        assert_eq!(store.raw("a").as_deref(), Some("old"));
        assert_eq!(store.raw("b"), None);
    }

    #[test]
    fn test_remove_all_rolls_back_on_failure() {
        let store = FlakyStore::new();
        store.set_all(&[("a", "1"), ("b", "2")]).expect("Should write");
        store.fail_writes_to("b");

        assert!(store.remove_all(&["a", "b"]).is_err());
        assert_eq!(store.raw("a").as_deref(), Some("1"));
        assert_eq!(store.raw("b").as_deref(), Some("2"));

        store.heal();
        store.remove_all(&["a", "b"]).expect("Should remove");
        assert_eq!(store.raw("a"), None);
        assert_eq!(store.raw("b"), None);
    }
}
