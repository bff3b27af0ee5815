//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `sqlite`: SQLite-backed key-value store (durable local storage)
//! - `memory`: in-process key-value store
//! - `http`: reqwest client for the prediction backend
//! - `sanitize`: PII filtering for logs

pub mod http;
pub mod memory;
pub mod sanitize;
pub mod sqlite;

pub use http::{BackendError, HttpBackend};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Error type for key-value storage adapters.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
