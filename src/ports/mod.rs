//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (local storage, the
//! prediction backend).

mod backend;
mod storage;

pub use backend::AnalysisBackend;
pub use storage::KeyValueStore;
