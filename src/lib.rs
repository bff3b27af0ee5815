//! # NeuroAI
//!
//! Clinical EEG analytics dashboard for neurologists, run in the terminal.
//!
//! This crate provides:
//! - A locally persisted neurologist session (sign-in, sign-up, sign-out)
//! - Hash-fragment routing with access gating for the model workspaces
//! - A client for the EEG prediction, heatmap and exercise-game backend
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (UserRecord, Route, ModalState, forms, patient data)
//! - `ports`: Trait definitions for storage and the analysis backend
//! - `adapters`: Concrete implementations (SQLite, in-memory, reqwest)
//! - `application`: Session store, auth manager, router, gate, overlays
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::Shell;
pub use config::AppConfig;
pub use domain::{Route, SessionState, UserRecord};

/// Main error type for NeuroAI
#[derive(Debug, thiserror::Error)]
pub enum NeuroAiError {
    #[error("Backend request failed: {0}")]
    Backend(#[from] adapters::BackendError),
}
