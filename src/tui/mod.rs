//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the clinician-facing views:
//! - Landing page with sign-in and the model overview
//! - Sign-in page and account overlays
//! - Model workspaces (patient form, results, heatmap)
//! - Guided exercise games

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::ClinicalTheme;
pub use worker::{BackendJob, BackendOutcome, BackendProgress, BackendWorker, BackendWorkerHandle};
