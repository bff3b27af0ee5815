//! Analysis backend port: The remote prediction service.
//!
//! The dashboard treats the backend's payloads as opaque beyond a
//! success/error convention; adapters turn responses into domain summaries.

use std::path::Path;

use crate::domain::{GameLaunch, PatientSubmission, PredictionReport};

/// Trait for the EEG analysis service.
///
/// Calls block; the TUI runs them on a background worker.
pub trait AnalysisBackend: Send + Sync {
    /// Error type for backend calls.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit patient data and EEG image to the selected models.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status or `success: false`.
    fn predict(&self, submission: &PatientSubmission) -> Result<PredictionReport, Self::Error>;

    /// Convert an EEG image into a heatmap.
    ///
    /// # Returns
    /// Absolute URL of the generated heatmap.
    ///
    /// # Errors
    /// Returns error if the conversion fails or no URL is returned.
    fn convert_heatmap(&self, image: &Path) -> Result<String, Self::Error>;

    /// Launch an exercise game on the backend host.
    ///
    /// # Errors
    /// Returns error if the launcher refuses (e.g. a game is already running).
    fn start_game(&self, launch: GameLaunch) -> Result<(), Self::Error>;
}
