//! Patient submission types for the EEG analysis models.
//!
//! These values cross the boundary to the prediction backend; the backend's
//! domain payload is summarised, not interpreted.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::route::Route;

/// Maximum accepted EEG image size (5 MiB, exclusive).
pub const MAX_EEG_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// The three EEG analysis models offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisModel {
    #[serde(rename = "Predictive Treatment Response")]
    PredictiveTreatment,
    #[serde(rename = "Emotion Recognition Using EEG")]
    EmotionRecognition,
    #[serde(rename = "Cognitive Monitoring System")]
    CognitiveMonitoring,
}

impl AnalysisModel {
    pub const ALL: [AnalysisModel; 3] = [
        Self::PredictiveTreatment,
        Self::EmotionRecognition,
        Self::CognitiveMonitoring,
    ];

    /// Label sent to the backend in `selectedModels`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PredictiveTreatment => "Predictive Treatment Response",
            Self::EmotionRecognition => "Emotion Recognition Using EEG",
            Self::CognitiveMonitoring => "Cognitive Monitoring System",
        }
    }

    /// Stable identifier used by the model switcher.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::PredictiveTreatment => "predictive-treatment",
            Self::EmotionRecognition => "emotion-recognition",
            Self::CognitiveMonitoring => "cognitive-monitoring",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Self::PredictiveTreatment => Route::Predictive,
            Self::EmotionRecognition => Route::Emotion,
            Self::CognitiveMonitoring => Route::Cognitive,
        }
    }

    #[must_use]
    pub fn from_route(route: Route) -> Option<Self> {
        match route {
            Route::Predictive => Some(Self::PredictiveTreatment),
            Route::Emotion => Some(Self::EmotionRecognition),
            Route::Cognitive => Some(Self::CognitiveMonitoring),
            _ => None,
        }
    }

    /// Key of this model's entry in a multi-model `results` object.
    #[must_use]
    pub fn result_key(&self) -> &'static str {
        match self {
            Self::PredictiveTreatment => "therapy",
            Self::EmotionRecognition => "emotion",
            Self::CognitiveMonitoring => "cognitive",
        }
    }

    /// Heading used when reporting this model's verdict.
    #[must_use]
    pub fn finding_heading(&self) -> &'static str {
        match self {
            Self::PredictiveTreatment => "Treatment Response",
            Self::EmotionRecognition => "Emotion",
            Self::CognitiveMonitoring => "Cognitive",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::PredictiveTreatment => {
                "Summarizes available patient information into a clear indication of likely \
                 treatment response. Complements clinical judgment during consultations."
            }
            Self::EmotionRecognition => {
                "Classifies emotional state from EEG recordings to support assessment and \
                 follow-up of affective symptoms."
            }
            Self::CognitiveMonitoring => {
                "Tracks cognitive load and attention markers from EEG to monitor change \
                 over time."
            }
        }
    }
}

impl std::fmt::Display for AnalysisModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Patient gender as accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Self::Male, Self::Female, Self::Other, Self::PreferNotToSay];

    /// Form value sent to the backend.
    #[must_use]
    pub fn value(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// A validated patient record ready for multipart submission.
#[derive(Debug, Clone)]
pub struct PatientSubmission {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub past_medical_reports: String,
    pub eeg_image: PathBuf,
    pub selected_models: Vec<AnalysisModel>,
}

impl PatientSubmission {
    /// `selectedModels` form value: a JSON array of model labels.
    #[must_use]
    pub fn selected_models_json(&self) -> String {
        let labels: Vec<&str> = self.selected_models.iter().map(AnalysisModel::label).collect();
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }

    /// Suggested file name for the generated PDF report.
    #[must_use]
    pub fn report_file_name(&self) -> String {
        let slug: Vec<&str> = self.name.split_whitespace().collect();
        format!("prediction_report_{}.pdf", slug.join("_"))
    }
}

/// Derive a date of birth from an age: 1 January of `today.year() - age`.
#[must_use]
pub fn date_of_birth_from_age(age: u8, today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(today.year() - i32::from(age), 1, 1)
}

/// Check that an EEG image exists, looks like an image and is under the size limit.
///
/// # Errors
/// Returns the user-facing message describing the first failed check.
pub fn check_eeg_image(path: &Path) -> Result<(), String> {
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !is_image {
        return Err("Please select an image file (JPG, PNG, GIF, etc.)".to_string());
    }

    let metadata = std::fs::metadata(path).map_err(|_| "EEG image not found".to_string())?;
    if !metadata.is_file() {
        return Err("EEG image not found".to_string());
    }
    if metadata.len() >= MAX_EEG_IMAGE_BYTES {
        return Err("File size must be less than 5MB".to_string());
    }
    Ok(())
}

/// One model verdict reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub heading: Option<&'static str>,
    pub label: String,
    pub confidence: f64,
}

impl Finding {
    #[must_use]
    pub fn summary(&self) -> String {
        let pct = format!("{:.2}%", self.confidence * 100.0);
        match self.heading {
            Some(heading) => format!("{heading}: {} ({pct})", self.label),
            None => format!("{} ({pct})", self.label),
        }
    }
}

/// Summary of a successful prediction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionReport {
    pub findings: Vec<Finding>,
    /// Absolute URL of the generated PDF, if the backend produced one.
    pub pdf_report: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_model_route_mapping() {
        for model in AnalysisModel::ALL {
            assert_eq!(AnalysisModel::from_route(model.route()), Some(model));
            assert_eq!(AnalysisModel::from_id(model.id()), Some(model));
        }
        assert_eq!(AnalysisModel::from_route(Route::Exercise), None);
    }

    #[test]
    fn test_selected_models_json() {
        let submission = PatientSubmission {
            name: "John Smith".to_string(),
            age: 40,
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1985, 1, 1).expect("valid date"),
            past_medical_reports: String::new(),
            eeg_image: PathBuf::from("scan.png"),
            selected_models: vec![
                AnalysisModel::PredictiveTreatment,
                AnalysisModel::CognitiveMonitoring,
            ],
        };
        assert_eq!(
            submission.selected_models_json(),
            r#"["Predictive Treatment Response","Cognitive Monitoring System"]"#
        );
        assert_eq!(submission.report_file_name(), "prediction_report_John_Smith.pdf");
    }

    #[test]
    fn test_date_of_birth_from_age() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
        assert_eq!(
            date_of_birth_from_age(40, today),
            NaiveDate::from_ymd_opt(1985, 1, 1)
        );
    }

    #[test]
    fn test_check_eeg_image() {
        let dir = tempfile::tempdir().expect("Should create temp dir");

        let image = dir.path().join("scan.PNG");
        let mut file = std::fs::File::create(&image).expect("Should create file");
        file.write_all(&[0x89, 0x50, 0x4e, 0x47]).expect("Should write");
        assert!(check_eeg_image(&image).is_ok());

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"hello").expect("Should write");
        assert!(check_eeg_image(&text).is_err());

        assert_eq!(
            check_eeg_image(&dir.path().join("missing.png")),
            Err("EEG image not found".to_string())
        );
    }

    #[test]
    fn test_finding_summary() {
        let finding = Finding {
            heading: Some("Emotion"),
            label: "Calm".to_string(),
            confidence: 0.8734,
        };
        assert_eq!(finding.summary(), "Emotion: Calm (87.34%)");
    }
}
