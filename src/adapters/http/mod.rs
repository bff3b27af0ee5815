//! HTTP adapter: Implementation of AnalysisBackend over the prediction API.
//!
//! Uses a blocking `reqwest` client; the TUI calls it from a background
//! worker so the render loop never waits on the network.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart::Form, Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{AnalysisModel, Finding, GameLaunch, PatientSubmission, PredictionReport};
use crate::ports::AnalysisBackend;

/// Default base URL of the prediction backend.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default request timeout. Predictions with PDF generation are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Error type for prediction backend calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("A game is already running. Please complete it first.")]
    GameAlreadyRunning,

    #[error("Cannot read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking client for the NeuroAI prediction backend.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("neuroai/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Read the body as JSON, turning non-success statuses into `Status` errors.
    fn read_json(response: Response, fallback: &str) -> Result<Value, BackendError> {
        let status = response.status();
        let body: Option<Value> = response.json().ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_field)
                .unwrap_or_else(|| fallback.to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        body.ok_or_else(|| BackendError::MalformedResponse("response is not JSON".to_string()))
    }
}

fn error_field(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Turn a `/api/predict` body into a report.
///
/// Multi-model responses carry a `results` object keyed by model; older
/// single-model responses put `label` and `confidence` at the top level.
///
/// # Errors
/// Returns `Rejected` when the body reports `success: false`.
pub fn parse_prediction(body: &Value, base_url: &str) -> Result<PredictionReport, BackendError> {
    if !body.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return Err(BackendError::Rejected(
            error_field(body).unwrap_or_else(|| "Prediction failed".to_string()),
        ));
    }

    let mut findings = Vec::new();
    if let Some(results) = body.get("results").filter(|r| r.is_object()) {
        for model in AnalysisModel::ALL {
            let Some(entry) = results.get(model.result_key()) else {
                continue;
            };
            if !entry.get("success").and_then(Value::as_bool).unwrap_or(false) {
                continue;
            }
            if let Some((label, confidence)) = label_and_confidence(entry) {
                findings.push(Finding {
                    heading: Some(model.finding_heading()),
                    label,
                    confidence,
                });
            }
        }
    } else if let Some((label, confidence)) = label_and_confidence(body) {
        findings.push(Finding {
            heading: None,
            label,
            confidence,
        });
    }

    let pdf_report = body
        .get("pdf_report")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(|path| format!("{base_url}{path}"));

    Ok(PredictionReport {
        findings,
        pdf_report,
    })
}

fn label_and_confidence(entry: &Value) -> Option<(String, f64)> {
    let label = entry.get("label").and_then(Value::as_str)?;
    let confidence = entry.get("confidence").and_then(Value::as_f64).unwrap_or(0.0);
    Some((label.to_string(), confidence))
}

impl AnalysisBackend for HttpBackend {
    type Error = BackendError;

    fn predict(&self, submission: &PatientSubmission) -> Result<PredictionReport, Self::Error> {
        debug!(
            "Submitting prediction for {} model(s)",
            submission.selected_models.len()
        );

        let form = Form::new()
            .text("name", submission.name.clone())
            .text("age", submission.age.to_string())
            .text("gender", submission.gender.value())
            .text(
                "dateOfBirth",
                submission.date_of_birth.format("%Y-%m-%d").to_string(),
            )
            .text("pastMedicalReports", submission.past_medical_reports.clone())
            .text("selectedModels", submission.selected_models_json())
            .file("eegImage", &submission.eeg_image)?;

        let response = self
            .client
            .post(self.endpoint("/api/predict"))
            .multipart(form)
            .send()?;

        let body = Self::read_json(response, "Failed to process prediction")?;
        let report = parse_prediction(&body, &self.base_url)?;
        debug!("Prediction returned {} finding(s)", report.findings.len());
        Ok(report)
    }

    fn convert_heatmap(&self, image: &Path) -> Result<String, Self::Error> {
        let form = Form::new().file("eegImage", image)?;

        let response = self
            .client
            .post(self.endpoint("/api/convert-heatmap"))
            .multipart(form)
            .send()?;

        let body = Self::read_json(response, "Heatmap conversion failed")?;
        body.get("heatmap_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}{url}", self.base_url))
            .ok_or_else(|| BackendError::MalformedResponse("missing heatmap_url".to_string()))
    }

    fn start_game(&self, launch: GameLaunch) -> Result<(), Self::Error> {
        let response = self
            .client
            .post(self.endpoint("/api/start-game"))
            .json(&launch)
            .send()?;

        let status = response.status();
        let body: Value = response.json().unwrap_or(Value::Null);
        let accepted = body.get("success").and_then(Value::as_bool).unwrap_or(false);

        if status.is_success() && accepted {
            debug!("Launched game {} for state {}", launch.index, launch.state);
            return Ok(());
        }

        let message = error_field(&body).unwrap_or_else(|| "Failed to start game".to_string());
        warn!("Game launch refused: {}", message);
        if message.contains("already running") {
            return Err(BackendError::GameAlreadyRunning);
        }
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:5000";

    #[test]
    fn test_parse_multi_model_results() {
        let body = json!({
            "success": true,
            "results": {
                "therapy": { "success": true, "label": "Responder", "confidence": 0.91 },
                "emotion": { "success": false, "error": "model offline" },
                "cognitive": { "success": true, "label": "High load", "confidence": 0.5 }
            },
            "pdf_report": "/reports/abc.pdf"
        });

        let report = parse_prediction(&body, BASE).expect("Should parse");
        let summaries: Vec<String> = report.findings.iter().map(Finding::summary).collect();
        assert_eq!(
            summaries,
            vec![
                "Treatment Response: Responder (91.00%)".to_string(),
                "Cognitive: High load (50.00%)".to_string(),
            ]
        );
        assert_eq!(
            report.pdf_report.as_deref(),
            Some("http://localhost:5000/reports/abc.pdf")
        );
    }

    #[test]
    fn test_parse_single_model_result() {
        let body = json!({ "success": true, "label": "Calm", "confidence": 0.25 });
        let report = parse_prediction(&body, BASE).expect("Should parse");
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].summary(), "Calm (25.00%)");
        assert!(report.pdf_report.is_none());
    }

    #[test]
    fn test_parse_rejected_prediction() {
        let body = json!({ "success": false, "error": "Invalid EEG image" });
        match parse_prediction(&body, BASE) {
            Err(BackendError::Rejected(message)) => assert_eq!(message, "Invalid EEG image"),
            other => panic!("Expected rejection, got {other:?}"),
        }

        let body = json!({ "results": {} });
        match parse_prediction(&body, BASE) {
            Err(BackendError::Rejected(message)) => assert_eq!(message, "Prediction failed"),
            other => panic!("Expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpBackend::new("http://127.0.0.1:5000/", Duration::from_secs(1))
            .expect("Should build client");
        assert_eq!(backend.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            backend.endpoint("/api/predict"),
            "http://127.0.0.1:5000/api/predict"
        );
    }
}
