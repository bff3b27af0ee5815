//! Background worker for backend calls.
//!
//! Prediction uploads, heatmap conversion and game launches block on the
//! network. They run on a worker thread and report over a channel so the
//! render loop stays responsive.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::adapters::BackendError;
use crate::domain::{GameLaunch, PatientSubmission, PredictionReport};
use crate::ports::AnalysisBackend;
use crate::NeuroAiError;

/// Work the worker can run.
#[derive(Debug, Clone)]
pub enum BackendJob {
    Predict(PatientSubmission),
    Heatmap(PathBuf),
    StartGame(GameLaunch),
}

/// Successful job result.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    Prediction(PredictionReport),
    /// Absolute heatmap URL.
    Heatmap(String),
    GameStarted,
}

/// Progress updates from the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendProgress {
    /// Request is being sent
    Sending,
    /// Finished with a result
    Complete(BackendOutcome),
    /// Failed; the message is ready to show
    Error(String),
}

const WORKER_LOST: &str = "The background task stopped unexpectedly. Please try again.";

/// Handle to a running job.
pub struct BackendWorkerHandle {
    progress_rx: Receiver<BackendProgress>,
    _handle: JoinHandle<()>,
}

impl BackendWorkerHandle {
    /// Next progress update, if any (non-blocking).
    ///
    /// A worker that exits without a final update is reported as an error.
    #[must_use]
    pub fn try_recv(&self) -> Option<BackendProgress> {
        match self.progress_rx.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Backend worker exited without reporting a result");
                Some(BackendProgress::Error(WORKER_LOST.to_string()))
            }
        }
    }

    #[cfg(test)]
    fn recv_timeout(&self, timeout: std::time::Duration) -> Option<BackendProgress> {
        self.progress_rx.recv_timeout(timeout).ok()
    }
}

/// Spawns one thread per job.
pub struct BackendWorker;

impl BackendWorker {
    pub fn spawn<B>(backend: Arc<B>, job: BackendJob) -> BackendWorkerHandle
    where
        B: AnalysisBackend + 'static,
        B::Error: Into<NeuroAiError>,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(backend.as_ref(), job, &tx);
        });

        BackendWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run<B>(backend: &B, job: BackendJob, tx: &Sender<BackendProgress>)
    where
        B: AnalysisBackend,
        B::Error: Into<NeuroAiError>,
    {
        let _ = tx.send(BackendProgress::Sending);

        let update = match job {
            BackendJob::Predict(submission) => match backend.predict(&submission) {
                Ok(report) => BackendProgress::Complete(BackendOutcome::Prediction(report)),
                Err(e) => {
                    let e: NeuroAiError = e.into();
                    tracing::warn!("Prediction failed: {}", e);
                    BackendProgress::Error(format!("An error occurred: {}", detail(&e)))
                }
            },
            BackendJob::Heatmap(image) => match backend.convert_heatmap(&image) {
                Ok(url) => BackendProgress::Complete(BackendOutcome::Heatmap(url)),
                Err(e) => {
                    let e: NeuroAiError = e.into();
                    tracing::warn!("Heatmap conversion failed: {}", e);
                    BackendProgress::Error(format!("Failed to convert to heatmap: {}", detail(&e)))
                }
            },
            BackendJob::StartGame(launch) => match backend.start_game(launch) {
                Ok(()) => BackendProgress::Complete(BackendOutcome::GameStarted),
                Err(e) => {
                    let e: NeuroAiError = e.into();
                    tracing::warn!("Game launch failed: {}", e);
                    BackendProgress::Error(game_error_message(&e))
                }
            },
        };

        let _ = tx.send(update);
    }
}

/// Server-provided message where there is one, otherwise the error text.
fn detail(e: &NeuroAiError) -> String {
    match e {
        NeuroAiError::Backend(BackendError::Status { message, .. })
        | NeuroAiError::Backend(BackendError::Rejected(message)) => message.clone(),
        other => other.to_string(),
    }
}

fn game_error_message(e: &NeuroAiError) -> String {
    match e {
        NeuroAiError::Backend(BackendError::GameAlreadyRunning) => {
            "A game is already running. Please complete it first.".to_string()
        }
        _ => "Could not start the game. Please ensure the backend server is running.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisModel, ExerciseSection, Gender};
    use chrono::NaiveDate;
    use std::path::Path;
    use std::time::Duration;

    struct StubBackend {
        game_running: bool,
    }

    impl AnalysisBackend for StubBackend {
        type Error = BackendError;

        fn predict(&self, _: &PatientSubmission) -> Result<PredictionReport, Self::Error> {
            Err(BackendError::Status {
                status: 400,
                message: "Invalid EEG image".to_string(),
            })
        }

        fn convert_heatmap(&self, image: &Path) -> Result<String, Self::Error> {
            Ok(format!("http://backend/heatmaps/{}", image.display()))
        }

        fn start_game(&self, _: GameLaunch) -> Result<(), Self::Error> {
            if self.game_running {
                Err(BackendError::GameAlreadyRunning)
            } else {
                Ok(())
            }
        }
    }

    fn final_update(handle: &BackendWorkerHandle) -> BackendProgress {
        assert_eq!(
            handle.recv_timeout(Duration::from_secs(5)),
            Some(BackendProgress::Sending)
        );
        handle
            .recv_timeout(Duration::from_secs(5))
            .expect("worker should report")
    }

    #[test]
    fn test_heatmap_job_completes() {
        let backend = Arc::new(StubBackend {
            game_running: false,
        });
        let handle = BackendWorker::spawn(backend, BackendJob::Heatmap(PathBuf::from("scan.png")));
        assert_eq!(
            final_update(&handle),
            BackendProgress::Complete(BackendOutcome::Heatmap(
                "http://backend/heatmaps/scan.png".to_string()
            ))
        );
    }

    #[test]
    fn test_game_already_running_message() {
        let backend = Arc::new(StubBackend { game_running: true });
        let launch = GameLaunch::new(ExerciseSection::Focus, 0);
        let handle = BackendWorker::spawn(backend, BackendJob::StartGame(launch));
        assert_eq!(
            final_update(&handle),
            BackendProgress::Error("A game is already running. Please complete it first.".to_string())
        );
    }

    struct CrashingBackend;

    impl AnalysisBackend for CrashingBackend {
        type Error = BackendError;

        fn predict(&self, _: &PatientSubmission) -> Result<PredictionReport, Self::Error> {
            panic!("predict crashed");
        }

        fn convert_heatmap(&self, _: &Path) -> Result<String, Self::Error> {
            panic!("heatmap crashed");
        }

        fn start_game(&self, _: GameLaunch) -> Result<(), Self::Error> {
            panic!("game crashed");
        }
    }

    #[test]
    fn test_crashed_worker_reports_error() {
        let handle = BackendWorker::spawn(
            Arc::new(CrashingBackend),
            BackendJob::Heatmap(PathBuf::from("scan.png")),
        );

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut last = None;
        while std::time::Instant::now() < deadline {
            match handle.try_recv() {
                Some(BackendProgress::Sending) | None => thread::sleep(Duration::from_millis(5)),
                Some(update) => {
                    last = Some(update);
                    break;
                }
            }
        }
        assert_eq!(last, Some(BackendProgress::Error(WORKER_LOST.to_string())));
    }

    #[test]
    fn test_prediction_error_uses_server_message() {
        let backend = Arc::new(StubBackend {
            game_running: false,
        });
        let submission = PatientSubmission {
            name: "John Smith".to_string(),
            age: 40,
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1985, 1, 1).expect("valid date"),
            past_medical_reports: String::new(),
            eeg_image: PathBuf::from("scan.png"),
            selected_models: vec![AnalysisModel::EmotionRecognition],
        };
        let handle = BackendWorker::spawn(backend, BackendJob::Predict(submission));
        assert_eq!(
            final_update(&handle),
            BackendProgress::Error("An error occurred: Invalid EEG image".to_string())
        );
    }
}
