//! Domain layer: Core business types and validation rules.
//!
//! Pure types with no I/O beyond file metadata checks on EEG uploads.

pub mod exercise;
pub mod forms;
mod modal;
mod patient;
mod route;
mod user;

pub use exercise::{ExerciseSection, GameLaunch};
pub use forms::{FormErrors, SignUpDraft, TextField};
pub use modal::ModalState;
pub use patient::{
    check_eeg_image, date_of_birth_from_age, AnalysisModel, Finding, Gender, PatientSubmission,
    PredictionReport, MAX_EEG_IMAGE_BYTES,
};
pub use route::Route;
pub use user::{Role, SessionState, Specialization, UserRecord};

#[cfg(test)]
pub(crate) use user::sample_user;
