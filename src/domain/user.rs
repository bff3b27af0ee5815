//! Neurologist account and session types.
//!
//! The persisted JSON layout of [`UserRecord`] is shared with older builds of
//! the dashboard, so field names are camelCase and must not be renamed.

use serde::{Deserialize, Serialize};

/// Account role. Only licensed neurologists may register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Neurologist,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neurologist => "neurologist",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical specialization, persisted as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "General Neurology")]
    GeneralNeurology,
    #[serde(rename = "Epilepsy")]
    Epilepsy,
    #[serde(rename = "Stroke/Neurovascular")]
    StrokeNeurovascular,
    #[serde(rename = "Movement Disorders")]
    MovementDisorders,
    #[serde(rename = "Neurocritical Care")]
    NeurocriticalCare,
    #[serde(rename = "Headache/Neurology")]
    HeadacheNeurology,
    #[serde(rename = "Multiple Sclerosis")]
    MultipleSclerosis,
    #[serde(rename = "Neuromuscular")]
    Neuromuscular,
    #[serde(rename = "Pediatric Neurology")]
    PediatricNeurology,
    #[serde(rename = "Neuroimmunology")]
    Neuroimmunology,
    #[serde(rename = "Behavioral/Memory")]
    BehavioralMemory,
    #[serde(rename = "Other")]
    Other,
}

impl Specialization {
    /// All specializations in the order offered by the registration form.
    pub const ALL: [Specialization; 12] = [
        Self::GeneralNeurology,
        Self::Epilepsy,
        Self::StrokeNeurovascular,
        Self::MovementDisorders,
        Self::NeurocriticalCare,
        Self::HeadacheNeurology,
        Self::MultipleSclerosis,
        Self::Neuromuscular,
        Self::PediatricNeurology,
        Self::Neuroimmunology,
        Self::BehavioralMemory,
        Self::Other,
    ];

    /// Human-readable label (also the persisted value).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeneralNeurology => "General Neurology",
            Self::Epilepsy => "Epilepsy",
            Self::StrokeNeurovascular => "Stroke/Neurovascular",
            Self::MovementDisorders => "Movement Disorders",
            Self::NeurocriticalCare => "Neurocritical Care",
            Self::HeadacheNeurology => "Headache/Neurology",
            Self::MultipleSclerosis => "Multiple Sclerosis",
            Self::Neuromuscular => "Neuromuscular",
            Self::PediatricNeurology => "Pediatric Neurology",
            Self::Neuroimmunology => "Neuroimmunology",
            Self::BehavioralMemory => "Behavioral/Memory",
            Self::Other => "Other",
        }
    }

    /// Look up a specialization by its exact label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for Specialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The single locally stored neurologist account.
///
/// The password is kept in plain text; credential hardening is out of scope
/// for this product and comparisons are exact string matches.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub specialization: Specialization,
    pub license_number: String,
    pub is_authenticated: bool,
}

impl UserRecord {
    /// Generate a record id from the current wall-clock time in milliseconds.
    #[must_use]
    pub fn new_id() -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }

    /// Exact, case-sensitive credential comparison.
    #[must_use]
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    /// Copy of this record flagged as authenticated.
    #[must_use]
    pub fn authenticated(mut self) -> Self {
        self.is_authenticated = true;
        self
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("Dr. {}", self.last_name)
    }
}

// Password is never printed, even at trace level.
impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("specialization", &self.specialization)
            .field("license_number", &self.license_number)
            .field("is_authenticated", &self.is_authenticated)
            .finish()
    }
}

/// Whether, and as whom, this dashboard instance is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(UserRecord),
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user(email: &str) -> UserRecord {
    UserRecord {
        id: "1735689600000".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        password: "longenough1".to_string(),
        role: Role::Neurologist,
        specialization: Specialization::GeneralNeurology,
        license_number: "LIC1".to_string(),
        is_authenticated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_layout() {
        let user = sample_user("jane@x.com");
        let value = serde_json::to_value(&user).expect("Should serialize");

        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["lastName"], "Doe");
        assert_eq!(value["role"], "neurologist");
        assert_eq!(value["specialization"], "General Neurology");
        assert_eq!(value["licenseNumber"], "LIC1");
        assert_eq!(value["isAuthenticated"], true);
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn test_parses_record_written_by_older_builds() {
        let raw = r#"{"id":"1700000000000","firstName":"Ana","lastName":"Ruiz",
            "email":"ana@clinic.org","password":"secret123","role":"neurologist",
            "specialization":"Stroke/Neurovascular","licenseNumber":"NY-22",
            "isAuthenticated":true}"#;
        let user: UserRecord = serde_json::from_str(raw).expect("Should parse");
        assert_eq!(user.specialization, Specialization::StrokeNeurovascular);
        assert_eq!(user.display_name(), "Dr. Ruiz");
    }

    #[test]
    fn test_unknown_specialization_is_rejected() {
        let raw = r#"{"id":"1","firstName":"A","lastName":"B","email":"a@b.co",
            "password":"p","role":"neurologist","specialization":"Cardiology",
            "licenseNumber":"X","isAuthenticated":true}"#;
        assert!(serde_json::from_str::<UserRecord>(raw).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = sample_user("jane@x.com");
        let printed = format!("{user:?}");
        assert!(!printed.contains("longenough1"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_credentials_are_case_sensitive() {
        let user = sample_user("jane@x.com");
        assert!(user.matches_credentials("jane@x.com", "longenough1"));
        assert!(!user.matches_credentials("Jane@x.com", "longenough1"));
        assert!(!user.matches_credentials("jane@x.com", "LONGENOUGH1"));
    }

    #[test]
    fn test_specialization_labels_roundtrip() {
        for spec in Specialization::ALL {
            assert_eq!(Specialization::from_label(spec.label()), Some(spec));
        }
        assert_eq!(Specialization::from_label("general neurology"), None);
    }
}
