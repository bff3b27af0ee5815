//! Form input buffers and validation rules for the account flows.
//!
//! Validation errors are field-scoped and never leave the form that produced
//! them. Authentication failures use the separate `general` slot.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroize;

use super::user::Specialization;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";
pub const FIELD_SPECIALIZATION: &str = "specialization";
pub const FIELD_LICENSE_NUMBER: &str = "licenseNumber";
pub const FIELD_ATTESTED: &str = "attested";

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Loose email check: something, `@`, something, `.`, something.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("Valid regex"))
        .is_match(email)
}

/// A single editable text input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub key: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    /// Rendered as bullets (passwords).
    pub masked: bool,
}

impl TextField {
    #[must_use]
    pub fn new(key: &'static str, label: &'static str, hint: &'static str) -> Self {
        Self {
            key,
            label,
            hint,
            value: String::new(),
            masked: false,
        }
    }

    #[must_use]
    pub fn masked(key: &'static str, label: &'static str, hint: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(key, label, hint)
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    /// Overwrite the buffer in place, then empty it.
    pub fn wipe(&mut self) {
        self.value.zeroize();
    }

    /// Text to show on screen.
    #[must_use]
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Field-scoped validation messages plus one general (authentication) message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
    general: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn set_general(&mut self, message: impl Into<String>) {
        self.general = Some(message.into());
    }

    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn general_message(&self) -> Option<&str> {
        self.general.as_deref()
    }

    /// Editing a field dismisses its error.
    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Validate an email + password pair before a credential lookup.
#[must_use]
pub fn validate_credentials(email: &str, password: &str) -> FormErrors {
    let mut errors = FormErrors::default();
    check_email(email, &mut errors);
    if password.is_empty() {
        errors.insert(FIELD_PASSWORD, "Password is required");
    }
    errors
}

/// Registration form contents, borrowed from the input buffers.
#[derive(Debug, Clone, Copy)]
pub struct SignUpDraft<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub specialization: Option<Specialization>,
    pub license_number: &'a str,
    pub attested: bool,
}

/// Validate every registration field; an empty result means the draft is acceptable.
#[must_use]
pub fn validate_sign_up(draft: &SignUpDraft<'_>) -> FormErrors {
    let mut errors = FormErrors::default();

    if draft.first_name.trim().is_empty() {
        errors.insert(FIELD_FIRST_NAME, "First name is required");
    }
    if draft.last_name.trim().is_empty() {
        errors.insert(FIELD_LAST_NAME, "Last name is required");
    }
    check_email(draft.email, &mut errors);

    if draft.password.is_empty() {
        errors.insert(FIELD_PASSWORD, "Password is required");
    } else if draft.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            FIELD_PASSWORD,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
    }

    if draft.confirm_password.is_empty() {
        errors.insert(FIELD_CONFIRM_PASSWORD, "Please confirm your password");
    } else if draft.password != draft.confirm_password {
        errors.insert(FIELD_CONFIRM_PASSWORD, "Passwords do not match");
    }

    if draft.specialization.is_none() {
        errors.insert(FIELD_SPECIALIZATION, "Specialization is required");
    }
    if draft.license_number.trim().is_empty() {
        errors.insert(FIELD_LICENSE_NUMBER, "License number is required");
    }
    if !draft.attested {
        errors.insert(
            FIELD_ATTESTED,
            "You must confirm you are a licensed neurologist",
        );
    }

    errors
}

fn check_email(email: &str, errors: &mut FormErrors) {
    if email.trim().is_empty() {
        errors.insert(FIELD_EMAIL, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(FIELD_EMAIL, "Please enter a valid email address");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> SignUpDraft<'static> {
        SignUpDraft {
            first_name: "Jane",
            last_name: "Doe",
            email: "jane@x.com",
            password: "longenough1",
            confirm_password: "longenough1",
            specialization: Some(Specialization::GeneralNeurology),
            license_number: "LIC1",
            attested: true,
        }
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("a.b+c@clinic.example.org"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("jane.x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_credentials_required() {
        let errors = validate_credentials("", "");
        assert_eq!(errors.field(FIELD_EMAIL), Some("Email is required"));
        assert_eq!(errors.field(FIELD_PASSWORD), Some("Password is required"));

        let errors = validate_credentials("not-an-email", "pw");
        assert_eq!(
            errors.field(FIELD_EMAIL),
            Some("Please enter a valid email address")
        );
        assert!(errors.field(FIELD_PASSWORD).is_none());
    }

    #[test]
    fn test_complete_sign_up_is_valid() {
        assert!(validate_sign_up(&complete_draft()).is_empty());
    }

    #[test]
    fn test_short_password_and_mismatch() {
        let draft = SignUpDraft {
            password: "short",
            confirm_password: "different",
            ..complete_draft()
        };
        let errors = validate_sign_up(&draft);
        assert_eq!(
            errors.field(FIELD_PASSWORD),
            Some("Password must be at least 8 characters long")
        );
        assert_eq!(
            errors.field(FIELD_CONFIRM_PASSWORD),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_missing_attestation_and_specialization() {
        let draft = SignUpDraft {
            specialization: None,
            attested: false,
            license_number: "  ",
            ..complete_draft()
        };
        let errors = validate_sign_up(&draft);
        assert!(errors.field(FIELD_SPECIALIZATION).is_some());
        assert!(errors.field(FIELD_ATTESTED).is_some());
        assert!(errors.field(FIELD_LICENSE_NUMBER).is_some());
        assert!(errors.general_message().is_none());
    }

    #[test]
    fn test_masked_field_display_and_wipe() {
        let mut field = TextField::masked(FIELD_PASSWORD, "Password", "");
        for c in "secret".chars() {
            field.push(c);
        }
        assert_eq!(field.display(), "••••••");
        field.wipe();
        assert!(field.value.is_empty());
    }
}
