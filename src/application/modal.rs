//! Modal coordinator: The account overlays and their form buffers.
//!
//! Owns the sign-in form, the sign-up form and the sign-up form's
//! "existing account" sub-form. Every successful authentication, and every
//! close, wipes all three forms so no credential survives a reopen.

use crate::domain::forms::{
    validate_credentials, validate_sign_up, FIELD_ATTESTED, FIELD_CONFIRM_PASSWORD, FIELD_EMAIL,
    FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_LICENSE_NUMBER, FIELD_PASSWORD,
    FIELD_SPECIALIZATION,
};
use crate::domain::{
    FormErrors, ModalState, Role, SignUpDraft, Specialization, TextField, UserRecord,
};
use crate::ports::KeyValueStore;

use super::auth_session::AuthSessionManager;

pub const MSG_SIGN_IN_NO_ACCOUNT: &str = "No account found. Please sign up first.";
pub const MSG_EXISTING_NO_ACCOUNT: &str = "No account found. Please create an account first.";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const MSG_DUPLICATE_EMAIL: &str =
    "An account with this email already exists. Please sign in instead.";
pub const MSG_SIGN_IN_FAILED: &str = "An error occurred while signing in. Please try again.";
pub const MSG_EXISTING_FAILED: &str = "An error occurred. Please try again.";
pub const MSG_SIGN_UP_FAILED: &str =
    "An error occurred while creating your account. Please try again.";

/// Email + password form (sign-in modal and the existing-account sub-form).
#[derive(Debug, Clone)]
pub struct CredentialsForm {
    pub email: TextField,
    pub password: TextField,
    pub errors: FormErrors,
    focus: usize,
}

impl Default for CredentialsForm {
    fn default() -> Self {
        Self {
            email: TextField::new(FIELD_EMAIL, "Email", "doctor@hospital.com"),
            password: TextField::masked(FIELD_PASSWORD, "Password", "Your password"),
            errors: FormErrors::default(),
            focus: 0,
        }
    }
}

impl CredentialsForm {
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % 2;
    }

    /// Two fields: either direction toggles.
    pub fn prev_field(&mut self) {
        self.next_field();
    }

    fn focused_mut(&mut self) -> &mut TextField {
        if self.focus == 0 {
            &mut self.email
        } else {
            &mut self.password
        }
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.focused_mut();
        field.push(c);
        let key = field.key;
        self.errors.clear_field(key);
    }

    pub fn delete_char(&mut self) {
        let field = self.focused_mut();
        field.pop();
        let key = field.key;
        self.errors.clear_field(key);
    }

    fn validate(&mut self) -> bool {
        self.errors = validate_credentials(&self.email.value, &self.password.value);
        self.errors.is_empty()
    }

    fn wipe(&mut self) {
        self.email.wipe();
        self.password.wipe();
        self.errors.clear();
        self.focus = 0;
    }
}

/// Sign-up focus slots after the text fields.
pub const SIGN_UP_SPECIALIZATION_SLOT: usize = 6;
pub const SIGN_UP_ATTESTED_SLOT: usize = 7;
const SIGN_UP_SLOTS: usize = 8;

/// Registration form.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub first_name: TextField,
    pub last_name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub confirm_password: TextField,
    pub license_number: TextField,
    pub specialization: Option<Specialization>,
    pub attested: bool,
    pub errors: FormErrors,
    focus: usize,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            first_name: TextField::new(FIELD_FIRST_NAME, "First Name", "Jane"),
            last_name: TextField::new(FIELD_LAST_NAME, "Last Name", "Doe"),
            email: TextField::new(FIELD_EMAIL, "Email", "doctor@hospital.com"),
            password: TextField::masked(FIELD_PASSWORD, "Password", "At least 8 characters"),
            confirm_password: TextField::masked(
                FIELD_CONFIRM_PASSWORD,
                "Confirm Password",
                "Repeat password",
            ),
            license_number: TextField::new(
                FIELD_LICENSE_NUMBER,
                "Medical License Number",
                "License number",
            ),
            specialization: None,
            attested: false,
            errors: FormErrors::default(),
            focus: 0,
        }
    }
}

impl SignUpForm {
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % SIGN_UP_SLOTS;
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + SIGN_UP_SLOTS - 1) % SIGN_UP_SLOTS;
    }

    /// Text fields in display order.
    #[must_use]
    pub fn text_fields(&self) -> [&TextField; 6] {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.license_number,
        ]
    }

    fn text_field_mut(&mut self, slot: usize) -> Option<&mut TextField> {
        match slot {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.email),
            3 => Some(&mut self.password),
            4 => Some(&mut self.confirm_password),
            5 => Some(&mut self.license_number),
            _ => None,
        }
    }

    /// Type into the focused field; on the checkbox, space toggles it.
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            SIGN_UP_ATTESTED_SLOT if c == ' ' => self.toggle_attested(),
            SIGN_UP_SPECIALIZATION_SLOT if c == ' ' => self.cycle_specialization(true),
            slot => {
                if let Some(field) = self.text_field_mut(slot) {
                    field.push(c);
                    let key = field.key;
                    self.errors.clear_field(key);
                }
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.text_field_mut(self.focus) {
            field.pop();
            let key = field.key;
            self.errors.clear_field(key);
        }
    }

    /// Step through the specialization list (wrapping).
    pub fn cycle_specialization(&mut self, forward: bool) {
        let all = Specialization::ALL;
        let next = match self.specialization {
            None if forward => 0,
            None => all.len() - 1,
            Some(current) => {
                let idx = all.iter().position(|s| *s == current).unwrap_or(0);
                if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                }
            }
        };
        self.specialization = Some(all[next]);
        self.errors.clear_field(FIELD_SPECIALIZATION);
    }

    pub fn toggle_attested(&mut self) {
        self.attested = !self.attested;
        self.errors.clear_field(FIELD_ATTESTED);
    }

    fn draft(&self) -> SignUpDraft<'_> {
        SignUpDraft {
            first_name: &self.first_name.value,
            last_name: &self.last_name.value,
            email: &self.email.value,
            password: &self.password.value,
            confirm_password: &self.confirm_password.value,
            specialization: self.specialization,
            license_number: &self.license_number.value,
            attested: self.attested,
        }
    }

    fn wipe(&mut self) {
        self.first_name.wipe();
        self.last_name.wipe();
        self.email.wipe();
        self.password.wipe();
        self.confirm_password.wipe();
        self.license_number.wipe();
        self.specialization = None;
        self.attested = false;
        self.errors.clear();
        self.focus = 0;
    }
}

/// Which overlay is showing, plus the buffers behind each.
#[derive(Debug, Default)]
pub struct ModalCoordinator {
    state: ModalState,
    sign_in: CredentialsForm,
    sign_up: SignUpForm,
    existing: CredentialsForm,
}

impl ModalCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub fn sign_in_form(&self) -> &CredentialsForm {
        &self.sign_in
    }

    pub fn sign_in_form_mut(&mut self) -> &mut CredentialsForm {
        &mut self.sign_in
    }

    #[must_use]
    pub fn sign_up_form(&self) -> &SignUpForm {
        &self.sign_up
    }

    pub fn sign_up_form_mut(&mut self) -> &mut SignUpForm {
        &mut self.sign_up
    }

    #[must_use]
    pub fn existing_form(&self) -> &CredentialsForm {
        &self.existing
    }

    pub fn existing_form_mut(&mut self) -> &mut CredentialsForm {
        &mut self.existing
    }

    pub fn open_sign_in(&mut self) {
        self.transition(ModalState::SignIn);
    }

    pub fn open_sign_up(&mut self) {
        self.transition(ModalState::SignUp);
    }

    /// "Don't have an account?" link on the sign-in form.
    pub fn switch_to_sign_up(&mut self) {
        self.sign_in.errors.clear();
        self.transition(ModalState::SignUp);
    }

    /// "Already registered?" link on the sign-up form.
    pub fn switch_to_sign_in(&mut self) {
        self.sign_up.errors.clear();
        self.transition(ModalState::SignIn);
    }

    /// Flip the sign-up form between "create account" and "existing account".
    pub fn toggle_existing_account(&mut self) {
        match self.state {
            ModalState::SignUp => {
                self.existing.errors.clear();
                self.transition(ModalState::SignUpExistingAccount);
            }
            ModalState::SignUpExistingAccount => {
                self.sign_up.errors.clear();
                self.transition(ModalState::SignUp);
            }
            ModalState::Closed | ModalState::SignIn => {}
        }
    }

    /// Dismiss the overlay and wipe every form.
    pub fn close(&mut self) {
        self.transition(ModalState::Closed);
        self.wipe_all();
    }

    /// Close if the session became authenticated somewhere else.
    pub fn sync_with_session(&mut self, authenticated: bool) {
        if authenticated && self.state.is_open() {
            tracing::debug!("Session authenticated elsewhere; closing {:?}", self.state);
            self.close();
        }
    }

    /// Check the sign-in form against the stored account and sign in.
    ///
    /// # Returns
    /// `true` on success; the overlay is then closed.
    pub fn submit_sign_in<S: KeyValueStore>(&mut self, auth: &mut AuthSessionManager<S>) -> bool {
        if !self.sign_in.validate() {
            return false;
        }

        let Some(stored) = auth.stored_account() else {
            self.sign_in.errors.set_general(MSG_SIGN_IN_NO_ACCOUNT);
            return false;
        };
        if !stored.matches_credentials(&self.sign_in.email.value, &self.sign_in.password.value) {
            tracing::info!("Sign-in rejected: credential mismatch");
            self.sign_in.errors.set_general(MSG_INVALID_CREDENTIALS);
            return false;
        }

        if !auth.sign_in(stored) {
            self.sign_in.errors.set_general(MSG_SIGN_IN_FAILED);
            return false;
        }
        self.close();
        true
    }

    /// Existing-account sub-form: same comparison as sign-in, different wording.
    pub fn submit_existing_account<S: KeyValueStore>(
        &mut self,
        auth: &mut AuthSessionManager<S>,
    ) -> bool {
        if !self.existing.validate() {
            return false;
        }

        let Some(stored) = auth.stored_account() else {
            self.existing.errors.set_general(MSG_EXISTING_NO_ACCOUNT);
            return false;
        };
        if !stored.matches_credentials(&self.existing.email.value, &self.existing.password.value)
        {
            tracing::info!("Existing-account sign-in rejected: credential mismatch");
            self.existing.errors.set_general(MSG_INVALID_CREDENTIALS);
            return false;
        }

        if !auth.sign_in(stored) {
            self.existing.errors.set_general(MSG_EXISTING_FAILED);
            return false;
        }
        self.close();
        true
    }

    /// Register a new account and sign it in.
    ///
    /// Rejected without writing anything if the stored account already uses
    /// the same email (exact, case-sensitive).
    pub fn submit_sign_up<S: KeyValueStore>(&mut self, auth: &mut AuthSessionManager<S>) -> bool {
        let errors = validate_sign_up(&self.sign_up.draft());
        if !errors.is_empty() {
            self.sign_up.errors = errors;
            return false;
        }

        if let Some(existing) = auth.stored_account() {
            if existing.email == self.sign_up.email.value {
                tracing::info!("Sign-up rejected: account already exists");
                self.sign_up.errors = FormErrors::general(MSG_DUPLICATE_EMAIL);
                return false;
            }
        }

        let Some(specialization) = self.sign_up.specialization else {
            return false;
        };
        let record = UserRecord {
            id: UserRecord::new_id(),
            first_name: self.sign_up.first_name.value.clone(),
            last_name: self.sign_up.last_name.value.clone(),
            email: self.sign_up.email.value.clone(),
            password: self.sign_up.password.value.clone(),
            role: Role::Neurologist,
            specialization,
            license_number: self.sign_up.license_number.value.clone(),
            is_authenticated: true,
        };

        if !auth.sign_in(record) {
            self.sign_up.errors = FormErrors::general(MSG_SIGN_UP_FAILED);
            return false;
        }
        tracing::info!("Account created");
        self.close();
        true
    }

    fn transition(&mut self, next: ModalState) {
        if self.state != next {
            tracing::debug!("Modal {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn wipe_all(&mut self) {
        self.sign_in.wipe();
        self.sign_up.wipe();
        self.existing.wipe();
    }
}
