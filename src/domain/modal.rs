//! Overlay state shared by the session prompt and the account forms.

/// The single visible overlay, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    SignIn,
    SignUp,
    /// Sign-up form switched to its "I already have an account" sub-form.
    SignUpExistingAccount,
}

impl ModalState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}
