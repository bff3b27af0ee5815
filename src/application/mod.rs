//! Application layer: Session, routing and overlay use cases.
//!
//! This module orchestrates domain logic with the storage port. `Shell` is
//! the entry point; the other types are exposed for front ends that need
//! finer control and for testing.

mod access_gate;
mod auth_session;
mod modal;
mod router;
mod session_store;
mod shell;

#[cfg(test)]
pub(crate) mod testing;

pub use access_gate::{AccessGate, GateDecision, AUTHENTICATED_LANDING};
pub use auth_session::{AuthSessionManager, SessionEvent};
pub use modal::{
    CredentialsForm, ModalCoordinator, SignUpForm, SIGN_UP_ATTESTED_SLOT,
    SIGN_UP_SPECIALIZATION_SLOT,
};
pub use router::{RouteController, RouteSubscription};
pub use session_store::{SessionStore, LEGACY_KEY, PRIMARY_KEY};
pub use shell::Shell;
