//! Auth session manager: The authoritative "who is signed in" state.
//!
//! One instance is built at the composition root and handed to everything
//! that needs it. State changes are pushed to subscribers before the call
//! that caused them returns.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::domain::{ModalState, SessionState, UserRecord};
use crate::ports::KeyValueStore;

use super::session_store::SessionStore;

/// Notification sent to session subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup restore finished.
    Restored { authenticated: bool },
    SignedIn,
    SignedOut,
}

/// Owner of the current [`SessionState`].
pub struct AuthSessionManager<S: KeyValueStore> {
    store: SessionStore<S>,
    state: SessionState,
    /// Top-level "sign in required" prompt. The account forms live in
    /// `ModalCoordinator`.
    prompt: ModalState,
    restored: bool,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl<S: KeyValueStore> AuthSessionManager<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
            prompt: ModalState::Closed,
            restored: false,
            subscribers: Vec::new(),
        }
    }

    /// Adopt the persisted record, if any. Only the first call has an effect.
    ///
    /// A stored record must carry `isAuthenticated: true` to become the
    /// current user; anything else leaves the session anonymous.
    pub fn restore_on_init(&mut self) {
        if self.restored {
            tracing::debug!("Session already restored; ignoring repeat restore");
            return;
        }
        self.restored = true;

        self.store.migrate_legacy();
        self.state = match self.store.load() {
            Some(record) if record.is_authenticated => {
                tracing::info!("Restored session for record {}", record.id);
                SessionState::Authenticated(record)
            }
            Some(_) => {
                tracing::info!("Stored record is not signed in; starting anonymous");
                SessionState::Anonymous
            }
            None => {
                tracing::info!("No stored session; starting anonymous");
                SessionState::Anonymous
            }
        };

        let authenticated = self.is_authenticated();
        self.notify(SessionEvent::Restored { authenticated });
    }

    /// Make `record` the signed-in user, replacing any current one.
    ///
    /// The record is persisted before the state flips. If persistence fails
    /// the session ends anonymous and the stored record is revoked, so neither
    /// the in-memory state nor a reload claims a session.
    ///
    /// # Returns
    /// `true` if the session is now authenticated.
    pub fn sign_in(&mut self, record: UserRecord) -> bool {
        let record = record.authenticated();

        if !self.store.save(&record) {
            tracing::warn!("Sign-in for record {} could not be persisted", record.id);
            let was_authenticated = self.is_authenticated();
            self.state = SessionState::Anonymous;
            self.store.revoke();
            if was_authenticated {
                self.notify(SessionEvent::SignedOut);
            }
            return false;
        }

        tracing::info!("Signed in record {}", record.id);
        self.state = SessionState::Authenticated(record);
        self.prompt = ModalState::Closed;
        self.notify(SessionEvent::SignedIn);
        true
    }

    /// End the session and remove the stored record. Does not navigate.
    ///
    /// A record that cannot be removed is left flagged as signed out, which
    /// `restore_on_init` treats as no session.
    pub fn sign_out(&mut self) {
        self.state = SessionState::Anonymous;
        self.store.revoke();
        tracing::info!("Signed out");
        self.notify(SessionEvent::SignedOut);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserRecord> {
        self.state.user()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The persisted record, whether or not it is signed in.
    #[must_use]
    pub fn stored_account(&self) -> Option<UserRecord> {
        self.store.load()
    }

    #[must_use]
    pub fn prompt(&self) -> ModalState {
        self.prompt
    }

    pub fn open_prompt(&mut self) {
        if self.prompt != ModalState::SignIn {
            tracing::debug!("Opening sign-in prompt");
        }
        self.prompt = ModalState::SignIn;
    }

    pub fn close_prompt(&mut self) {
        self.prompt = ModalState::Closed;
    }

    /// Register for session change notifications.
    ///
    /// Dropping the receiver unsubscribes; later notifications skip it.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
