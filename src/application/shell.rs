//! Dashboard shell: Wires session, router, gate and overlays together.
//!
//! Every operation that can change the session or the location ends with
//! [`Shell::settle`], which drains pending notifications and re-runs the
//! gate until a route renders. Front ends only ever talk to this type.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::domain::{ModalState, Route, UserRecord};
use crate::ports::KeyValueStore;

use super::access_gate::{AccessGate, GateDecision};
use super::auth_session::{AuthSessionManager, SessionEvent};
use super::modal::ModalCoordinator;
use super::router::{RouteController, RouteSubscription};
use super::session_store::SessionStore;

/// Upper bound on gate passes per settle; any real redirect chain is shorter.
const MAX_SETTLE_PASSES: usize = 8;

/// One dashboard instance.
pub struct Shell<S: KeyValueStore> {
    session: AuthSessionManager<S>,
    router: RouteController,
    gate: AccessGate,
    modals: ModalCoordinator,
    routes: RouteSubscription,
    session_events: Receiver<SessionEvent>,
    /// View currently on screen; `None` while a redirect is in flight.
    rendered: Option<Route>,
    dirty: bool,
}

impl<S: KeyValueStore> Shell<S> {
    /// Build a shell over `storage`, starting at `initial_hash`. Call
    /// [`Shell::mount`] before use.
    pub fn new(storage: Arc<S>, initial_hash: &str) -> Self {
        let mut session = AuthSessionManager::new(SessionStore::new(storage));
        let mut router = RouteController::new(initial_hash);
        let session_events = session.subscribe();
        let routes = router.subscribe();

        Self {
            session,
            router,
            gate: AccessGate::new(),
            modals: ModalCoordinator::new(),
            routes,
            session_events,
            rendered: None,
            dirty: true,
        }
    }

    /// Restore the persisted session and render the initial route.
    pub fn mount(&mut self) {
        tracing::info!("Mounting dashboard at {:?}", self.router.hash());
        self.session.restore_on_init();
        self.settle();
    }

    /// Drain notifications and apply gate decisions until a route renders.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_PASSES {
            let mut session_changed = false;
            while self.session_events.try_recv().is_ok() {
                session_changed = true;
            }
            if session_changed {
                self.modals.sync_with_session(self.session.is_authenticated());
            }
            let route_changed = !self.routes.drain().is_empty();

            if !(self.dirty || session_changed || route_changed) {
                return;
            }
            self.dirty = false;

            let route = self.router.current_route();
            let authenticated = self.session.is_authenticated();
            match self.gate.evaluate(route, authenticated) {
                GateDecision::Render => {
                    self.show(route);
                    return;
                }
                GateDecision::Redirect(target) => {
                    self.leave();
                    if route.is_protected() && !authenticated {
                        self.session.open_prompt();
                    }
                    if !self.router.navigate(target) {
                        return;
                    }
                }
            }
        }
        tracing::warn!(
            "Routing did not settle after {} passes at {:?}",
            MAX_SETTLE_PASSES,
            self.router.hash()
        );
    }

    fn show(&mut self, route: Route) {
        if self.rendered == Some(route) {
            return;
        }
        self.leave();
        tracing::debug!("Rendering {}", route);

        // The sign-in page hosts the registration form.
        if route == Route::SignIn && !self.modals.state().is_open() {
            self.modals.open_sign_up();
        }
        self.rendered = Some(route);
    }

    fn leave(&mut self) {
        if self.rendered == Some(Route::SignIn) {
            self.session.close_prompt();
            if self.modals.state().is_open() {
                self.modals.close();
            }
        }
        self.rendered = None;
    }

    pub fn navigate(&mut self, route: Route) {
        self.router.navigate(route);
        self.settle();
    }

    /// Apply a hash typed or linked from outside.
    pub fn set_location(&mut self, raw: &str) {
        self.router.set_location(raw);
        self.settle();
    }

    /// Sign out, then show the sign-in page.
    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.router.navigate(Route::SignIn);
        self.settle();
    }

    pub fn submit_sign_in(&mut self) -> bool {
        let ok = self.modals.submit_sign_in(&mut self.session);
        self.settle();
        ok
    }

    pub fn submit_sign_up(&mut self) -> bool {
        let ok = self.modals.submit_sign_up(&mut self.session);
        self.settle();
        ok
    }

    pub fn submit_existing_account(&mut self) -> bool {
        let ok = self.modals.submit_existing_account(&mut self.session);
        self.settle();
        ok
    }

    /// Dismiss the active overlay. On the sign-in page this leaves the page.
    pub fn close_modal(&mut self) {
        if self.rendered == Some(Route::SignIn) {
            self.modals.close();
            self.navigate(Route::Uninitialized);
        } else {
            self.modals.close();
        }
    }

    pub fn open_sign_in(&mut self) {
        if !self.session.is_authenticated() {
            self.modals.open_sign_in();
        }
    }

    pub fn dismiss_prompt(&mut self) {
        self.session.close_prompt();
    }

    #[must_use]
    pub fn current_route(&self) -> Route {
        self.router.current_route()
    }

    #[must_use]
    pub fn hash(&self) -> &str {
        self.router.hash()
    }

    /// View on screen, or `None` if nothing renders.
    #[must_use]
    pub fn rendered(&self) -> Option<Route> {
        self.rendered
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserRecord> {
        self.session.current_user()
    }

    /// "Sign in required" notice state.
    #[must_use]
    pub fn prompt(&self) -> ModalState {
        self.session.prompt()
    }

    #[must_use]
    pub fn modal_state(&self) -> ModalState {
        self.modals.state()
    }

    #[must_use]
    pub fn modals(&self) -> &ModalCoordinator {
        &self.modals
    }

    pub fn modals_mut(&mut self) -> &mut ModalCoordinator {
        &mut self.modals
    }

    /// Extra route subscription (diagnostics and tests).
    pub fn subscribe_routes(&mut self) -> RouteSubscription {
        self.router.subscribe()
    }
}
