//! Access gate: Per-view authorization policy.
//!
//! Rules, first match wins:
//! 1. Protected route while anonymous: redirect to sign-in, render nothing.
//! 2. Authenticated on the empty hash with the landing redirect armed:
//!    disarm and redirect to the predictive workspace.
//! 3. Authenticated on the sign-in page: redirect to the empty hash.
//! 4. Otherwise render.
//!
//! The landing redirect is edge-triggered. It is armed on mount and on every
//! anonymous-to-authenticated transition, fires at most once, and stays
//! disarmed until the next transition. Returning to the empty hash by hand
//! while still signed in shows the landing page.

use crate::domain::Route;

/// Default view after authentication.
pub const AUTHENTICATED_LANDING: Route = Route::Predictive;

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    Redirect(Route),
}

/// Redirect policy with the edge-trigger memory for rule 2.
#[derive(Debug, Default)]
pub struct AccessGate {
    last_authenticated: Option<bool>,
    landing_redirect_armed: bool,
}

impl AccessGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what to do with `route` given the current auth flag.
    pub fn evaluate(&mut self, route: Route, authenticated: bool) -> GateDecision {
        if self.last_authenticated != Some(authenticated) {
            self.last_authenticated = Some(authenticated);
            self.landing_redirect_armed = authenticated;
        }

        let decision = if route.is_protected() && !authenticated {
            GateDecision::Redirect(Route::SignIn)
        } else if authenticated && route == Route::Uninitialized && self.landing_redirect_armed {
            self.landing_redirect_armed = false;
            GateDecision::Redirect(AUTHENTICATED_LANDING)
        } else if authenticated && route == Route::SignIn {
            GateDecision::Redirect(Route::Uninitialized)
        } else {
            GateDecision::Render
        };

        if let GateDecision::Redirect(target) = decision {
            tracing::info!("Gate redirect {} -> {}", route, target);
        }
        decision
    }

    #[must_use]
    pub fn landing_redirect_armed(&self) -> bool {
        self.landing_redirect_armed
    }
}
