//! Route controller: Owner of the hash fragment.
//!
//! All navigation goes through [`RouteController::navigate`] or, for hashes
//! arriving from outside (deep links, typed locations),
//! [`RouteController::set_location`]. Subscribers get the parsed [`Route`]
//! after every change; rewriting the current hash sends nothing.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::domain::Route;

/// Current location plus its subscriber list.
#[derive(Debug, Default)]
pub struct RouteController {
    hash: String,
    subscribers: Vec<Sender<Route>>,
}

impl RouteController {
    /// Start at `initial_hash` without notifying anyone.
    #[must_use]
    pub fn new(initial_hash: impl Into<String>) -> Self {
        Self {
            hash: initial_hash.into(),
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_route(&self) -> Route {
        Route::from_hash(&self.hash)
    }

    /// Raw hash fragment, exactly as last written.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Write the canonical hash for `route`.
    ///
    /// # Returns
    /// `false` if the hash already had that value (nothing was sent).
    pub fn navigate(&mut self, route: Route) -> bool {
        self.set_location(route.hash())
    }

    /// Replace the hash with an arbitrary fragment.
    ///
    /// # Returns
    /// `false` if `raw` equals the current hash.
    pub fn set_location(&mut self, raw: &str) -> bool {
        if self.hash == raw {
            return false;
        }

        self.hash.clear();
        self.hash.push_str(raw);
        let route = self.current_route();
        tracing::debug!("Location changed to {:?} ({})", raw, route);

        // A subscriber that went away mid-teardown is dropped, not an error.
        self.subscribers.retain(|tx| tx.send(route).is_ok());
        true
    }

    /// Register for route changes.
    pub fn subscribe(&mut self) -> RouteSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        RouteSubscription { rx }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of a route subscription. Drop it to unsubscribe.
#[derive(Debug)]
pub struct RouteSubscription {
    rx: Receiver<Route>,
}

impl RouteSubscription {
    /// Next pending route change, if any (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<Route> {
        self.rx.try_recv().ok()
    }

    /// Drain all pending changes, oldest first.
    pub fn drain(&self) -> Vec<Route> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
