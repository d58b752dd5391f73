//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "is someone logged in, and who". Read by the
//! route guard and by user-aware helpers; written only through
//! `SessionStore::login` and `SessionStore::logout`.
//!
//! DESIGN
//! ======
//! `Session` holds `Option<User>` and derives `status()` from it, so
//! "authenticated without a user" and "anonymous with a user" cannot be
//! built. The store wraps a `tokio::sync::watch` sender: writers replace the
//! value, any number of subscribers observe each change.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::net::types::User;

/// Snapshot of the client-side session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// `true` iff a user is present.
    #[must_use]
    pub fn status(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user_data(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Shared, observable session cell. Cloning yields another handle to the same
/// cell.
#[derive(Clone, Debug)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Fresh store, logged out.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::anonymous());
        Self { tx: Arc::new(tx) }
    }

    pub fn login(&self, user: User) {
        tracing::info!(user = user.display_name(), "session established");
        self.tx.send_replace(Session::authenticated(user));
    }

    /// Idempotent; subscribers are only woken when the session actually ends.
    pub fn logout(&self) {
        let was_authenticated = self.tx.send_if_modified(|session| {
            if session.user.is_none() {
                return false;
            }
            session.user = None;
            true
        });
        if was_authenticated {
            tracing::info!("session cleared");
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().status()
    }

    /// Receiver that observes every later `login`/`logout`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}
