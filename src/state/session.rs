//! Session context for the signed-in user
//!
//! The identity provider owns the session; this crate holds a read-only
//! view refreshed by a single watch subscription. Call sites receive the
//! context explicitly rather than reading ambient global state.

use tokio::sync::watch;

use super::data::UserId;

/// The authenticated identity context for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque id owned by the identity provider
    pub user_id: UserId,
    /// Email label for display ("Logged in as: ...")
    pub email: String,
}

impl Session {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Session { user_id, email: email.into() }
    }
}

/// Read-only view over the provider's session channel.
///
/// The channel always holds the current state, so `current()` reflects
/// the initial state immediately after subscribing and every subsequent
/// login/logout after an awaited `changed()`.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionTracker {
    pub fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        SessionTracker { rx }
    }

    /// The session active right now, or None when signed out.
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Wait for the next login/logout transition.
    ///
    /// Returns false once the provider is gone and no further
    /// transitions can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
