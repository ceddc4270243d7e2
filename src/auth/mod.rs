//! Identity provider collaborator
//!
//! Authentication is delegated to an external hosted service, consumed
//! through the `IdentityProvider` trait. Session state is observed
//! through a single watch subscription that fires once on subscribe and
//! again on every login/logout.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::AuthError;
use crate::state::session::Session;

pub mod memory;

pub use memory::MemoryIdentityProvider;

/// Credential and session surface of the hosted identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign in with existing credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// End the current session, if any.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to session changes. The channel always holds the
    /// current state, so subscribers see the initial state immediately.
    fn sessions(&self) -> watch::Receiver<Option<Session>>;
}
