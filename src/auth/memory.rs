//! In-memory identity provider used by tests and examples
//!
//! Mimics the observable behavior of the hosted service: email/password
//! accounts, a minimum password length, sign-up that signs the new
//! account in, and a session channel driven by every transition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

use crate::auth::IdentityProvider;
use crate::error::AuthError;
use crate::state::data::UserId;
use crate::state::session::Session;

/// Minimum password length the hosted service enforces.
const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    password: String,
    user_id: UserId,
}

/// Process-local `IdentityProvider` implementation.
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    next_uid: Mutex<u64>,
    sessions: watch::Sender<Option<Session>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        MemoryIdentityProvider {
            accounts: Mutex::new(HashMap::new()),
            next_uid: Mutex::new(0),
            sessions: watch::channel(None).0,
        }
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword { min_len: MIN_PASSWORD_LEN });
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AuthError::EmailInUse(email.to_string()));
        }

        let user_id = {
            let mut next = self.next_uid.lock().unwrap();
            *next += 1;
            UserId::new(format!("uid-{:06}", *next))
        };
        accounts.insert(
            email.to_string(),
            Account { password: password.to_string(), user_id: user_id.clone() },
        );

        // Signing up signs the new account in
        let session = Session::new(user_id, email);
        self.sessions.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        let account = accounts.get(email).ok_or(AuthError::InvalidCredentials)?;
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(account.user_id.clone(), email);
        self.sessions.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sessions.send_replace(None);
        Ok(())
    }

    fn sessions(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}
