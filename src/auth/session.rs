//! Session holder
//!
//! Owns the current identity and the `Uninitialized → Authenticated |
//! Anonymous` state machine. Shared explicitly as `Arc<Session>`.

use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::guard::{self, Area, GuardOutcome};
use super::store::TokenStore;
use super::token::decode_identity;
use super::Identity;
use crate::api::Backend;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Anonymous,
    Authenticated(Identity),
}

/// Username and password sent to the login endpoint
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct Session {
    state: RwLock<SessionState>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            state: RwLock::new(SessionState::Uninitialized),
            store,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        match &*self.state.read() {
            SessionState::Authenticated(identity) => Some(identity.clone()),
            _ => None,
        }
    }

    pub fn guard(&self, requested: Area) -> GuardOutcome {
        guard::guard(&self.state.read(), requested)
    }

    /// Restore the session from the persisted access token.
    ///
    /// Never fails: a missing, unreadable or undecodable token ends in
    /// `Anonymous`. An unreadable or undecodable one is cleared from the
    /// store.
    /// Calling it again after the first time returns the current state.
    pub fn restore(&self) -> SessionState {
        if !matches!(*self.state.read(), SessionState::Uninitialized) {
            debug!("Session already restored");
            return self.state();
        }

        let next = match self.store.access_token() {
            Ok(None) => SessionState::Anonymous,
            Ok(Some(token)) => match decode_identity(&token) {
                Ok(identity) => {
                    info!(user_id = identity.user_id, "Session restored");
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    debug!(error = %e, "Stored token could not be decoded, clearing it");
                    self.clear_tokens();
                    SessionState::Anonymous
                }
            },
            Err(e) => {
                warn!(error = ?e, "Token store unreadable, clearing it");
                self.clear_tokens();
                SessionState::Anonymous
            }
        };

        *self.state.write() = next.clone();
        next
    }

    /// Exchange credentials for tokens and sign in.
    ///
    /// Any failure is reported as a generic `Auth` error. An authenticated
    /// session stays as it was; otherwise the session ends up `Anonymous`.
    #[instrument(skip(self, backend, credentials), fields(username = %credentials.username))]
    pub async fn login<B: Backend>(
        &self,
        backend: &B,
        credentials: &Credentials,
    ) -> ClientResult<Identity> {
        let result = self.sign_in(backend, credentials).await;
        if result.is_err() {
            let mut state = self.state.write();
            if matches!(*state, SessionState::Uninitialized) {
                *state = SessionState::Anonymous;
            }
        }
        result
    }

    async fn sign_in<B: Backend>(
        &self,
        backend: &B,
        credentials: &Credentials,
    ) -> ClientResult<Identity> {
        let tokens = backend.obtain_tokens(credentials).await.map_err(|e| {
            warn!(error = %e, "Login request failed");
            ClientError::Auth(e.to_string())
        })?;

        let identity = decode_identity(&tokens.access).map_err(|e| {
            warn!(error = %e, "Backend issued an undecodable access token");
            ClientError::Auth(e.to_string())
        })?;

        self.store.save(&tokens).map_err(|e| {
            warn!(error = ?e, "Failed to persist tokens");
            ClientError::Auth("tokens could not be persisted".to_string())
        })?;

        info!(
            user_id = identity.user_id,
            privileged = identity.is_privileged,
            "Signed in"
        );
        *self.state.write() = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// Forget the tokens and drop to `Anonymous`. No network call.
    pub fn logout(&self) {
        self.clear_tokens();
        *self.state.write() = SessionState::Anonymous;
        info!("Signed out");
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = ?e, "Failed to clear persisted tokens");
        }
    }
}
