//! Identity provider abstraction.
//!
//! The app never stores passwords or issues tokens itself; it asks an
//! [`IdentityProvider`] to sign users in and to report whether a session is
//! already active. The resulting [`Session`] is then passed explicitly to
//! every operation that needs to act as the user.
//!
//! # Backends
//!
//! - [`FirebaseAuth`] - Firebase Authentication REST API, session kept in a
//!   local JSON file and refreshed through the Secure Token API
//! - [`InMemoryIdentity`] - process-local accounts for tests and demos

mod error;
mod firebase;
mod memory;

pub use error::AuthError;
pub use firebase::FirebaseAuth;
pub use memory::InMemoryIdentity;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

use market_stall_core::{Email, UserId};

/// A signed-in user.
///
/// Implements `Debug` manually so tokens never reach logs.
#[derive(Clone)]
pub struct Session {
    /// Provider-assigned user identifier
    pub user_id: UserId,
    /// Address the user signed in with
    pub email: String,
    id_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with a bearer token that never expires locally.
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>, id_token: SecretString) -> Self {
        Self {
            user_id,
            email: email.into(),
            id_token,
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token and the instant the id token stops being valid.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: SecretString, expires_at: DateTime<Utc>) -> Self {
        self.refresh_token = Some(refresh_token);
        self.expires_at = Some(expires_at);
        self
    }

    /// Bearer token for authenticated store requests.
    #[must_use]
    pub const fn id_token(&self) -> &SecretString {
        &self.id_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the id token has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Authenticates users and remembers who is signed in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short backend name for logs.
    fn provider_tag(&self) -> &'static str;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError>;

    /// The already-active session, if any.
    async fn current_user(&self) -> Option<Session>;

    /// A session whose id token is usable now.
    ///
    /// Returns a clone of `session` while it is still valid, otherwise
    /// exchanges its refresh token for a new one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionExpired`] if the session cannot be
    /// refreshed.
    async fn ensure_fresh(&self, session: &Session) -> Result<Session, AuthError>;

    /// Forget the active session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
