//! Process-local identity provider.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;

use market_stall_core::{Email, UserId};

use super::{AuthError, IdentityProvider, Session};

struct Account {
    user_id: UserId,
    password: SecretString,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    /// Outstanding refresh tokens and the session each was first issued with.
    refresh_tokens: HashMap<String, Session>,
    current: Option<Session>,
}

impl Inner {
    fn issue(&mut self, user_id: UserId, email: String, lifetime: Option<Duration>) -> Session {
        let session = Session::new(user_id, email, SecretString::from(token("memory")));
        let Some(lifetime) = lifetime else {
            return session;
        };

        let refresh = token("memory-refresh");
        let session =
            session.with_refresh(SecretString::from(refresh.clone()), Utc::now() + lifetime);
        self.refresh_tokens.insert(refresh, session.clone());
        session
    }

    /// Issue a new id token for an expired session. Refresh tokens stay
    /// valid until sign-out, as Firebase's do.
    fn reissue(
        &mut self,
        session: &Session,
        lifetime: Option<Duration>,
    ) -> Result<Session, AuthError> {
        let refresh = session.refresh_token().ok_or(AuthError::SessionExpired)?;
        let issued = self
            .refresh_tokens
            .get(refresh.expose_secret())
            .ok_or(AuthError::SessionExpired)?;

        let mut fresh = Session::new(
            issued.user_id.clone(),
            issued.email.clone(),
            SecretString::from(token("memory")),
        );
        if let Some(lifetime) = lifetime {
            fresh = fresh.with_refresh(refresh.clone(), Utc::now() + lifetime);
        }

        if self.current.as_ref().is_some_and(|c| c.user_id == fresh.user_id) {
            self.current = Some(fresh.clone());
        }
        Ok(fresh)
    }
}

/// Identity provider backed by an in-process account table.
///
/// Used by the `memory` backend and by tests. Sessions issued here carry
/// opaque random tokens and never expire unless a token lifetime is set.
#[derive(Default)]
pub struct InMemoryIdentity {
    inner: Mutex<Inner>,
    token_lifetime: Option<Duration>,
}

impl InMemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`add_account`](Self::add_account).
    #[must_use]
    pub fn with_account(mut self, email: &Email, password: &str) -> Self {
        self.inner.get_mut().accounts.insert(
            email.as_str().to_lowercase(),
            Account {
                user_id: new_user_id(),
                password: SecretString::from(password.to_string()),
            },
        );
        self
    }

    /// Issue id tokens that expire after `lifetime`, with refresh tokens.
    #[must_use]
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = Some(lifetime);
        self
    }

    /// Register an account and return its generated user id.
    pub async fn add_account(&self, email: &Email, password: &str) -> UserId {
        let user_id = new_user_id();
        self.inner.lock().await.accounts.insert(
            email.as_str().to_lowercase(),
            Account {
                user_id: user_id.clone(),
                password: SecretString::from(password.to_string()),
            },
        );
        user_id
    }
}

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().simple().to_string())
}

fn token(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn provider_tag(&self) -> &'static str {
        "memory"
    }

    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let mut inner = self.inner.lock().await;

        let user_id = inner
            .accounts
            .get(&email.as_str().to_lowercase())
            .filter(|a| a.password.expose_secret() == password.expose_secret())
            .map(|a| a.user_id.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        let session = inner.issue(user_id, email.as_str().to_string(), self.token_lifetime);
        debug!(user_id = %session.user_id, "Signed in");
        inner.current = Some(session.clone());
        Ok(session)
    }

    async fn current_user(&self) -> Option<Session> {
        let mut inner = self.inner.lock().await;
        let current = inner.current.clone()?;
        if !current.is_expired(Utc::now()) {
            return Some(current);
        }
        inner.reissue(&current, self.token_lifetime).ok()
    }

    async fn ensure_fresh(&self, session: &Session) -> Result<Session, AuthError> {
        if !session.is_expired(Utc::now()) {
            return Ok(session.clone());
        }
        let fresh = self.inner.lock().await.reissue(session, self.token_lifetime)?;
        debug!(user_id = %fresh.user_id, "Refreshed id token");
        Ok(fresh)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut inner = self.inner.lock().await;
        inner.current = None;
        inner.refresh_tokens.clear();
        Ok(())
    }
}
