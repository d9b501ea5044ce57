//! Firebase Authentication over its REST API.
//!
//! Sign-in uses the Identity Toolkit `accounts:signInWithPassword` endpoint.
//! The resulting tokens are written to a session file so later invocations
//! can pick the session up through [`IdentityProvider::current_user`]; an
//! expired id token is exchanged for a fresh one through the Secure Token
//! API before the session is handed out.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use market_stall_core::{Email, UserId};

use super::{AuthError, IdentityProvider, Session};
use crate::config::FirebaseConfig;
use crate::remote::{api_error_message, http_client};

/// Treat tokens as expired this long before the provider would.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Firebase Authentication client.
pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: SecretString,
    auth_url: String,
    token_url: String,
    sessions: SessionFile,
}

impl FirebaseAuth {
    /// Create a new Firebase Authentication client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, AuthError> {
        Ok(Self {
            client: http_client(config.http_timeout)?,
            api_key: config.api_key.clone(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            sessions: SessionFile::new(config.session_file.clone()),
        })
    }

    fn endpoint(&self, base: &str, path: &str) -> Result<Url, AuthError> {
        let mut url = Url::parse(&format!("{base}/{path}")).map_err(|e| AuthError::Api {
            status: 0,
            message: format!("invalid endpoint URL: {e}"),
        })?;
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        Ok(url)
    }

    /// Exchange a refresh token for a new id token.
    #[instrument(skip_all)]
    async fn refresh(&self, session: &Session) -> Result<Session, AuthError> {
        let refresh_token = session.refresh_token().ok_or(AuthError::SessionExpired)?;
        let url = self.endpoint(&self.token_url, "token")?;

        let response = self
            .client
            .post(url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret()),
            ])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            return Err(AuthError::from_provider_code(status.as_u16(), &message));
        }

        let token: RefreshResponse = response.json().await?;
        let refreshed = Session::new(
            UserId::new(token.user_id),
            session.email.clone(),
            SecretString::from(token.id_token),
        )
        .with_refresh(
            SecretString::from(token.refresh_token),
            expiry_from(&token.expires_in, Utc::now()),
        );

        debug!(user_id = %refreshed.user_id, "Refreshed id token");
        Ok(refreshed)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    fn provider_tag(&self) -> &'static str {
        "firebase"
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let url = self.endpoint(&self.auth_url, "accounts:signInWithPassword")?;
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Sign-in rejected");
            return Err(AuthError::from_provider_code(status.as_u16(), &message));
        }

        let signed_in: SignInResponse = response.json().await?;
        let session = Session::new(
            UserId::new(signed_in.local_id),
            signed_in.email,
            SecretString::from(signed_in.id_token),
        )
        .with_refresh(
            SecretString::from(signed_in.refresh_token),
            expiry_from(&signed_in.expires_in, Utc::now()),
        );

        // A session that cannot be persisted still works for this run.
        if let Err(e) = self.sessions.save(&session).await {
            warn!(error = %e, "Could not persist session");
        }

        info!(user_id = %session.user_id, "Signed in");
        Ok(session)
    }

    async fn current_user(&self) -> Option<Session> {
        let session = match self.sessions.load().await {
            Ok(session) => session?,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                return None;
            }
        };

        match self.ensure_fresh(&session).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Stored session could not be refreshed");
                None
            }
        }
    }

    async fn ensure_fresh(&self, session: &Session) -> Result<Session, AuthError> {
        if !session.is_expired(Utc::now()) {
            return Ok(session.clone());
        }

        let refreshed = self.refresh(session).await?;
        if let Err(e) = self.sessions.save(&refreshed).await {
            warn!(error = %e, "Could not persist refreshed session");
        }
        Ok(refreshed)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sessions.clear().await?;
        info!("Signed out");
        Ok(())
    }
}

/// Identity Toolkit sign-in response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    refresh_token: String,
    /// Lifetime of the id token in seconds, as a string.
    expires_in: String,
}

/// Secure Token refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
    expires_in: String,
}

/// Compute the local expiry instant from an `expiresIn` value.
///
/// Unparsable lifetimes are treated as already expired so the next use
/// forces a refresh.
fn expiry_from(expires_in: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    expires_in.parse::<i64>().map_or(now, |secs| {
        now + Duration::seconds((secs - EXPIRY_LEEWAY_SECS).max(0))
    })
}

// =============================================================================
// Session persistence
// =============================================================================

/// On-disk session representation.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    user_id: String,
    email: String,
    id_token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id.to_string(),
            email: session.email.clone(),
            id_token: session.id_token().expose_secret().to_string(),
            refresh_token: session
                .refresh_token()
                .map(|t| t.expose_secret().to_string()),
            expires_at: session.expires_at(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        let session = Self::new(
            UserId::new(stored.user_id),
            stored.email,
            SecretString::from(stored.id_token),
        );
        match (stored.refresh_token, stored.expires_at) {
            (Some(refresh), Some(at)) => session.with_refresh(SecretString::from(refresh), at),
            _ => session,
        }
    }
}

/// JSON file holding the signed-in session between runs.
struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let content = match tokio::fs::read_to_string(self.path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::SessionStorage(e.to_string())),
        };

        let stored: StoredSession = serde_json::from_str(&content)
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        Ok(Some(stored.into()))
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path().parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&StoredSession::from(session))
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        tokio::fs::write(self.path(), json)
            .await
            .map_err(|e| AuthError::SessionStorage(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(self.path(), std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| AuthError::SessionStorage(e.to_string()))?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::SessionStorage(e.to_string())),
        }
    }
}
