//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while signing in or restoring a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("The email address or password is incorrect.")]
    InvalidCredentials,

    /// The account exists but has been disabled by an administrator.
    #[error("This account has been disabled.")]
    UserDisabled,

    /// The provider is throttling sign-in attempts.
    #[error("Too many failed attempts. Try again later.")]
    TooManyAttempts,

    /// The session can no longer be refreshed; the user must sign in again.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// HTTP request failed.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error we do not map.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    SessionStorage(String),
}

impl AuthError {
    /// Map a Firebase Auth error code (e.g. `INVALID_PASSWORD`) to an error.
    ///
    /// Codes may carry a trailing explanation after `" : "`.
    pub(crate) fn from_provider_code(status: u16, message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL" => Self::InvalidCredentials,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => Self::SessionExpired,
            _ => Self::Api {
                status,
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert!(matches!(
            AuthError::from_provider_code(400, "INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from_provider_code(400, "USER_DISABLED"),
            AuthError::UserDisabled
        ));
        assert!(matches!(
            AuthError::from_provider_code(
                400,
                "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled"
            ),
            AuthError::TooManyAttempts
        ));
    }

    #[test]
    fn test_refresh_codes_mean_expired() {
        for code in ["TOKEN_EXPIRED", "INVALID_REFRESH_TOKEN", "USER_NOT_FOUND"] {
            assert!(matches!(
                AuthError::from_provider_code(400, code),
                AuthError::SessionExpired
            ));
        }
    }

    #[test]
    fn test_unknown_code_keeps_message() {
        let err = AuthError::from_provider_code(400, "OPERATION_NOT_ALLOWED");
        assert_eq!(err.to_string(), "OPERATION_NOT_ALLOWED");
    }
}
