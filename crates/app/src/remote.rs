//! Helpers shared by the Google REST clients.

use std::time::Duration;

use serde::Deserialize;

/// Google APIs wrap failures as `{"error": {"code": .., "message": .., "status": ..}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract the human-readable message from an error response body.
///
/// Falls back to the raw body (or the status line) when the body is not the
/// usual envelope.
pub(crate) fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
        if let Some(status) = envelope.error.status {
            return status;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the HTTP client used for every remote call.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("market-stall/", env!("CARGO_PKG_VERSION")))
        .build()
}
