//! Unified error handling with Sentry integration.
//!
//! Every screen operation returns `Result<T, AppError>`. The error's
//! `Display` text is the notice shown to the user; [`AppError::report`]
//! additionally logs remote failures and captures them to Sentry.

use thiserror::Error;

use market_stall_core::{LoginError, ValidationErrors};

use crate::config::ConfigError;
use crate::identity::AuthError;
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Add-item form failed local validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Login form failed local validation.
    #[error("{0}")]
    Login(#[from] LoginError),

    /// The identity provider rejected the sign-in.
    #[error("Login Failed: {0}")]
    Auth(#[from] AuthError),

    /// The catalog could not be read.
    #[error("Failed to load products: {0}")]
    LoadProducts(#[source] StoreError),

    /// A new listing could not be written.
    #[error("Error adding product: {0}")]
    AddProduct(#[source] StoreError),

    /// An action that needs a session was attempted without one.
    #[error("Please log in to add products")]
    NotSignedIn,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The text shown to the user.
    #[must_use]
    pub fn notice(&self) -> String {
        self.to_string()
    }

    /// Whether the failure came from a remote service rather than user input.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        match self {
            Self::Auth(err) => !matches!(
                err,
                AuthError::InvalidCredentials | AuthError::SessionExpired
            ),
            Self::LoadProducts(_) | Self::AddProduct(_) | Self::Internal(_) => true,
            Self::Validation(_) | Self::Login(_) | Self::NotSignedIn | Self::Config(_) => false,
        }
    }

    /// Log the error, capturing remote failures to Sentry.
    pub fn report(&self) {
        if self.is_remote() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Remote operation failed"
            );
        } else {
            tracing::debug!(error = %self, "Rejected user input");
        }
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user
/// actions leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
