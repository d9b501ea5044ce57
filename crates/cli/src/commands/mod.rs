//! `stall` subcommands.

pub mod browse;
pub mod catalog;
pub mod login;

use thiserror::Error;

use market_stall_app::config::BackendConfig;
use market_stall_app::error::AppError;
use market_stall_app::identity::Session;
use market_stall_app::state::AppState;
use market_stall_core::Email;
use secrecy::SecretString;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An application operation failed.
    #[error("{}", .0.notice())]
    App(#[from] AppError),

    /// Terminal I/O failed.
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// A command that needs a session ran without one.
    #[error("Not signed in. Run `stall login` first.")]
    NotSignedIn,
}

/// The active session, signing in as the demo account on the `memory`
/// backend.
///
/// The `memory` backend forgets sessions when the process exits, so one-shot
/// commands against it use the configured demo account instead.
///
/// # Errors
///
/// Returns [`CommandError::NotSignedIn`] when no session exists.
pub async fn require_session(state: &AppState) -> Result<Session, CommandError> {
    if let Some(session) = state.identity().current_user().await {
        return Ok(session);
    }

    let BackendConfig::Memory(demo) = &state.config().backend else {
        return Err(CommandError::NotSignedIn);
    };

    let email = Email::parse(&demo.email).map_err(|_| CommandError::NotSignedIn)?;
    let session = state
        .identity()
        .sign_in(&email, &SecretString::from(demo.password().to_owned()))
        .await
        .map_err(AppError::from)?;
    tracing::debug!(user_id = %session.user_id, "Signed in as demo account");
    Ok(session)
}
