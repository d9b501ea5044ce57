//! `stall login` / `stall logout`: manage the session kept between commands.

use market_stall_app::screens::{LoginScreen, Notice};
use market_stall_app::state::AppState;
use market_stall_core::LoginForm;

use super::CommandError;
use crate::console::Console;

/// Sign in with `email`, prompting for the password when none is given.
///
/// # Errors
///
/// Returns an error if the form is invalid or the provider rejects it.
pub async fn run(
    state: &AppState,
    console: &mut Console,
    email: String,
    password: Option<String>,
) -> Result<(), CommandError> {
    let password = match password {
        Some(password) => password,
        None => console.prompt("Password").await?.unwrap_or_default(),
    };

    let mut screen = LoginScreen::new(state.clone());
    *screen.form_mut() = LoginForm::new(email, password);

    match screen.submit().await {
        Ok(session) => {
            console.line(Notice::LoginSuccessful)?;
            console.line(format!("Signed in as {}", session.email))?;
            Ok(())
        }
        Err(e) => {
            e.report();
            Err(e.into())
        }
    }
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the session could not be removed.
pub async fn logout(state: &AppState, console: &mut Console) -> Result<(), CommandError> {
    LoginScreen::new(state.clone()).sign_out().await?;
    console.line("Signed out")?;
    Ok(())
}
