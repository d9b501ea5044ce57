//! Login screen.

use tracing::{info, instrument};

use market_stall_core::LoginForm;

use crate::error::{AppError, add_breadcrumb, set_sentry_user};
use crate::identity::Session;
use crate::state::AppState;

/// Collects credentials and signs the user in.
pub struct LoginScreen {
    state: AppState,
    form: LoginForm,
}

impl LoginScreen {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            form: LoginForm::default(),
        }
    }

    #[must_use]
    pub const fn form(&self) -> &LoginForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    /// The session left over from an earlier sign-in, if it is still usable.
    ///
    /// When this returns `Some` the front end skips straight to the catalog.
    pub async fn resume(&self) -> Option<Session> {
        let session = self.state.identity().current_user().await?;
        set_sentry_user(&session.user_id, Some(&session.email));
        info!(user_id = %session.user_id, "Resumed existing session");
        Some(session)
    }

    /// Validate the form and sign in.
    ///
    /// The form is left untouched on failure so the user can correct it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Login`] if the form fails local checks (nothing
    /// is sent), or [`AppError::Auth`] if the provider rejects the sign-in.
    #[instrument(skip(self), fields(provider = self.state.identity().provider_tag()))]
    pub async fn submit(&mut self) -> Result<Session, AppError> {
        let credentials = self.form.validate()?;

        add_breadcrumb(
            "auth",
            "Sign-in attempt",
            Some(&[("provider", self.state.identity().provider_tag())]),
        );
        let session = self
            .state
            .identity()
            .sign_in(&credentials.email, &credentials.password)
            .await?;

        set_sentry_user(&session.user_id, Some(&session.email));
        self.form.password.clear();
        Ok(session)
    }

    /// Forget the stored session so the next visit asks for credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] if the session could not be removed.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.state.identity().sign_out().await?;
        sentry::configure_scope(|scope| scope.set_user(None));
        add_breadcrumb("auth", "Signed out", None);
        Ok(())
    }
}
