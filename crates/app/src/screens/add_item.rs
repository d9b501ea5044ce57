//! Add-item screen.

use chrono::Utc;
use tracing::{info, instrument};

use market_stall_core::{ProductForm, ProductId};

use crate::error::AppError;
use crate::identity::Session;
use crate::state::AppState;

/// Form for appending a new listing to the catalog.
pub struct AddItemScreen {
    state: AppState,
    session: Session,
    form: ProductForm,
}

impl AddItemScreen {
    #[must_use]
    pub fn new(state: AppState, session: Session) -> Self {
        Self {
            state,
            session,
            form: ProductForm::default(),
        }
    }

    /// Open the screen for whoever is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotSignedIn`] without a session.
    pub fn open(state: AppState, session: Option<Session>) -> Result<Self, AppError> {
        session
            .map(|session| Self::new(state, session))
            .ok_or(AppError::NotSignedIn)
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Validate the form and append the listing.
    ///
    /// The form is cleared on success and left as entered on any failure.
    /// An expired session is refreshed before writing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with every invalid field (nothing is
    /// written), [`AppError::Auth`] if the session cannot be refreshed, or
    /// [`AppError::AddProduct`] if the store rejects the write.
    #[instrument(skip(self), fields(user_id = %self.session.user_id))]
    pub async fn submit(&mut self) -> Result<ProductId, AppError> {
        let product = self
            .form
            .to_new_product(&self.session.user_id, Utc::now())?;
        self.session = self.state.identity().ensure_fresh(&self.session).await?;

        let id = self
            .state
            .products()
            .create(&self.session, &product)
            .await
            .map_err(AppError::AddProduct)?;

        info!(%id, category = %product.category, "Product added");
        self.form.clear();
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use market_stall_core::{Email, FieldError, FormField, UserId};
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::config::AppConfig;
    use crate::identity::{IdentityProvider, InMemoryIdentity};
    use crate::store::InMemoryStore;

    fn setup() -> (Arc<InMemoryStore>, AppState, Session) {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            AppConfig::in_memory(),
            Arc::new(InMemoryIdentity::new()),
            store.clone(),
        );
        let session = Session::new(UserId::new("seller-7"), "s@b.co", SecretString::from("t"));
        (store, state, session)
    }

    fn fill(form: &mut ProductForm) {
        form.name = "Trail Shoes".into();
        form.store_name = "Peak Outfitters".into();
        form.description = "Lightweight, grippy".into();
        form.quantity = "4".into();
        form.price = "64.00".into();
        form.tags = "Sport, Running".into();
    }

    #[test]
    fn test_open_requires_session() {
        let (_, state, _) = setup();
        let err = AddItemScreen::open(state, None).err().unwrap();
        assert_eq!(err.notice(), "Please log in to add products");
    }

    #[tokio::test]
    async fn test_submit_appends_and_clears() {
        let (store, state, session) = setup();
        let mut screen = AddItemScreen::new(state.clone(), session.clone());
        fill(screen.form_mut());

        screen.submit().await.unwrap();
        assert_eq!(screen.form(), &ProductForm::default());
        assert_eq!(store.count("products").await, 1);

        let products = state.products().list_all(&session).await.unwrap();
        let shoes = &products[0];
        assert_eq!(shoes.category.as_deref(), Some("Sports"));
        assert_eq!(shoes.tags.as_deref(), Some("sport, running"));
        assert_eq!(shoes.business_user_id, Some(UserId::new("seller-7")));
        assert_eq!(shoes.store_address.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let (store, state, session) = setup();
        let mut screen = AddItemScreen::new(state, session);
        fill(screen.form_mut());
        screen.form_mut().price = "-1".into();
        screen.form_mut().name = "   ".into();

        let err = screen.submit().await.unwrap_err();
        let AppError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get(FormField::Price), Some(FieldError::Negative));
        assert_eq!(errors.get(FormField::Name), Some(FieldError::Required));
        assert_eq!(store.count("products").await, 0);
        assert_eq!(screen.form().price, "-1");
    }

    #[tokio::test]
    async fn test_store_failure_preserves_form() {
        let (store, state, session) = setup();
        store.set_fail_writes(true);
        let mut screen = AddItemScreen::new(state, session);
        fill(screen.form_mut());

        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.notice(), "Error adding product: store is offline");
        assert_eq!(screen.form().name, "Trail Shoes");

        store.set_fail_writes(false);
        assert!(screen.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_renews_expired_session() {
        let email = Email::parse("seller@stall.co.uk").unwrap();
        let identity = Arc::new(
            InMemoryIdentity::new()
                .with_account(&email, "secret1")
                .with_token_lifetime(Duration::zero()),
        );
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(AppConfig::in_memory(), identity.clone(), store.clone());
        let expired = identity
            .sign_in(&email, &SecretString::from("secret1"))
            .await
            .unwrap();

        let mut screen = AddItemScreen::new(state, expired.clone());
        fill(screen.form_mut());
        screen.submit().await.unwrap();

        assert_eq!(store.count("products").await, 1);
        assert_ne!(
            screen.session().id_token().expose_secret(),
            expired.id_token().expose_secret()
        );
    }
}
