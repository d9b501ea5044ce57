//! Catalog screen.

use tracing::{info, instrument};

use market_stall_core::{Catalog, Product, format_product};

use crate::error::{AppError, add_breadcrumb};
use crate::identity::Session;
use crate::state::AppState;

use super::AddItemScreen;

/// The signed-in user's view of the whole catalog.
///
/// Products are loaded in bulk by [`refresh`](Self::refresh) and filtered
/// locally as the query changes. Nothing is loaded until the first refresh.
pub struct CatalogScreen {
    state: AppState,
    session: Session,
    catalog: Catalog,
}

impl CatalogScreen {
    #[must_use]
    pub fn new(state: AppState, session: Session) -> Self {
        Self {
            state,
            session,
            catalog: Catalog::default(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Reload every product from the store.
    ///
    /// Safe to call any number of times; the current query is kept. On
    /// failure the previously loaded products stay on screen. An expired
    /// session is refreshed first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] if the session cannot be refreshed, or
    /// [`AppError::LoadProducts`] if the store cannot be read.
    #[instrument(skip(self), fields(user_id = %self.session.user_id))]
    pub async fn refresh(&mut self) -> Result<usize, AppError> {
        self.session = self.state.identity().ensure_fresh(&self.session).await?;

        let products = self
            .state
            .products()
            .list_all(&self.session)
            .await
            .map_err(AppError::LoadProducts)?;

        let count = products.len();
        self.catalog.replace_products(products);
        info!(count, "Catalog refreshed");
        Ok(count)
    }

    /// Change the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.catalog.set_query(query);
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.catalog.query()
    }

    /// Every loaded product.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    /// Products matching the current query, in load order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        self.catalog.visible()
    }

    /// Display text for each visible product.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.visible().into_iter().map(format_product).collect()
    }

    /// Open the add-item screen for the signed-in user.
    ///
    /// Call [`refresh`](Self::refresh) once the user comes back.
    #[must_use]
    pub fn add_item(&self) -> AddItemScreen {
        add_breadcrumb("navigation", "Opened add item", None);
        AddItemScreen::new(self.state.clone(), self.session.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use market_stall_core::{Email, LoginForm, UserId};
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::config::AppConfig;
    use crate::identity::{AuthError, InMemoryIdentity};
    use crate::products::product_to_record;
    use crate::screens::LoginScreen;
    use crate::seed::sample_products;
    use crate::store::InMemoryStore;

    fn setup() -> (Arc<InMemoryStore>, CatalogScreen) {
        let records = sample_products(Utc::now())
            .iter()
            .map(product_to_record)
            .collect::<Vec<_>>();
        let store = Arc::new(InMemoryStore::new().with_records("products", records));
        let state = AppState::new(
            AppConfig::in_memory(),
            Arc::new(InMemoryIdentity::new()),
            store.clone(),
        );
        let session = Session::new(UserId::new("u1"), "a@b.co", SecretString::from("t"));
        (store, CatalogScreen::new(state, session))
    }

    #[tokio::test]
    async fn test_empty_until_refreshed() {
        let (_, mut screen) = setup();
        assert!(screen.visible().is_empty());

        assert_eq!(screen.refresh().await.unwrap(), 8);
        assert_eq!(screen.visible().len(), 8);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_and_keeps_query() {
        let (store, mut screen) = setup();
        screen.refresh().await.unwrap();
        screen.set_query("ELECTRONICS");
        let first: Vec<String> = screen.rows();

        screen.refresh().await.unwrap();
        assert_eq!(screen.query(), "ELECTRONICS");
        assert_eq!(screen.rows(), first);
        assert_eq!(first.len(), 3);
        assert_eq!(store.read_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_products() {
        let (store, mut screen) = setup();
        screen.refresh().await.unwrap();

        store.set_fail_reads(true);
        let err = screen.refresh().await.unwrap_err();
        assert_eq!(err.notice(), "Failed to load products: store is offline");
        assert_eq!(screen.products().len(), 8);
    }

    #[tokio::test]
    async fn test_rows_are_formatted() {
        let (_, mut screen) = setup();
        screen.refresh().await.unwrap();
        screen.set_query("coffee");
        assert_eq!(
            screen.rows(),
            ["Organic Coffee - £12.99\nStore: Bean There Cafe | Qty: 20\nFresh roasted organic coffee beans"]
        );
    }

    #[tokio::test]
    async fn test_refresh_renews_expired_session() {
        let email = Email::parse("trader@stall.co.uk").unwrap();
        let identity = InMemoryIdentity::new()
            .with_account(&email, "secret1")
            .with_token_lifetime(Duration::zero());
        let state = AppState::new(
            AppConfig::in_memory(),
            Arc::new(identity),
            Arc::new(InMemoryStore::new()),
        );

        let mut login = LoginScreen::new(state.clone());
        *login.form_mut() = LoginForm::new("trader@stall.co.uk", "secret1");
        let expired = login.submit().await.unwrap();
        assert!(expired.is_expired(Utc::now()));

        let mut screen = CatalogScreen::new(state, expired.clone());
        screen.refresh().await.unwrap();
        assert_eq!(screen.session().user_id, expired.user_id);
        assert_ne!(
            screen.session().id_token().expose_secret(),
            expired.id_token().expose_secret()
        );

        // The refreshed session is what the add-item screen gets.
        let add = screen.add_item();
        assert_eq!(
            add.session().id_token().expose_secret(),
            screen.session().id_token().expose_secret()
        );
    }

    #[tokio::test]
    async fn test_unrefreshable_session_fails_refresh() {
        let (store, mut screen) = setup();
        screen.session = Session::new(UserId::new("u1"), "a@b.co", SecretString::from("t"))
            .with_refresh(SecretString::from("revoked"), Utc::now() - Duration::minutes(1));

        let err = screen.refresh().await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::SessionExpired)));
        assert_eq!(store.read_calls(), 0);
    }
}
