//! Application state shared across screens.

use std::sync::Arc;

use market_stall_core::Email;
use tracing::info;

use crate::config::{AppConfig, BackendConfig};
use crate::error::AppError;
use crate::identity::{FirebaseAuth, IdentityProvider, InMemoryIdentity};
use crate::products::{ProductRepository, product_to_record};
use crate::seed;
use crate::store::{DocumentStore, Firestore, InMemoryStore};

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configured identity provider and document store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create application state from explicit backends.
    #[must_use]
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                store,
            }),
        }
    }

    /// Build the backends the configuration selects.
    ///
    /// The `memory` backend starts with the demo account registered and the
    /// sample listings already in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or the demo email
    /// is malformed.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let (identity, store): (Arc<dyn IdentityProvider>, Arc<dyn DocumentStore>) =
            match &config.backend {
                BackendConfig::Firebase(firebase) => (
                    Arc::new(
                        FirebaseAuth::new(firebase).map_err(|e| AppError::Internal(e.to_string()))?,
                    ),
                    Arc::new(
                        Firestore::new(firebase).map_err(|e| AppError::Internal(e.to_string()))?,
                    ),
                ),
                BackendConfig::Memory(demo) => {
                    let email = Email::parse(&demo.email)
                        .map_err(|e| AppError::Internal(format!("STALL_DEMO_EMAIL: {e}")))?;
                    let identity = InMemoryIdentity::new().with_account(&email, demo.password());
                    let samples = seed::sample_products(chrono::Utc::now())
                        .iter()
                        .map(product_to_record)
                        .collect::<Vec<_>>();
                    let store =
                        InMemoryStore::new().with_records(&config.products_collection, samples);
                    (Arc::new(identity), Arc::new(store))
                }
            };

        info!(
            identity = identity.provider_tag(),
            store = store.backend_tag(),
            collection = %config.products_collection,
            "Backends ready"
        );

        Ok(Self::new(config, identity, store))
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Repository over the configured products collection.
    #[must_use]
    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self.store(), &self.inner.config.products_collection)
    }
}
