//! Integration tests for Market Stall.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory end-to-end tests
//! cargo test -p market-stall-integration-tests
//!
//! # Live Firebase tests (needs FIREBASE_API_KEY, FIREBASE_PROJECT_ID,
//! # STALL_TEST_EMAIL and STALL_TEST_PASSWORD)
//! cargo test -p market-stall-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_flow` - Login, catalog and add-item screens over the in-memory
//!   backends
//! - `firebase_live` - The same flow against a real Firebase project

use std::sync::Arc;

use market_stall_app::config::AppConfig;
use market_stall_app::identity::InMemoryIdentity;
use market_stall_app::state::AppState;
use market_stall_app::store::InMemoryStore;
use market_stall_core::Email;

/// Account registered in every [`TestContext`].
pub const TEST_EMAIL: &str = "trader@stall.test";
pub const TEST_PASSWORD: &str = "hunter22";

/// Application state over fresh in-memory backends.
pub struct TestContext {
    pub state: AppState,
    /// The same store the state uses, for failure injection.
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    /// An empty catalog with one registered account.
    ///
    /// # Panics
    ///
    /// Never in practice; [`TEST_EMAIL`] is a valid address.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    /// Like [`new`](Self::new) but over a pre-populated store.
    ///
    /// # Panics
    ///
    /// Never in practice; [`TEST_EMAIL`] is a valid address.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn with_store(store: InMemoryStore) -> Self {
        let email = Email::parse(TEST_EMAIL).unwrap();
        let identity = InMemoryIdentity::new().with_account(&email, TEST_PASSWORD);
        let store = Arc::new(store);
        let state = AppState::new(AppConfig::in_memory(), Arc::new(identity), store.clone());
        Self { state, store }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
