//! Live tests against a real Firebase project.
//!
//! These tests require:
//! - `FIREBASE_API_KEY` and `FIREBASE_PROJECT_ID` for a project with
//!   email/password sign-in enabled
//! - `STALL_TEST_EMAIL` / `STALL_TEST_PASSWORD` for an existing account
//! - Firestore rules that let that account read and create `products`
//!
//! Run with: cargo test -p market-stall-integration-tests -- --ignored
//!
//! Listings are append-only, so every run leaves one uniquely named test
//! listing behind.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use market_stall_app::config::{AppConfig, BackendConfig};
use market_stall_app::error::AppError;
use market_stall_app::identity::AuthError;
use market_stall_app::screens::{AddItemScreen, CatalogScreen, LoginScreen};
use market_stall_app::state::AppState;
use market_stall_core::{LoginForm, ProductForm};
use uuid::Uuid;

fn live_state() -> AppState {
    let config = AppConfig::from_env().expect("Firebase configuration");
    assert!(
        matches!(config.backend, BackendConfig::Firebase(_)),
        "live tests need STALL_BACKEND=firebase"
    );
    AppState::from_config(config).expect("Failed to build backends")
}

fn test_credentials() -> (String, String) {
    (
        std::env::var("STALL_TEST_EMAIL").expect("STALL_TEST_EMAIL"),
        std::env::var("STALL_TEST_PASSWORD").expect("STALL_TEST_PASSWORD"),
    )
}

#[tokio::test]
#[ignore = "Requires Firebase credentials"]
async fn test_live_wrong_password_is_rejected() {
    let state = live_state();
    let (email, _) = test_credentials();

    let mut login = LoginScreen::new(state);
    *login.form_mut() = LoginForm::new(email, "definitely-not-it");
    let err = login.submit().await.unwrap_err();

    assert!(
        matches!(
            err,
            AppError::Auth(AuthError::InvalidCredentials | AuthError::TooManyAttempts)
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
#[ignore = "Requires Firebase credentials"]
async fn test_live_add_then_find() {
    let state = live_state();
    let (email, password) = test_credentials();

    let mut login = LoginScreen::new(state.clone());
    *login.form_mut() = LoginForm::new(email, password);
    let session = login.submit().await.unwrap();

    let marker = format!("it-{}", Uuid::new_v4().simple());
    let mut add = AddItemScreen::new(state.clone(), session.clone());
    *add.form_mut() = ProductForm {
        name: format!("Integration Test Listing {marker}"),
        store_name: "Test Harness".into(),
        store_address: String::new(),
        description: "Created by the integration test suite".into(),
        quantity: "1".into(),
        tags: "test, tech".into(),
        price: "0.01".into(),
    };
    let id = add.submit().await.unwrap();

    let mut catalog = CatalogScreen::new(state, session.clone());
    catalog.refresh().await.unwrap();
    catalog.set_query(&marker);

    let visible = catalog.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, id);
    assert_eq!(visible[0].category.as_deref(), Some("Electronics"));
    assert_eq!(visible[0].business_user_id.as_ref(), Some(&session.user_id));
}
