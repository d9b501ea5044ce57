//! One-shot catalog commands: `list`, `add` and `seed`.

use chrono::Utc;

use market_stall_app::error::AppError;
use market_stall_app::screens::{AddItemScreen, CatalogScreen, Notice};
use market_stall_app::seed::seed_catalog;
use market_stall_app::state::AppState;
use market_stall_core::ProductForm;

use super::{CommandError, require_session};
use crate::console::Console;

/// Print every listing matching `query`.
///
/// # Errors
///
/// Returns an error without a session or if the catalog cannot be loaded.
pub async fn list(
    state: &AppState,
    console: &mut Console,
    query: Option<String>,
) -> Result<(), CommandError> {
    let session = require_session(state).await?;
    let mut screen = CatalogScreen::new(state.clone(), session);

    screen.refresh().await.map_err(report)?;
    screen.set_query(query.unwrap_or_default());

    let rows = screen.rows();
    if rows.is_empty() {
        console.line("No products found")?;
    }
    for row in rows {
        console.line(row)?;
        console.blank()?;
    }
    Ok(())
}

/// Append one listing built from command-line arguments.
///
/// # Errors
///
/// Returns every field error at once if the listing is invalid, or the
/// store error if the write fails.
pub async fn add(
    state: &AppState,
    console: &mut Console,
    form: ProductForm,
) -> Result<(), CommandError> {
    let session = require_session(state).await.ok();
    let mut screen = AddItemScreen::open(state.clone(), session).map_err(report)?;
    *screen.form_mut() = form;

    let id = screen.submit().await.map_err(report)?;
    console.line(Notice::ProductAdded)?;
    console.line(format!("id: {id}"))?;
    Ok(())
}

/// Insert the sample listings.
///
/// # Errors
///
/// Returns an error without a session, or if any sample failed to insert.
pub async fn seed(state: &AppState, console: &mut Console) -> Result<(), CommandError> {
    let session = require_session(state).await?;
    console.line("Adding sample products to database...")?;

    let report = seed_catalog(&state.products(), &session, Utc::now()).await;
    console.line(format!("Added {} sample products", report.inserted.len()))?;

    let mut first_failure = None;
    for (name, e) in report.failed {
        let err = AppError::AddProduct(e);
        err.report();
        console.line(format!("{name}: {}", err.notice()))?;
        first_failure.get_or_insert(err);
    }

    first_failure.map_or(Ok(()), |err| Err(err.into()))
}

fn report(err: AppError) -> AppError {
    err.report();
    err
}
