//! `stall browse`: the interactive login → catalog ⇄ add-item loop.
//!
//! Typing at the catalog prompt filters the list; commands start with `:`.

use market_stall_app::error::AppError;
use market_stall_app::identity::Session;
use market_stall_app::screens::{AddItemScreen, CatalogScreen, LoginScreen, Notice};
use market_stall_app::state::AppState;
use market_stall_core::ProductForm;

use super::CommandError;
use crate::console::Console;

const HELP: &str = "\
Type to search. Commands:
  :add      add a product
  :refresh  reload the catalog
  :clear    clear the search
  :help     show this help
  :quit     exit";

/// Run the interactive session until the user quits or stdin closes.
///
/// Failed operations are shown and the loop carries on.
///
/// # Errors
///
/// Returns an error only if the terminal itself fails.
pub async fn run(state: &AppState, console: &mut Console) -> Result<(), CommandError> {
    let Some(session) = login(state, console).await? else {
        return Ok(());
    };

    let mut catalog = CatalogScreen::new(state.clone(), session);
    refresh(&mut catalog, console).await?;
    console.line(HELP)?;
    render(&catalog, console)?;

    loop {
        let Some(input) = console.prompt("search").await? else {
            return Ok(());
        };

        match input.trim() {
            ":quit" | ":q" => return Ok(()),
            ":help" => console.line(HELP)?,
            ":refresh" => {
                refresh(&mut catalog, console).await?;
                render(&catalog, console)?;
            }
            ":clear" => {
                catalog.set_query("");
                render(&catalog, console)?;
            }
            ":add" => {
                let mut screen = catalog.add_item();
                add_item(&mut screen, console).await?;
                refresh(&mut catalog, console).await?;
                render(&catalog, console)?;
            }
            _ => {
                catalog.set_query(input.as_str());
                render(&catalog, console)?;
            }
        }
    }
}

/// Resume the stored session or prompt until sign-in succeeds.
async fn login(state: &AppState, console: &mut Console) -> Result<Option<Session>, CommandError> {
    let mut screen = LoginScreen::new(state.clone());

    if let Some(session) = screen.resume().await {
        console.line(format!("Signed in as {}", session.email))?;
        return Ok(Some(session));
    }

    loop {
        let current = screen.form().email.clone();
        let Some(email) = console.prompt_keep("Email", &current).await? else {
            return Ok(None);
        };
        let Some(password) = console.prompt("Password").await? else {
            return Ok(None);
        };
        screen.form_mut().email = email;
        screen.form_mut().password = password;

        match screen.submit().await {
            Ok(session) => {
                console.line(Notice::LoginSuccessful)?;
                return Ok(Some(session));
            }
            Err(e) => show(&e, console)?,
        }
    }
}

/// Fill in and submit the add-item form until it succeeds or the user
/// gives up. The form keeps its values between attempts.
async fn add_item(screen: &mut AddItemScreen, console: &mut Console) -> Result<(), CommandError> {
    loop {
        if !fill_form(screen.form_mut(), console).await? {
            return Ok(());
        }

        match screen.submit().await {
            Ok(_) => {
                console.line(Notice::ProductAdded)?;
                return Ok(());
            }
            Err(e) => {
                show(&e, console)?;
                let again = console.prompt("Try again? [Y/n]").await?;
                if again.is_none_or(|a| a.trim().eq_ignore_ascii_case("n")) {
                    return Ok(());
                }
            }
        }
    }
}

/// Prompt for every field. Returns `false` if stdin closed.
async fn fill_form(form: &mut ProductForm, console: &mut Console) -> Result<bool, CommandError> {
    let fields: [(&str, &mut String); 7] = [
        ("Product name", &mut form.name),
        ("Store name", &mut form.store_name),
        ("Store address (optional)", &mut form.store_address),
        ("Description", &mut form.description),
        ("Quantity", &mut form.quantity),
        ("Tags (optional)", &mut form.tags),
        ("Price (£)", &mut form.price),
    ];

    for (label, value) in fields {
        let Some(answer) = console.prompt_keep(label, value).await? else {
            return Ok(false);
        };
        *value = answer;
    }
    Ok(true)
}

async fn refresh(catalog: &mut CatalogScreen, console: &mut Console) -> Result<(), CommandError> {
    match catalog.refresh().await {
        Ok(count) => console.line(Notice::ProductsLoaded(count))?,
        Err(e) => show(&e, console)?,
    }
    Ok(())
}

fn render(catalog: &CatalogScreen, console: &mut Console) -> Result<(), CommandError> {
    let rows = catalog.rows();
    console.blank()?;
    if rows.is_empty() {
        console.line("No products found")?;
    }
    for row in rows {
        console.line(row)?;
        console.blank()?;
    }
    Ok(())
}

fn show(err: &AppError, console: &mut Console) -> Result<(), CommandError> {
    err.report();
    console.line(Notice::from(err))?;
    Ok(())
}
