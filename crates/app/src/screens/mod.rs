//! Screen controllers.
//!
//! Each screen owns its form or catalog state and is driven by a single
//! front-end loop through `&mut self` methods. Navigation is explicit:
//!
//! ```text
//! LoginScreen --submit/resume--> CatalogScreen --add_item--> AddItemScreen
//!                                      ^                          |
//!                                      +------- refresh ----------+
//! ```
//!
//! The [`Session`](crate::identity::Session) obtained at login is handed to
//! the catalog, and from there to the add-item screen.

mod add_item;
mod catalog;
mod login;

pub use add_item::AddItemScreen;
pub use catalog::CatalogScreen;
pub use login::LoginScreen;

use core::fmt;

use crate::error::AppError;

/// Short message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoginSuccessful,
    ProductsLoaded(usize),
    ProductAdded,
    Failed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginSuccessful => f.write_str("Login Successful!"),
            Self::ProductsLoaded(count) => write!(f, "Loaded {count} products"),
            Self::ProductAdded => f.write_str("Product added successfully!"),
            Self::Failed(message) => f.write_str(message),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        Self::Failed(err.notice())
    }
}
