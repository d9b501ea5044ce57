//! Market Stall Core - Shared types and catalog logic.
//!
//! This crate provides the pieces of Market Stall that do not talk to the
//! outside world. It is used by:
//! - `market-stall-app` - Identity/store backends and the screen controllers
//! - `market-stall-cli` - The `stall` terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Everything here is deterministic given its inputs,
//! which is what makes the catalog rules testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices and quantities
//! - [`category`] - Tag-driven category inference
//! - [`validation`] - Add-item and login form validation
//! - [`catalog`] - In-memory search/filter over loaded products
//! - [`display`] - Single-product display formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod category;
pub mod display;
pub mod product;
pub mod types;
pub mod validation;

pub use catalog::{Catalog, filter_products, product_matches};
pub use category::{CATEGORY_RULES, Category, infer_category};
pub use display::format_product;
pub use product::{NewProduct, Product};
pub use types::*;
pub use validation::{
    Credentials, FieldError, FormField, LoginError, LoginForm, ProductForm, ValidationErrors,
};
