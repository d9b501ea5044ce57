//! Catalog row formatting.

use std::fmt::Write as _;

use crate::product::Product;

/// Render a product as the multi-line text shown in the catalog list.
///
/// ```text
/// Gaming Laptop - £999.99
/// Store: TechStore Plus | Qty: 5
/// High-performance gaming laptop
/// ```
///
/// The store line is omitted when the store name is blank, the quantity only
/// appears when stock is above zero, and the description line is omitted
/// when empty.
#[must_use]
pub fn format_product(product: &Product) -> String {
    let mut out = format!("{} - £{}", product.name, product.price);

    if let Some(store) = product.store_name.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(out, "\nStore: {store}");
    }

    if product.quantity.in_stock() {
        let _ = write!(out, " | Qty: {}", product.quantity);
    }

    if !product.description.is_empty() {
        let _ = write!(out, "\n{}", product.description);
    }

    out
}
