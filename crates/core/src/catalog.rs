//! In-memory catalog search.
//!
//! The catalog screen loads the whole product collection once and filters it
//! locally on every query change. Matching is a plain case-insensitive
//! substring test across the product's text fields: no ranking, no
//! tokenising, no index. A multi-word query matches only as a phrase.

use crate::product::Product;

/// Whether `product` matches an already-lowercased query.
///
/// True if the query occurs in any of name, description, category, store
/// name, store address or tags. Absent fields never match.
#[must_use]
pub fn product_matches(product: &Product, query_lower: &str) -> bool {
    product
        .searchable_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query_lower))
}

/// Products matching `query`, in their original order.
///
/// An empty query matches everything.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    if query.is_empty() {
        return products.iter().collect();
    }

    let query_lower = query.to_lowercase();
    products
        .iter()
        .filter(|product| product_matches(product, &query_lower))
        .collect()
}

/// Catalog screen state: the loaded products plus the live search query.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    query: String,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            query: String::new(),
        }
    }

    /// Swap in a freshly loaded product list, keeping the current query.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Update the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every loaded product, in load order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products matching the current query.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.query)
    }
}
