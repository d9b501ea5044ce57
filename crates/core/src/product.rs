//! Product listing types.
//!
//! [`Product`] is what the catalog reads back from the store; documents
//! written by older clients may be missing fields, so everything except the
//! name and description is optional. [`NewProduct`] is what the add-item
//! form produces and is always complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{Price, ProductId, Quantity, UserId};

/// A product listing as loaded from the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub tags: Option<String>,
    pub price: Price,
    pub quantity: Quantity,
    pub business_user_id: Option<UserId>,
    pub date_added: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: None,
            store_name: None,
            store_address: None,
            tags: None,
            price: Price::ZERO,
            quantity: Quantity::ZERO,
            business_user_id: None,
            date_added: None,
        }
    }

    /// The text fields that free-text search looks at, in match order.
    ///
    /// Absent optional fields are yielded as `None`.
    pub fn searchable_fields(&self) -> [Option<&str>; 6] {
        [
            Some(self.name.as_str()),
            Some(self.description.as_str()),
            self.category.as_deref(),
            self.store_name.as_deref(),
            self.store_address.as_deref(),
            self.tags.as_deref(),
        ]
    }
}

/// A validated listing ready to be appended to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub store_name: String,
    /// Empty when the seller left it blank.
    pub store_address: String,
    /// Lowercased free text.
    pub tags: String,
    pub price: Price,
    pub quantity: Quantity,
    pub business_user_id: UserId,
    pub date_added: DateTime<Utc>,
}

impl NewProduct {
    /// The product as it will read back once the store has assigned `id`.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: Some(self.category.label().to_owned()),
            store_name: Some(self.store_name),
            store_address: Some(self.store_address),
            tags: Some(self.tags),
            price: self.price,
            quantity: self.quantity,
            business_user_id: Some(self.business_user_id),
            date_added: Some(self.date_added),
        }
    }
}
