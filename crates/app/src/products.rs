//! Product persistence on top of a [`DocumentStore`].
//!
//! Documents use the field names the mobile client has always written
//! (`storeName`, `businessUserId`, `dateAdded`, ...). Reads are lenient:
//! numbers stored as strings are accepted, unusable prices and quantities
//! fall back to zero, and documents without a name or description are
//! skipped rather than failing the whole load.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use market_stall_core::{NewProduct, Price, Product, ProductId, Quantity, UserId};

use crate::identity::Session;
use crate::store::{DocumentStore, FieldValue, Record, StoreError, StoredRecord};

/// Document field names.
mod field {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const STORE_NAME: &str = "storeName";
    pub const STORE_ADDRESS: &str = "storeAddress";
    pub const TAGS: &str = "tags";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const BUSINESS_USER_ID: &str = "businessUserId";
    pub const DATE_ADDED: &str = "dateAdded";
}

/// Reads and appends product listings in one collection.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// Load every listing, in the store's order.
    ///
    /// # Errors
    ///
    /// Returns the store error if the collection cannot be read.
    #[instrument(skip_all, fields(collection = %self.collection, backend = self.store.backend_tag()))]
    pub async fn list_all(&self, session: &Session) -> Result<Vec<Product>, StoreError> {
        let records = self.store.get_all(session, self.collection).await?;
        let total = records.len();
        let products: Vec<Product> = records.iter().filter_map(product_from_record).collect();

        if products.len() < total {
            warn!(
                skipped = total - products.len(),
                "Skipped documents missing a name or description"
            );
        }
        debug!(count = products.len(), "Loaded products");
        Ok(products)
    }

    /// Append a listing and return its new id.
    ///
    /// # Errors
    ///
    /// Returns the store error if the write is rejected.
    #[instrument(skip_all, fields(collection = %self.collection, name = %product.name))]
    pub async fn create(
        &self,
        session: &Session,
        product: &NewProduct,
    ) -> Result<ProductId, StoreError> {
        let id = self
            .store
            .insert(session, self.collection, product_to_record(product))
            .await?;
        Ok(ProductId::new(id))
    }
}

/// Encode a new listing as a document.
#[must_use]
pub fn product_to_record(product: &NewProduct) -> Record {
    Record::from([
        (field::NAME.to_owned(), FieldValue::from(product.name.as_str())),
        (
            field::DESCRIPTION.to_owned(),
            FieldValue::from(product.description.as_str()),
        ),
        (
            field::CATEGORY.to_owned(),
            FieldValue::from(product.category.label()),
        ),
        (
            field::STORE_NAME.to_owned(),
            FieldValue::from(product.store_name.as_str()),
        ),
        (
            field::STORE_ADDRESS.to_owned(),
            FieldValue::from(product.store_address.as_str()),
        ),
        (field::TAGS.to_owned(), FieldValue::from(product.tags.as_str())),
        (
            field::PRICE.to_owned(),
            FieldValue::Double(product.price.to_f64()),
        ),
        (
            field::QUANTITY.to_owned(),
            FieldValue::Integer(i64::from(product.quantity.get())),
        ),
        (
            field::BUSINESS_USER_ID.to_owned(),
            FieldValue::from(product.business_user_id.as_str()),
        ),
        (
            field::DATE_ADDED.to_owned(),
            FieldValue::Integer(product.date_added.timestamp_millis()),
        ),
    ])
}

/// Decode a stored document, or `None` if it lacks a name or description.
#[must_use]
pub fn product_from_record(record: &StoredRecord) -> Option<Product> {
    let fields = &record.fields;
    let text = |key: &str| fields.get(key).and_then(FieldValue::as_str).map(str::to_owned);

    let Some(name) = text(field::NAME) else {
        debug!(id = %record.id, "Document has no name");
        return None;
    };
    let Some(description) = text(field::DESCRIPTION) else {
        debug!(id = %record.id, "Document has no description");
        return None;
    };

    Some(Product {
        id: ProductId::new(record.id.clone()),
        name,
        description,
        category: text(field::CATEGORY),
        store_name: text(field::STORE_NAME),
        store_address: text(field::STORE_ADDRESS),
        tags: text(field::TAGS),
        price: decode_price(&record.id, fields.get(field::PRICE)),
        quantity: decode_quantity(fields.get(field::QUANTITY)),
        business_user_id: text(field::BUSINESS_USER_ID).map(UserId::new),
        date_added: fields.get(field::DATE_ADDED).and_then(decode_date),
    })
}

fn decode_price(id: &str, value: Option<&FieldValue>) -> Price {
    let decoded = match value {
        None | Some(FieldValue::Null) => return Price::ZERO,
        Some(FieldValue::Double(d)) => Price::from_f64(*d),
        Some(FieldValue::Integer(i)) => Price::new(Decimal::from(*i)).ok(),
        Some(FieldValue::String(s)) => Price::parse(s.trim()).ok(),
        Some(_) => None,
    };

    decoded.unwrap_or_else(|| {
        warn!(%id, "Unusable price, showing 0.00");
        Price::ZERO
    })
}

#[allow(clippy::cast_possible_truncation)] // whole doubles only, saturating cast
fn decode_quantity(value: Option<&FieldValue>) -> Quantity {
    match value {
        Some(FieldValue::Integer(i)) => Quantity::saturating_from_i64(*i),
        Some(FieldValue::Double(d)) if d.is_finite() => Quantity::saturating_from_i64(d.trunc() as i64),
        Some(FieldValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_or(Quantity::ZERO, Quantity::saturating_from_i64),
        _ => Quantity::ZERO,
    }
}

#[allow(clippy::cast_possible_truncation)] // millis since epoch fit in i64
fn decode_date(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Integer(millis) => DateTime::from_timestamp_millis(*millis),
        FieldValue::Double(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(*millis as i64)
        }
        FieldValue::Timestamp(at) => Some(*at),
        FieldValue::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        _ => None,
    }
}
