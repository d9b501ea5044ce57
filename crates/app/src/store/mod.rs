//! Document store abstraction.
//!
//! Listings live in a schemaless document database. The store deals in
//! [`Record`]s, ordered maps of typed [`FieldValue`]s, and knows nothing about
//! products; [`crate::products::ProductRepository`] does the mapping.
//!
//! # Backends
//!
//! - [`Firestore`] - Cloud Firestore REST API, authorised with the session's
//!   id token
//! - [`InMemoryStore`] - process-local collections for tests and demos

mod firestore;
mod memory;

pub use firestore::Firestore;
pub use memory::InMemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::identity::Session;

/// A single typed document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// The string payload, if this is a string field.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Document body keyed by field name.
pub type Record = BTreeMap<String, FieldValue>;

/// A document read back from the store together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub fields: Record,
}

/// Errors that can occur talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store returned an error response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response could not be decoded.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Store is not reachable.
    #[error("{0}")]
    Unavailable(String),
}

/// Append-only access to named collections of documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_tag(&self) -> &'static str;

    /// Append a document and return the id the store assigned to it.
    async fn insert(
        &self,
        session: &Session,
        collection: &str,
        record: Record,
    ) -> Result<String, StoreError>;

    /// Every document in the collection, in the store's natural order.
    async fn get_all(
        &self,
        session: &Session,
        collection: &str,
    ) -> Result<Vec<StoredRecord>, StoreError>;
}
