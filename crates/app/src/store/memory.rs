//! Process-local document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{DocumentStore, Record, StoreError, StoredRecord};
use crate::identity::Session;

/// Document store keeping collections in memory, in insertion order.
///
/// Reads and writes can be made to fail on demand so callers' error paths
/// can be exercised.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<StoredRecord>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_calls: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a collection, assigning sequential ids.
    #[must_use]
    pub fn with_records(mut self, collection: &str, records: impl IntoIterator<Item = Record>) -> Self {
        let docs = self
            .collections
            .get_mut()
            .entry(collection.to_owned())
            .or_default();
        for fields in records {
            let id = next_id(docs.len());
            docs.push(StoredRecord { id, fields });
        }
        self
    }

    /// Make subsequent reads fail with [`StoreError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `get_all` calls served so far, including failed ones.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of documents currently in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn next_id(position: usize) -> String {
    format!("doc-{:04}", position + 1)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn insert(
        &self,
        _session: &Session,
        collection: &str,
        record: Record,
    ) -> Result<String, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }

        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_owned()).or_default();
        let id = next_id(docs.len());
        docs.push(StoredRecord {
            id: id.clone(),
            fields: record,
        });
        Ok(id)
    }

    async fn get_all(
        &self,
        _session: &Session,
        collection: &str,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }

        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}
