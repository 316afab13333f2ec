//! Adapter - The storage port
//!
//! This trait is what the repository needs from a storage technology,
//! and nothing more. How records actually land on disk (or in memory,
//! or across a network) is the adapter's business.

use thiserror::Error;

use crate::model::key::Key;
use crate::model::record::Record;
use crate::query::builder::{Query, QueryBuilder};

/// Failures reported by an adapter.
///
/// Duplicate-id and not-found outcomes are distinct variants so the
/// repository can map them to its own taxonomy; everything else is an
/// opaque backend fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("duplicate id {id} in collection '{collection}'")]
    DuplicateId { collection: String, id: Key },

    #[error("no record with id {id} in collection '{collection}'")]
    NotFound { collection: String, id: Key },

    #[error("storage backend failure: {message}")]
    Backend { message: String },
}

/// The storage port consumed by [`Repository`](crate::repository::store::Repository).
///
/// All operations are synchronous single round-trips; concurrency guarantees
/// are whatever the backing store provides.
pub trait Adapter {
    /// Insert a record. `id` is the caller-assigned key, preserved verbatim
    /// when present; when absent the adapter generates one. An existing key
    /// fails with [`AdapterError::DuplicateId`].
    fn insert(
        &self,
        collection: &str,
        id: Option<Key>,
        record: Record,
    ) -> Result<Key, AdapterError>;

    /// Overwrite the record at `id`. Fails with [`AdapterError::NotFound`]
    /// when no record exists there.
    fn update(&self, collection: &str, id: &Key, record: Record) -> Result<(), AdapterError>;

    /// Remove the record at `id`. Fails with [`AdapterError::NotFound`]
    /// when no record exists there.
    fn delete(&self, collection: &str, id: &Key) -> Result<(), AdapterError>;

    /// Fetch a single record, absent-value on miss.
    fn find_by_id(&self, collection: &str, id: &Key) -> Result<Option<Record>, AdapterError>;

    /// Every record in the collection, in storage-defined order.
    fn scan(&self, collection: &str) -> Result<Vec<(Key, Record)>, AdapterError>;

    /// The record at the minimum of `sort_key`, absent-value when empty.
    fn first(
        &self,
        collection: &str,
        sort_key: &str,
    ) -> Result<Option<(Key, Record)>, AdapterError>;

    /// The record at the maximum of `sort_key`, absent-value when empty.
    fn last(
        &self,
        collection: &str,
        sort_key: &str,
    ) -> Result<Option<(Key, Record)>, AdapterError>;

    /// Number of records in the collection.
    fn count(&self, collection: &str) -> Result<usize, AdapterError>;

    /// Remove every record in the collection. Idempotent.
    fn clear(&self, collection: &str) -> Result<(), AdapterError>;

    /// Hand out a query builder for custom finders. Adapters with their own
    /// builder flavor can override this.
    fn query(&self) -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Run a built filter/ordering expression.
    fn run(&self, collection: &str, query: &Query) -> Result<Vec<(Key, Record)>, AdapterError>;
}
