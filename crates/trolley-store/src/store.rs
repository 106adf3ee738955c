use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::mpsc::Receiver;

use crate::batch::WriteBatch;
use crate::path::{CollectionPath, DocPath};

/// Documents cross the store boundary as schemaless JSON values; the typed
/// encode/decode helpers below sit at the seam.
pub type Document = serde_json::Value;

/// Filter for collection and collection-group queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A top-level field equals the given value.
    FieldEq(String, Document),
    /// A top-level array field contains the given value.
    ArrayContains(String, Document),
}

impl Filter {
    /// Whether a document passes this filter.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::FieldEq(field, value) => doc.get(field) == Some(value),
            Filter::ArrayContains(field, value) => doc
                .get(field)
                .and_then(Document::as_array)
                .is_some_and(|array| array.contains(value)),
        }
    }
}

/// A full view of one collection, delivered to subscribers on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot {
    pub collection: CollectionPath,
    pub docs: Vec<(String, Document)>,
}

/// The trait all storage backends implement.
///
/// `commit` is the only consistency primitive: a batch applies all of its
/// operations or none of them. Subscriptions deliver whole-collection
/// snapshots over a channel; dropping the receiver unsubscribes.
pub trait DocumentStore: Send + Sync {
    /// Read one document.
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Create or replace one document.
    fn set(&self, path: &DocPath, doc: Document) -> Result<(), StoreError>;

    /// Shallow-merge fields into one document, creating it if absent.
    fn merge(&self, path: &DocPath, fields: Document) -> Result<(), StoreError>;

    /// Delete one document. Deleting an absent document is a no-op.
    fn delete(&self, path: &DocPath) -> Result<(), StoreError>;

    /// Read a whole collection, optionally filtered.
    fn list(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Query every collection named `collection_name` across all partitions
    /// (the membership-containment query over lists uses this).
    fn query_group(
        &self,
        collection_name: &str,
        filter: &Filter,
    ) -> Result<Vec<(DocPath, Document)>, StoreError>;

    /// Apply a batch atomically: every operation or none.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Subscribe to a collection, optionally filtered. The current snapshot
    /// is delivered immediately, then one snapshot per change.
    fn subscribe(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Receiver<CollectionSnapshot>, StoreError>;
}

/// Encode a typed value as a store document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Validation(format!("encode: {}", e)))
}

/// Decode a store document into a typed value.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Validation(format!("decode: {}", e)))
}

/// Errors from the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document already exists: {0}")]
    AlreadyExists(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}
