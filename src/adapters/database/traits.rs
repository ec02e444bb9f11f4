//! Document store abstraction
//!
//! This module defines the generic persistence interface every backend
//! implements. The same implementation serves any aggregate type `D` that is
//! serializable to a JSON document and identified by a string ID.

use super::context::OperationContext;
use crate::domain::StoreError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Result type of document store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Aggregate types that can be persisted as a document
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Selection of documents for [`DocumentService::find_documents`]
///
/// `Matches` uses JSON containment: a document matches when it contains every
/// field of the filter with an equal value, recursing into nested objects;
/// an array in the filter matches when each of its elements is contained in
/// some element of the document's array.
///
/// # Example
///
/// ```rust
/// use ambulance_wl::adapters::database::DocumentFilter;
/// use serde_json::json;
///
/// let filter = DocumentFilter::field("roomNumber", "101");
/// assert!(filter.matches(&json!({"id": "a", "roomNumber": "101"})));
/// assert!(!filter.matches(&json!({"id": "b", "roomNumber": "102"})));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocumentFilter {
    /// Every document of the collection
    #[default]
    All,

    /// Documents containing the given JSON object
    Matches(Value),
}

impl DocumentFilter {
    /// Filter on a single top-level field
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(name.into(), value.into());
        DocumentFilter::Matches(Value::Object(object))
    }

    /// Whether `document` is selected by this filter
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::Matches(pattern) => json_contains(document, pattern),
        }
    }
}

fn json_contains(document: &Value, pattern: &Value) -> bool {
    match (document, pattern) {
        (Value::Object(doc), Value::Object(pat)) => pat
            .iter()
            .all(|(key, value)| doc.get(key).is_some_and(|d| json_contains(d, value))),
        (Value::Array(doc), Value::Array(pat)) => pat
            .iter()
            .all(|value| doc.iter().any(|d| json_contains(d, value))),
        (Value::Array(doc), scalar) if !scalar.is_object() => doc.contains(scalar),
        (doc, pat) => doc == pat,
    }
}

/// Generic CRUD persistence for documents of type `D`
///
/// Each operation runs under `ctx`: the effective deadline is the earlier of
/// the caller deadline and the store's configured timeout, and cancelling the
/// context aborts the operation with [`StoreError::Backend`]. Stores perform
/// no retries.
///
/// Implementations share one lazily established backend connection between
/// all callers and are safe to use from many tasks at once.
#[async_trait]
pub trait DocumentService<D: Document>: Send + Sync {
    /// Insert a new document
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a document with `id` already exists,
    /// including when a concurrent create for the same `id` wins the race.
    async fn create_document(&self, ctx: &OperationContext, id: &str, document: &D)
        -> StoreResult<()>;

    /// Load a document
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document with `id` exists.
    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<D>;

    /// Load every document selected by `filter`
    ///
    /// An empty selection is an empty vector, not an error.
    async fn find_documents(
        &self,
        ctx: &OperationContext,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<D>>;

    /// Replace a whole document; the last writer wins
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document with `id` exists.
    async fn update_document(&self, ctx: &OperationContext, id: &str, document: &D)
        -> StoreResult<()>;

    /// Remove a document
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document with `id` exists.
    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()>;

    /// Tear down the shared connection if there is one
    ///
    /// Safe to call repeatedly and from any state; a later operation
    /// reconnects transparently.
    async fn disconnect(&self, ctx: &OperationContext) -> StoreResult<()>;

    /// Name of the backing collection
    fn collection_name(&self) -> &str;
}
