//! In-process document store
//!
//! Documents are kept as JSON values in a map guarded by a single
//! read-write lock. The existence check and the insert of `create_document`
//! happen under one write guard, so concurrent creates of the same id
//! cannot both succeed.

use crate::adapters::database::traits::{
    Document, DocumentFilter, DocumentService, StoreResult,
};
use crate::adapters::database::OperationContext;
use crate::domain::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::sync::RwLock;

/// Default per-operation budget when none is configured
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Document store holding `D` in memory
pub struct InMemoryDocumentStore<D> {
    collection: String,
    timeout: Duration,
    documents: RwLock<BTreeMap<String, Value>>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> InMemoryDocumentStore<D> {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            timeout: DEFAULT_TIMEOUT,
            documents: RwLock::new(BTreeMap::new()),
            _document: PhantomData,
        }
    }

    /// Per-operation budget applied when the caller has no earlier deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn encode<D: Document>(document: &D) -> StoreResult<Value> {
    serde_json::to_value(document).map_err(|e| StoreError::backend("encode document", e))
}

fn decode<D: Document>(value: Value) -> StoreResult<D> {
    serde_json::from_value(value).map_err(|e| StoreError::backend("decode document", e))
}

#[async_trait]
impl<D: Document> DocumentService<D> for InMemoryDocumentStore<D> {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        document: &D,
    ) -> StoreResult<()> {
        let value = encode(document)?;

        ctx.run(self.timeout, "create_document", async {
            let mut documents = self.documents.write().await;
            if documents.contains_key(id) {
                return Err(StoreError::Conflict(id.to_string()));
            }
            documents.insert(id.to_string(), value);
            tracing::debug!(id, collection = %self.collection, "Document created");
            Ok(())
        })
        .await
    }

    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<D> {
        ctx.run(self.timeout, "find_document", async {
            let value = self
                .documents
                .read()
                .await
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            decode(value)
        })
        .await
    }

    async fn find_documents(
        &self,
        ctx: &OperationContext,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<D>> {
        ctx.run(self.timeout, "find_documents", async {
            let matching: Vec<Value> = self
                .documents
                .read()
                .await
                .values()
                .filter(|document| filter.matches(document))
                .cloned()
                .collect();
            matching.into_iter().map(decode).collect()
        })
        .await
    }

    async fn update_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        document: &D,
    ) -> StoreResult<()> {
        let value = encode(document)?;

        ctx.run(self.timeout, "update_document", async {
            match self.documents.write().await.get_mut(id) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(StoreError::NotFound(id.to_string())),
            }
        })
        .await
    }

    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()> {
        ctx.run(self.timeout, "delete_document", async {
            match self.documents.write().await.remove(id) {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(id.to_string())),
            }
        })
        .await
    }

    async fn disconnect(&self, _ctx: &OperationContext) -> StoreResult<()> {
        tracing::debug!(collection = %self.collection, "In-memory store has no connection to close");
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Room {
        id: String,
        floor: u8,
    }

    fn room(id: &str, floor: u8) -> Room {
        Room {
            id: id.to_string(),
            floor,
        }
    }

    #[tokio::test]
    async fn test_create_find_update_delete() {
        let store = InMemoryDocumentStore::<Room>::new("rooms");
        let ctx = OperationContext::new();

        store.create_document(&ctx, "r1", &room("r1", 1)).await.unwrap();
        assert_eq!(store.find_document(&ctx, "r1").await.unwrap(), room("r1", 1));

        store.update_document(&ctx, "r1", &room("r1", 4)).await.unwrap();
        assert_eq!(store.find_document(&ctx, "r1").await.unwrap().floor, 4);

        store.delete_document(&ctx, "r1").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let store = InMemoryDocumentStore::<Room>::new("rooms");
        let ctx = OperationContext::new();
        store.create_document(&ctx, "r1", &room("r1", 1)).await.unwrap();

        let dup = store.create_document(&ctx, "r1", &room("r1", 2)).await;
        assert!(dup.unwrap_err().is_conflict());
        assert!(store.find_document(&ctx, "nope").await.unwrap_err().is_not_found());
        assert!(store
            .update_document(&ctx, "nope", &room("nope", 1))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(store.delete_document(&ctx, "nope").await.unwrap_err().is_not_found());

        // The failed create did not overwrite the original
        assert_eq!(store.find_document(&ctx, "r1").await.unwrap().floor, 1);
    }

    #[tokio::test]
    async fn test_find_documents_filters_in_id_order() {
        let store = InMemoryDocumentStore::<Room>::new("rooms");
        let ctx = OperationContext::new();
        for (id, floor) in [("c", 2), ("a", 2), ("b", 3)] {
            store.create_document(&ctx, id, &room(id, floor)).await.unwrap();
        }

        let all = store.find_documents(&ctx, &DocumentFilter::All).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let second = store
            .find_documents(&ctx, &DocumentFilter::Matches(json!({"floor": 2})))
            .await
            .unwrap();
        assert_eq!(second.len(), 2);

        let none = store
            .find_documents(&ctx, &DocumentFilter::field("floor", 9))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let store = Arc::new(InMemoryDocumentStore::<Room>::new("rooms"));

        let handles: Vec<_> = (0..16)
            .map(|floor| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_document(&OperationContext::new(), "same", &room("same", floor))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(e) if e.is_conflict() => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_deadline_is_backend_error() {
        let store = InMemoryDocumentStore::<Room>::new("rooms");
        let guard = store.documents.write().await;

        let ctx = OperationContext::new().with_timeout(Duration::from_millis(20));
        let err = store.find_document(&ctx, "r1").await.unwrap_err();
        drop(guard);

        assert!(matches!(err, StoreError::Backend(msg) if msg.contains("deadline exceeded")));
    }
}
