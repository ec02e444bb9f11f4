//! PostgreSQL implementation of the document store
//!
//! Create runs an explicit existence check before inserting so the common
//! duplicate case reports `Conflict` without touching the constraint; the
//! primary key still decides concurrent creates, and its violation is
//! reported as `Conflict` too. Update and delete are single statements
//! whose affected row count distinguishes `NotFound`.

use super::client::PostgreSQLClient;
use super::models::{decode_document, encode_document};
use crate::adapters::database::traits::{
    Document, DocumentFilter, DocumentService, StoreResult,
};
use crate::adapters::database::OperationContext;
use crate::config::DatabaseConfig;
use crate::domain::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_postgres::error::SqlState;

/// Document store persisting `D` as JSONB rows
pub struct PostgreSQLDocumentStore<D> {
    client: Arc<PostgreSQLClient>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> PostgreSQLDocumentStore<D> {
    /// Create a store for the configured collection; connects lazily
    pub fn new(config: DatabaseConfig) -> Self {
        Self::new_with_arc(Arc::new(PostgreSQLClient::new(config)))
    }

    /// Create a store sharing an existing client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self {
            client,
            _document: PhantomData,
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn query_documents(&self, filter: &DocumentFilter) -> StoreResult<Vec<D>> {
        let conn = self.client.get_connection().await?;
        let statements = self.client.statements();

        let rows = match filter {
            DocumentFilter::All => conn.query(&statements.select_all, &[]).await,
            DocumentFilter::Matches(pattern) => {
                conn.query(&statements.select_matching, &[pattern]).await
            }
        }
        .map_err(|e| StoreError::backend("find documents", e))?;

        rows.into_iter()
            .map(|row| {
                let value: Value = row
                    .try_get("document")
                    .map_err(|e| StoreError::backend("read document column", e))?;
                decode_document(value)
            })
            .collect()
    }
}

fn map_insert_error(id: &str, err: tokio_postgres::Error) -> StoreError {
    classify_insert_error(id, err.code(), &err)
}

/// A primary key violation means a concurrent create won the race
fn classify_insert_error(
    id: &str,
    code: Option<&SqlState>,
    err: impl std::fmt::Display,
) -> StoreError {
    if code == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::Conflict(id.to_string())
    } else {
        StoreError::backend("insert document", err)
    }
}

#[async_trait]
impl<D: Document> DocumentService<D> for PostgreSQLDocumentStore<D> {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        document: &D,
    ) -> StoreResult<()> {
        let value = encode_document(document)?;

        ctx.run(self.client.config().timeout(), "create_document", async {
            let conn = self.client.get_connection().await?;
            let statements = self.client.statements();

            let existing = conn
                .query_opt(&statements.exists, &[&id])
                .await
                .map_err(|e| StoreError::backend("check document existence", e))?;
            if existing.is_some() {
                return Err(StoreError::Conflict(id.to_string()));
            }

            conn.execute(&statements.insert, &[&id, &value])
                .await
                .map_err(|e| map_insert_error(id, e))?;

            tracing::debug!(id, collection = %self.collection_name(), "Document created");
            Ok(())
        })
        .await
    }

    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<D> {
        ctx.run(self.client.config().timeout(), "find_document", async {
            let conn = self.client.get_connection().await?;
            let row = conn
                .query_opt(&self.client.statements().select_one, &[&id])
                .await
                .map_err(|e| StoreError::backend("find document", e))?
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

            let value: Value = row
                .try_get("document")
                .map_err(|e| StoreError::backend("read document column", e))?;
            decode_document(value)
        })
        .await
    }

    async fn find_documents(
        &self,
        ctx: &OperationContext,
        filter: &DocumentFilter,
    ) -> StoreResult<Vec<D>> {
        ctx.run(
            self.client.config().timeout(),
            "find_documents",
            self.query_documents(filter),
        )
        .await
    }

    async fn update_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        document: &D,
    ) -> StoreResult<()> {
        let value = encode_document(document)?;

        ctx.run(self.client.config().timeout(), "update_document", async {
            let conn = self.client.get_connection().await?;
            let updated = conn
                .execute(&self.client.statements().update, &[&id, &value])
                .await
                .map_err(|e| StoreError::backend("update document", e))?;

            if updated == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
            tracing::debug!(id, collection = %self.collection_name(), "Document replaced");
            Ok(())
        })
        .await
    }

    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()> {
        ctx.run(self.client.config().timeout(), "delete_document", async {
            let conn = self.client.get_connection().await?;
            let deleted = conn
                .execute(&self.client.statements().delete, &[&id])
                .await
                .map_err(|e| StoreError::backend("delete document", e))?;

            if deleted == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
            tracing::debug!(id, collection = %self.collection_name(), "Document deleted");
            Ok(())
        })
        .await
    }

    async fn disconnect(&self, ctx: &OperationContext) -> StoreResult<()> {
        ctx.run(self.client.config().timeout(), "disconnect", async {
            self.client.disconnect().await;
            Ok::<(), StoreError>(())
        })
        .await
    }

    fn collection_name(&self) -> &str {
        &self.client.config().collection
    }
}
