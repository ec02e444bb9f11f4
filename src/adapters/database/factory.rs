//! Document store factory
//!
//! This module selects the document store backend based on configuration.

use crate::adapters::database::traits::{Document, DocumentService};
use crate::adapters::memory::InMemoryDocumentStore;
use crate::adapters::postgresql::PostgreSQLDocumentStore;
use crate::config::schema::{DatabaseConfig, DatabaseTarget};
use std::sync::Arc;

/// Create a document store for `D` based on the configuration
///
/// No connection is made here; the PostgreSQL store connects on its first
/// operation.
///
/// # Arguments
///
/// * `config` - Database configuration, already validated
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements [`DocumentService`]
pub fn create_document_store<D: Document>(config: &DatabaseConfig) -> Arc<dyn DocumentService<D>> {
    match config.target {
        DatabaseTarget::PostgreSQL => {
            tracing::info!(
                location = %config.display_location(),
                "Creating PostgreSQL document store"
            );
            Arc::new(PostgreSQLDocumentStore::<D>::new(config.clone()))
        }
        DatabaseTarget::Memory => {
            tracing::info!(collection = %config.collection, "Creating in-memory document store");
            Arc::new(InMemoryDocumentStore::<D>::new(&config.collection).with_timeout(config.timeout()))
        }
    }
}
