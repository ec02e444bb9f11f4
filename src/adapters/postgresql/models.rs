//! PostgreSQL document table layout
//!
//! Every collection is a table holding one JSONB document per row:
//!
//! ```sql
//! CREATE TABLE "<collection>" (
//!     id         TEXT PRIMARY KEY,
//!     document   JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```
//!
//! The primary key is what makes concurrent creates of one id fail for all
//! but one caller.

use crate::adapters::database::traits::{Document, StoreResult};
use crate::domain::StoreError;
use serde_json::Value;

/// Quotes a collection name for use as an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL statements for a single collection table
///
/// Built once per store; the collection name has already been validated by
/// the configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatements {
    /// Creates the table and its containment index if missing
    pub create_table: String,
    /// `$1` = id
    pub exists: String,
    /// `$1` = id, `$2` = document
    pub insert: String,
    /// `$1` = id
    pub select_one: String,
    pub select_all: String,
    /// `$1` = JSONB pattern the document must contain
    pub select_matching: String,
    /// `$1` = id, `$2` = document
    pub update: String,
    /// `$1` = id
    pub delete: String,
}

impl CollectionStatements {
    /// Builds the statements for `collection`
    pub fn new(collection: &str) -> Self {
        let table = quote_identifier(collection);
        let index = quote_identifier(&format!("{collection}_document_idx"));

        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    document JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                CREATE INDEX IF NOT EXISTS {index} ON {table} USING GIN (document jsonb_path_ops);"
            ),
            exists: format!("SELECT 1 FROM {table} WHERE id = $1"),
            insert: format!("INSERT INTO {table} (id, document) VALUES ($1, $2)"),
            select_one: format!("SELECT document FROM {table} WHERE id = $1"),
            select_all: format!("SELECT document FROM {table} ORDER BY id"),
            select_matching: format!(
                "SELECT document FROM {table} WHERE document @> $1 ORDER BY id"
            ),
            update: format!(
                "UPDATE {table} SET document = $2, updated_at = now() WHERE id = $1"
            ),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

/// Serializes a document into the JSONB column value
pub fn encode_document<D: Document>(document: &D) -> StoreResult<Value> {
    serde_json::to_value(document).map_err(|e| StoreError::backend("encode document", e))
}

/// Deserializes the JSONB column value into a document
pub fn decode_document<D: Document>(value: Value) -> StoreResult<D> {
    serde_json::from_value(value).map_err(|e| StoreError::backend("decode document", e))
}
