//! PostgreSQL document store
//!
//! Documents are stored as JSONB rows in a table named after the collection.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLDocumentStore;
pub use client::PostgreSQLClient;
pub use models::CollectionStatements;
