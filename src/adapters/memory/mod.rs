//! In-memory document store for development and tests

pub mod adapter;

pub use adapter::InMemoryDocumentStore;
