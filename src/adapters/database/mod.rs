//! Database abstraction layer
//!
//! This module provides the generic document store abstraction and the
//! pieces every backend shares:
//!
//! - [`DocumentService`] - CRUD over documents of any serializable type
//! - [`OperationContext`] - caller deadline and cancellation
//! - [`LazyConnection`] - lazily established connection shared by all callers
//! - [`create_document_store`] - backend selection from configuration

pub mod connection;
pub mod context;
pub mod factory;
pub mod traits;

pub use connection::LazyConnection;
pub use context::OperationContext;
pub use factory::create_document_store;
pub use traits::{Document, DocumentFilter, DocumentService, StoreResult};
