//! Shared handler state

use crate::adapters::database::{DocumentService, OperationContext};
use crate::domain::Ambulance;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// State handed to every handler
///
/// The store is injected at construction; handlers never reach for a
/// global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentService<Ambulance>>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentService<Ambulance>>) -> Self {
        Self::with_shutdown(store, CancellationToken::new())
    }

    /// Store operations of in-flight requests are cancelled with `shutdown`
    pub fn with_shutdown(
        store: Arc<dyn DocumentService<Ambulance>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { store, shutdown }
    }

    /// A fresh context for one request's store operations
    pub fn operation_context(&self) -> OperationContext {
        OperationContext::new().with_cancellation(self.shutdown.child_token())
    }
}
