//! Domain error types
//!
//! This module defines the error hierarchy for the ambulance waiting list service.
//! Callers branch on error *kind* (enum variant), never on message text.

use thiserror::Error;

/// Main service error type
///
/// This is the primary error type used by configuration, bootstrap and the
/// layers that compose the document store with the reconciliation engine.
#[derive(Debug, Error)]
pub enum AmbulanceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document store errors
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// Waiting list reconciliation errors
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Document store errors
///
/// `NotFound` and `Conflict` are sentinel kinds the API layer maps to
/// 404 and 409. Every transport, timeout, cancellation or decode failure is
/// folded into `Backend` with enough context to log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document with the given id exists
    #[error("document not found: {0}")]
    NotFound(String),

    /// A document with the given id already exists
    #[error("conflict: document already exists: {0}")]
    Conflict(String),

    /// Lower-level failure of the backing store
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Wraps a lower-level error as `Backend` with a short context prefix
    pub fn backend(context: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Backend(format!("{context}: {err}"))
    }

    /// Returns true for the `NotFound` kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Returns true for the `Conflict` kind
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Reconciliation engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The engine was invoked in a state it cannot handle (empty list).
    /// This is a caller bug, never a user-facing condition.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Estimated times run past the representable date range
    #[error("schedule out of range: {0}")]
    ScheduleOverflow(String),
}
