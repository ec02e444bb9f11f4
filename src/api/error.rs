//! HTTP error responses
//!
//! Every failure leaves the API as a JSON body with the reason phrase of the
//! status code, a human message and the underlying error text.

use crate::domain::{ReconcileError, StoreError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Reason phrase of the HTTP status, e.g. `Not Found`
    pub status: String,
    /// What the request was trying to do
    pub message: String,
    /// Underlying error text
    pub error: String,
}

/// An error a handler returns to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            status,
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>, error: impl ToString) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, error)
    }

    pub fn not_found(message: impl Into<String>, error: impl ToString) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, error)
    }

    pub fn conflict(message: impl Into<String>, error: impl ToString) -> Self {
        Self::new(StatusCode::CONFLICT, message, error)
    }

    /// Maps a store failure by kind
    ///
    /// `not_found` and `conflict` name the entity for the sentinel kinds;
    /// `failure` describes the operation for backend errors, which become 502.
    pub fn from_store(err: StoreError, failure: &str) -> Self {
        match &err {
            StoreError::NotFound(_) => Self::not_found("Ambulance not found", err),
            StoreError::Conflict(_) => Self::conflict("Ambulance already exists", err),
            StoreError::Backend(_) => Self::new(StatusCode::BAD_GATEWAY, failure, err),
        }
    }

    /// A malformed request body
    pub fn invalid_body(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body", rejection.body_text())
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message.clone(),
            error: self.error.clone(),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match &err {
            ReconcileError::ScheduleOverflow(_) => {
                Self::bad_request("Waiting list cannot be scheduled", err)
            }
            ReconcileError::InvalidState(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to reconcile waiting list",
                err,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, error = %self.error, "Request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, error = %self.error, "Request rejected");
        }

        (self.status, Json(self.body())).into_response()
    }
}
