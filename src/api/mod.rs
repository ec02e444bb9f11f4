//! HTTP API layer
//!
//! Thin glue between HTTP and the domain: handlers load ambulances through
//! the injected [`DocumentService`](crate::adapters::database::DocumentService),
//! mutate them, reconcile the waiting list and store them back. Store error
//! kinds map onto status codes in [`error`].
//!
//! | Route | Method |
//! |-------|--------|
//! | `/api/ambulance` | GET, POST |
//! | `/api/ambulance/{ambulanceId}` | DELETE |
//! | `/api/waiting-list/{ambulanceId}/entries` | GET, POST |
//! | `/api/waiting-list/{ambulanceId}/entries/{entryId}` | GET, PUT, DELETE |
//! | `/api/waiting-list/{ambulanceId}/condition` | GET |
//! | `/openapi` | GET |
//! | `/health` | GET |

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::{router, ApiDoc};
pub use state::AppState;
