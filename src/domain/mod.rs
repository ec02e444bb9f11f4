//! Domain models and types for the ambulance waiting list.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Aggregate** ([`Ambulance`]) with its nested [`WaitingListEntry`] and
//!   [`Condition`] collections, persisted as one document
//! - **Error types** ([`AmbulanceError`], [`StoreError`], [`ReconcileError`])
//! - **Result type alias** ([`Result`])
//!
//! The models carry data only. Estimated start times are computed by
//! [`crate::core::reconcile`].
//!
//! # Builder Pattern
//!
//! ```rust
//! use ambulance_wl::domain::WaitingListEntry;
//! use chrono::Utc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = WaitingListEntry::builder()
//!     .patient_id("10001")
//!     .name("Jožko Púčik")
//!     .waiting_since(Utc::now())
//!     .estimated_duration_minutes(15)
//!     .condition_code("folowup")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod ambulance;
pub mod condition;
pub mod errors;
pub mod result;
pub mod waiting_list;

// Re-export commonly used types for convenience
pub use ambulance::Ambulance;
pub use condition::Condition;
pub use errors::{AmbulanceError, ReconcileError, StoreError};
pub use result::Result;
pub use waiting_list::{WaitingListEntry, WaitingListEntryBuilder};
