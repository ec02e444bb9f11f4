//! Core business logic for the ambulance waiting list.
//!
//! # Modules
//!
//! - [`reconcile`] - Recomputation of estimated start times for a waiting list
//!
//! # Mutation Workflow
//!
//! The API layer composes the document store and the reconciliation engine;
//! the two never call each other:
//!
//! 1. **Load**: `DocumentService::find` the ambulance
//! 2. **Mutate**: add, change or remove waiting list entries in memory
//! 3. **Reconcile**: [`Ambulance::reconcile_waiting_list`](crate::domain::Ambulance::reconcile_waiting_list)
//! 4. **Store**: `DocumentService::update` the whole document
//!
//! No lock spans these steps. Two concurrent mutations of the same ambulance
//! each work on their own copy and the later `update` wins (lost update).
//!
//! # Example
//!
//! ```rust
//! use ambulance_wl::domain::{Ambulance, WaitingListEntry};
//! use chrono::Utc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ambulance = Ambulance::new("General practice", "101");
//! ambulance.waiting_list.push(
//!     WaitingListEntry::builder()
//!         .patient_id("10001")
//!         .estimated_duration_minutes(20)
//!         .build()?,
//! );
//! ambulance.reconcile_waiting_list(Utc::now())?;
//! # Ok(())
//! # }
//! ```

pub mod reconcile;
