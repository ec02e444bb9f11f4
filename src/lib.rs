// Ambulance WL - Ambulance waiting list service
// Copyright (c) 2025 Ambulance WL Contributors
// Licensed under the MIT License

//! # Ambulance WL - Ambulance waiting list service
//!
//! An HTTP service that keeps the waiting list of every ambulance (clinic
//! room) and estimates when each waiting patient will be seen.
//!
//! ## Architecture
//!
//! The crate is split into layers:
//!
//! - [`domain`] - Ambulances, waiting list entries, conditions and errors
//! - [`core`] - Reconciliation of estimated start times
//! - [`adapters`] - Generic document store with PostgreSQL and in-memory backends
//! - [`api`] - HTTP routes and handlers (axum)
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ambulance_wl::adapters::database::create_document_store;
//! use ambulance_wl::api::{router, AppState};
//! use ambulance_wl::config::load_config_or_default;
//! use ambulance_wl::domain::Ambulance;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("ambulance-wl.toml")?;
//!     let store = create_document_store::<Ambulance>(&config.database);
//!
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     axum::serve(listener, router(AppState::new(store))).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Waiting List Reconciliation
//!
//! Every change to a waiting list is followed by a reconciliation pass that
//! orders entries by arrival and pushes estimated start times forward so no
//! two treatments overlap:
//!
//! ```rust
//! use ambulance_wl::core::reconcile::reconcile_waiting_list;
//! use ambulance_wl::domain::WaitingListEntry;
//! use chrono::{Duration, Utc};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let now = Utc::now();
//! let mut entries = vec![
//!     WaitingListEntry::builder()
//!         .patient_id("p1")
//!         .waiting_since(now - Duration::minutes(5))
//!         .estimated_duration_minutes(20)
//!         .build()?,
//!     WaitingListEntry::builder()
//!         .patient_id("p2")
//!         .waiting_since(now - Duration::minutes(2))
//!         .estimated_duration_minutes(10)
//!         .build()?,
//! ];
//!
//! reconcile_waiting_list(&mut entries, now)?;
//! assert_eq!(Some(entries[1].estimated_start), entries[0].estimated_end());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Document store failures are [`domain::StoreError`] values that callers
//! match by kind (`NotFound`, `Conflict`, `Backend`). Configuration and
//! bootstrap use [`domain::AmbulanceError`].

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
