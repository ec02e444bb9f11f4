//! Persistence adapters
//!
//! - [`database`] - Generic document store abstraction and backend selection
//! - [`postgresql`] - PostgreSQL implementation, JSONB row per document
//! - [`memory`] - In-process implementation for development and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use ambulance_wl::adapters::database::{create_document_store, OperationContext};
//! use ambulance_wl::config::DatabaseConfig;
//! use ambulance_wl::domain::Ambulance;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = create_document_store::<Ambulance>(&DatabaseConfig::default());
//! let ambulance = Ambulance::new("General practice", "101");
//!
//! store
//!     .create_document(&OperationContext::new(), &ambulance.id, &ambulance)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
