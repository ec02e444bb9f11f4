//! Logging and observability
//!
//! Structured logging through `tracing`, with human-readable console output
//! and optional JSON files rotated by `tracing-appender`.
//!
//! # Example
//!
//! ```no_run
//! use ambulance_wl::logging::init_logging;
//! use ambulance_wl::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{bootstrap_subscriber, init_logging, LoggingGuard};

/// Log a failed store or reconcile operation with the request it belongs to
///
/// # Example
///
/// ```no_run
/// use ambulance_wl::log_error_with_context;
/// use ambulance_wl::domain::AmbulanceError;
///
/// let error = AmbulanceError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
