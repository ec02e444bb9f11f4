//! Configuration management for the waiting list service.
//!
//! # Overview
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. built-in defaults (every setting has one);
//! 2. an optional TOML file, with `${VAR_NAME}` environment substitution;
//! 3. `AMBULANCE_API_*` environment variables, each overriding one setting.
//!
//! The result is validated before use.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "development"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! port = 8080
//!
//! [database]
//! target = "postgresql"
//! host = "localhost"
//! port = 5432
//! database = "xcok-ambulance-wl"
//! collection = "ambulance"
//! username = "ambulance"
//! password = "${AMBULANCE_API_DB_PASSWORD}"
//! timeout_seconds = 10
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `AMBULANCE_API_LOG_LEVEL` | `application.log_level` |
//! | `AMBULANCE_API_ENVIRONMENT` | `environment` |
//! | `AMBULANCE_API_PORT` | `server.port` |
//! | `AMBULANCE_API_DB_TARGET` | `database.target` |
//! | `AMBULANCE_API_DB_HOST` | `database.host` |
//! | `AMBULANCE_API_DB_PORT` | `database.port` |
//! | `AMBULANCE_API_DB_DATABASE` | `database.database` |
//! | `AMBULANCE_API_DB_COLLECTION` | `database.collection` |
//! | `AMBULANCE_API_DB_USERNAME` | `database.username` |
//! | `AMBULANCE_API_DB_PASSWORD` | `database.password` |
//! | `AMBULANCE_API_DB_TIMEOUT_SECONDS` | `database.timeout_seconds` |

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    AmbulanceConfig, ApplicationConfig, DatabaseConfig, DatabaseTarget, Environment,
    LoggingConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
