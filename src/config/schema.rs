//! Configuration schema types
//!
//! This module defines the configuration structure of the waiting list service.
//! Every field has a default, so an empty TOML document is a valid configuration.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Document store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTarget {
    /// PostgreSQL, one JSONB document per row
    #[default]
    PostgreSQL,
    /// In-process store, contents are lost on exit
    Memory,
}

impl std::str::FromStr for DatabaseTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Self::PostgreSQL),
            "memory" => Ok(Self::Memory),
            _ => Err(format!(
                "Invalid database target '{s}'. Expected 'postgresql' or 'memory'"
            )),
        }
    }
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Parses an environment name case-insensitively; unknown names are development
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Main service configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AmbulanceConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AmbulanceConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend to use
    #[serde(default)]
    pub target: DatabaseTarget,

    /// Database server host
    #[serde(default = "default_db_host")]
    pub host: String,

    /// Database server port
    #[serde(default = "default_db_port")]
    pub port: u16,

    /// Database name
    #[serde(default = "default_db_name")]
    pub database: String,

    /// Collection (table) holding the documents
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Username; authentication is used only when password is set too
    #[serde(default)]
    pub username: Option<String>,

    /// Password, stored securely in memory and zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Timeout for connecting and default budget of every operation
    #[serde(default = "default_db_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of pooled connections
    #[serde(default = "default_db_max_connections")]
    pub max_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            target: DatabaseTarget::default(),
            host: default_db_host(),
            port: default_db_port(),
            database: default_db_name(),
            collection: default_collection(),
            username: None,
            password: None,
            timeout_seconds: default_db_timeout_seconds(),
            max_connections: default_db_max_connections(),
        }
    }
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("database.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("database.port must be greater than 0".to_string());
        }

        if self.database.trim().is_empty() {
            return Err("database.database cannot be empty".to_string());
        }

        if !is_valid_collection_name(&self.collection) {
            return Err(format!(
                "database.collection '{}' must be 1-63 characters of letters, digits, '_' or '-'",
                self.collection
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("database.timeout_seconds must be greater than 0".to_string());
        }

        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(format!(
                "database.max_connections must be between 1 and 100, got {}",
                self.max_connections
            ));
        }

        Ok(())
    }

    /// Connection and per-operation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Username and password, when both are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        use secrecy::ExposeSecret;

        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_ref())
            .filter(|p: &&str| !p.is_empty())?;
        Some((username, password))
    }

    /// Location of the collection for logs, without the password
    pub fn display_location(&self) -> String {
        format!(
            "//{}@{}:{}/{}/{}",
            self.username.as_deref().unwrap_or(""),
            self.host,
            self.port,
            self.database,
            self.collection
        )
    }
}

/// Collection names become SQL identifiers, so they are restricted
pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "logging.local_rotation must be one of: {}, got '{}'",
                valid_rotations.join(", "),
                self.local_rotation
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled"
                .to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "xcok-ambulance-wl".to_string()
}

fn default_collection() -> String {
    "ambulance".to_string()
}

fn default_db_timeout_seconds() -> u64 {
    10
}

fn default_db_max_connections() -> usize {
    10
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_defaults() {
        let config = AmbulanceConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "xcok-ambulance-wl");
        assert_eq!(config.database.collection, "ambulance");
        assert_eq!(config.database.timeout(), Duration::from_secs(10));
        assert_eq!(config.database.target, DatabaseTarget::PostgreSQL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AmbulanceConfig = toml::from_str("").unwrap();
        assert_eq!(config.database.collection, "ambulance");
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut db = DatabaseConfig::default();
        assert!(db.credentials().is_none());

        db.username = Some("user".to_string());
        assert!(db.credentials().is_none());

        db.password = Some(secret_string(String::new()));
        assert!(db.credentials().is_none());

        db.password = Some(secret_string("secret".to_string()));
        assert_eq!(db.credentials(), Some(("user", "secret")));

        db.username = Some(String::new());
        assert!(db.credentials().is_none());
    }

    #[test]
    fn test_display_location_hides_password() {
        let db = DatabaseConfig {
            username: Some("admin".to_string()),
            password: Some(secret_string("hunter2".to_string())),
            ..DatabaseConfig::default()
        };
        let location = db.display_location();
        assert_eq!(location, "//admin@localhost:5432/xcok-ambulance-wl/ambulance");
        assert!(!location.contains("hunter2"));
    }

    #[test]
    fn test_invalid_collection_name() {
        let db = DatabaseConfig {
            collection: "ambulance; DROP TABLE x".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
        assert!(is_valid_collection_name("ambulance-wl_2"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AmbulanceConfig::default();
        config.database.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AmbulanceConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = AmbulanceConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_target_parse() {
        assert_eq!("Memory".parse::<DatabaseTarget>(), Ok(DatabaseTarget::Memory));
        assert_eq!("postgres".parse::<DatabaseTarget>(), Ok(DatabaseTarget::PostgreSQL));
        assert!("mongodb".parse::<DatabaseTarget>().is_err());
    }

    #[test]
    fn test_environment_parse_lenient() {
        assert_eq!(Environment::parse_lenient("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse_lenient("whatever"), Environment::Development);
    }
}
