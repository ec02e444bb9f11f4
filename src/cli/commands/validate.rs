//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the service configuration file.

use crate::config::load_config;
use crate::config::schema::{AmbulanceConfig, DatabaseTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// The file must exist; environment overrides are applied before
    /// validation just as they are for `serve`.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                for line in summary(&config) {
                    println!("  {line}");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

/// Human-readable summary lines; never includes the password
fn summary(config: &AmbulanceConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Environment: {:?}", config.environment),
        format!("Log Level: {}", config.application.log_level),
        format!("Listen Address: {}", config.server.bind_address()),
    ];

    match config.database.target {
        DatabaseTarget::PostgreSQL => {
            lines.push("Database Target: PostgreSQL".to_string());
            lines.push(format!("Location: {}", config.database.display_location()));
            lines.push(format!(
                "Authentication: {}",
                if config.database.credentials().is_some() {
                    "username/password"
                } else {
                    "none"
                }
            ));
            lines.push(format!("Max Connections: {}", config.database.max_connections));
        }
        DatabaseTarget::Memory => {
            lines.push("Database Target: in-memory (data is lost on exit)".to_string());
            lines.push(format!("Collection: {}", config.database.collection));
        }
    }
    lines.push(format!("Timeout: {}s", config.database.timeout_seconds));
    lines
}
