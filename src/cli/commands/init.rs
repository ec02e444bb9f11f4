//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ambulance-wl.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing ambulance waiting list configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put the database password in .env as AMBULANCE_API_DB_PASSWORD");
                println!("  3. Validate configuration: ambulance-wl validate-config");
                println!("  4. Start the service: ambulance-wl serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

/// Sample configuration with every setting at its default
fn sample_config() -> &'static str {
    r#"# Ambulance waiting list service configuration
#
# Every value can be overridden with an AMBULANCE_API_* environment variable.
# ${VAR} references are replaced with environment variable values.

# development, staging or production (CORS is disabled in production)
environment = "development"

[application]
# trace, debug, info, warn, error
log_level = "info"

[server]
host = "0.0.0.0"
port = 8080

[database]
# postgresql or memory
target = "postgresql"
host = "localhost"
port = 5432
database = "xcok-ambulance-wl"
collection = "ambulance"
# Authentication is used only when both username and password are set
# username = "ambulance"
# password = "${AMBULANCE_API_DB_PASSWORD}"
timeout_seconds = 10
max_connections = 10

[logging]
local_enabled = false
local_path = "logs"
# daily, hourly or never
local_rotation = "daily"
"#
}
