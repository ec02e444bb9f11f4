//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AmbulanceConfig, DatabaseTarget, Environment};
use super::secret::secret_string;
use crate::domain::errors::AmbulanceError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AmbulanceConfig
/// 4. Applies environment variable overrides (AMBULANCE_API_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, a referenced
/// environment variable is unset, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ambulance_wl::config::loader::load_config;
///
/// let config = load_config("ambulance-wl.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AmbulanceConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AmbulanceError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AmbulanceError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: AmbulanceConfig = toml::from_str(&contents)
        .map_err(|e| AmbulanceError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration from a TOML file if it exists, otherwise from defaults
///
/// Environment overrides and validation are applied in both cases, so the
/// service can be configured through the environment alone.
///
/// # Errors
///
/// Same as [`load_config`], except that a missing file is not an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AmbulanceConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    finish(AmbulanceConfig::default())
}

fn finish(mut config: AmbulanceConfig) -> Result<AmbulanceConfig> {
    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        AmbulanceError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AmbulanceError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|m| m == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AmbulanceError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Parses a numeric override, keeping the current value when it is invalid
fn parse_override<T: FromStr + Copy + std::fmt::Display>(name: &str, value: &str, current: T) -> T {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(
                variable = name,
                value,
                fallback = %current,
                "Invalid numeric value in environment override"
            );
            current
        }
    }
}

/// Applies environment variable overrides using the AMBULANCE_API_* prefix
fn apply_env_overrides(config: &mut AmbulanceConfig) {
    if let Ok(val) = std::env::var("AMBULANCE_API_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_ENVIRONMENT") {
        config.environment = Environment::parse_lenient(&val);
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_PORT") {
        config.server.port = parse_override("AMBULANCE_API_PORT", &val, config.server.port);
    }

    let db = &mut config.database;
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_TARGET") {
        match val.parse::<DatabaseTarget>() {
            Ok(target) => db.target = target,
            Err(e) => tracing::warn!(error = %e, "Ignoring AMBULANCE_API_DB_TARGET"),
        }
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_HOST") {
        db.host = val;
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_PORT") {
        db.port = parse_override("AMBULANCE_API_DB_PORT", &val, db.port);
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_DATABASE") {
        db.database = val;
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_COLLECTION") {
        db.collection = val;
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_USERNAME") {
        db.username = Some(val);
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_PASSWORD") {
        db.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("AMBULANCE_API_DB_TIMEOUT_SECONDS") {
        db.timeout_seconds =
            parse_override("AMBULANCE_API_DB_TIMEOUT_SECONDS", &val, db.timeout_seconds);
    }
}
