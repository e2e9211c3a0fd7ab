//! Environment-driven configuration for the competitor intelligence crates.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration shared by the competitor intelligence modules.
#[derive(Debug, Clone)]
pub struct IntelConfig {
    /// Base URL of the campaign-management REST backend, e.g.
    /// `https://api.example.com/api`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Region applied when a search or watchlist item does not specify one.
    pub default_region: String,
    /// Result limit applied when a search does not specify one.
    pub default_limit: u32,
    /// Path of the JSON file backing the persisted watchlist.
    pub watchlist_path: PathBuf,
    pub log_level: String,
}

/// Load configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<IntelConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config_from_env() -> Result<IntelConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<IntelConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = require("ADINTEL_API_BASE_URL")?;

    let request_timeout_secs = parse_u64("ADINTEL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ADINTEL_USER_AGENT", "adintel/0.1 (competitor-intelligence)");
    let default_region = or_default("ADINTEL_DEFAULT_REGION", "US");
    let default_limit = parse_u32("ADINTEL_DEFAULT_LIMIT", "5")?;
    let watchlist_path = PathBuf::from(or_default(
        "ADINTEL_WATCHLIST_PATH",
        "./competitor_watchlist.json",
    ));
    let log_level = or_default("ADINTEL_LOG_LEVEL", "info");

    Ok(IntelConfig {
        api_base_url,
        request_timeout_secs,
        user_agent,
        default_region,
        default_limit,
        watchlist_path,
        log_level,
    })
}
