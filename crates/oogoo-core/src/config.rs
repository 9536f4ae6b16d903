use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::credentials::DriveCredentials;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if the credential blob is missing or malformed, or
/// if any numeric value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if the credential blob is missing or malformed, or
/// if any numeric value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    // The credential blob is the one hard requirement: without it the output
    // has no destination, so the run must refuse to start.
    let raw_credentials = require("OOGOO_GCLOUD_KEY_JSON")?;
    let drive: DriveCredentials =
        serde_json::from_str(&raw_credentials).map_err(|e| ConfigError::InvalidEnvVar {
            var: "OOGOO_GCLOUD_KEY_JSON".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("OOGOO_LOG_LEVEL", "info");
    let pages_per_category = parse_u32("OOGOO_PAGES_PER_CATEGORY", "2")?;
    let max_concurrent_walks = parse_usize("OOGOO_MAX_CONCURRENT_WALKS", "5")?;
    let max_retries = parse_u32("OOGOO_MAX_RETRIES", "3")?;
    let card_delay_ms = parse_u64("OOGOO_CARD_DELAY_MS", "1000")?;
    let detail_settle_ms = parse_u64("OOGOO_DETAIL_SETTLE_MS", "2000")?;
    let selector_timeout_secs = parse_u64("OOGOO_SELECTOR_TIMEOUT_SECS", "10")?;
    let description_timeout_secs = parse_u64("OOGOO_DESCRIPTION_TIMEOUT_SECS", "30")?;
    let navigation_timeout_secs = parse_u64("OOGOO_NAVIGATION_TIMEOUT_SECS", "300")?;
    let user_agent = or_default("OOGOO_USER_AGENT", "oogoo-harvest/0.1 (listing-collection)");
    let output_dir = PathBuf::from(or_default("OOGOO_OUTPUT_DIR", "."));

    Ok(AppConfig {
        drive,
        log_level,
        pages_per_category,
        max_concurrent_walks,
        max_retries,
        card_delay_ms,
        detail_settle_ms,
        selector_timeout_secs,
        description_timeout_secs,
        navigation_timeout_secs,
        user_agent,
        output_dir,
    })
}
