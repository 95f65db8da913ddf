//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are not in the environment, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every successful load is validated with [`WecomConfig::validate`].
//!
//! ## Environment Variables
//! - `WECOM_CORP_ID`: Corp id (required)
//! - `WECOM_CORP_SECRET`: Application secret (required)
//! - `WECOM_API_BASE_URL`: Server API base URL
//! - `WECOM_OAUTH_BASE_URL`: OAuth host base URL
//! - `WECOM_TIMEOUT_SECS`: Request timeout in seconds
//! - `WECOM_MAX_ATTEMPTS`: Attempts per request for transport failures
//! - `WECOM_DEBUG`: Append `debug=1` to requests (true/false)
//! - `WECOM_REFRESH_THRESHOLD_SECS`: Refresh tokens this long before expiry
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./wecom.json` or `./wecom.toml`
//! 2. `./config.json` or `./config.toml`
//! 3. `../wecom.json` or `../wecom.toml`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use wecom_domain::{Result, WecomConfig, WecomError};

pub const ENV_CORP_ID: &str = "WECOM_CORP_ID";
pub const ENV_CORP_SECRET: &str = "WECOM_CORP_SECRET";
pub const ENV_API_BASE_URL: &str = "WECOM_API_BASE_URL";
pub const ENV_OAUTH_BASE_URL: &str = "WECOM_OAUTH_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WECOM_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "WECOM_MAX_ATTEMPTS";
pub const ENV_DEBUG: &str = "WECOM_DEBUG";
pub const ENV_REFRESH_THRESHOLD_SECS: &str = "WECOM_REFRESH_THRESHOLD_SECS";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `WecomError::Config` if no source yields a valid configuration.
pub fn load() -> Result<WecomConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `WecomError::Config` if the credentials are missing or an
/// optional variable has an invalid value.
pub fn load_from_env() -> Result<WecomConfig> {
    let mut config = WecomConfig::new(env_var(ENV_CORP_ID)?, env_var(ENV_CORP_SECRET)?);

    if let Some(url) = env_opt(ENV_API_BASE_URL) {
        config.api_base_url = url;
    }
    if let Some(url) = env_opt(ENV_OAUTH_BASE_URL) {
        config.oauth_base_url = url;
    }
    if let Some(timeout) = env_parse(ENV_TIMEOUT_SECS)? {
        config.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse(ENV_MAX_ATTEMPTS)? {
        config.max_attempts = attempts;
    }
    if let Some(threshold) = env_parse(ENV_REFRESH_THRESHOLD_SECS)? {
        config.refresh_threshold_secs = threshold;
    }
    config.debug = env_bool(ENV_DEBUG, false);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `WecomError::Config` if the file is missing, malformed or fails
/// validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<WecomConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WecomError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WecomError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WecomError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<WecomConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WecomError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WecomError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WecomError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_in(&cwd)
}

fn probe_in(dir: &Path) -> Option<PathBuf> {
    [
        "wecom.json",
        "wecom.toml",
        "config.json",
        "config.toml",
        "../wecom.json",
        "../wecom.toml",
    ]
    .iter()
    .map(|name| dir.join(name))
    .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        WecomError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| WecomError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
