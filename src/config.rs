// src/config.rs

//! Configuration loading utilities.
//!
//! Tunables are read from an optional TOML file, then the environment fills
//! in the secrets and blob locations. Everything is resolved once at process
//! start; the resulting [`Config`] is passed explicitly to each component.
//!
//! ## Environment Variables
//!
//! Required:
//! - `BING_MAPS_KEY`: local-search API key
//! - `STORAGE_CONNECTION`: `file:///abs/dir` or `s3://[region]`
//! - `EXCEL_CONTAINER`: container (directory or bucket) name
//! - `EXCEL_FILENAME`: input spreadsheet blob name
//!
//! Optional:
//! - `LOOKUP_ENDPOINT`, `LOOKUP_TIMEOUT_SECS`, `LOOKUP_USER_AGENT`
//! - `MAX_ROWS`, `OUTPUT_FILENAME`

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

pub const ENV_API_KEY: &str = "BING_MAPS_KEY";
pub const ENV_STORAGE_CONNECTION: &str = "STORAGE_CONNECTION";
pub const ENV_CONTAINER: &str = "EXCEL_CONTAINER";
pub const ENV_INPUT_FILE: &str = "EXCEL_FILENAME";

/// Load configuration from the process environment.
///
/// `settings_path` points at an optional TOML file with tunables; a missing
/// file means defaults.
pub fn load_from_env(settings_path: Option<&Path>) -> Result<Config> {
    load_with(settings_path, |key| std::env::var(key).ok())
}

/// Load configuration reading variables through `var`.
pub fn load_with<F>(settings_path: Option<&Path>, var: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match settings_path {
        Some(path) if path.exists() => Config::load(path)?,
        Some(path) => {
            log::info!("No settings file at {:?}, using defaults", path);
            Config::default()
        }
        None => Config::default(),
    };

    let required = |key: &str| -> Result<String> {
        var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::config(format!("Missing required setting {key}")))
    };

    config.lookup.api_key = required(ENV_API_KEY)?;
    config.storage.connection = required(ENV_STORAGE_CONNECTION)?;
    config.storage.container = required(ENV_CONTAINER)?;
    config.storage.input_file = required(ENV_INPUT_FILE)?;

    // Override from environment if available
    if let Some(endpoint) = var("LOOKUP_ENDPOINT") {
        config.lookup.endpoint = endpoint;
    }

    if let Some(timeout) = var("LOOKUP_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse() {
            config.lookup.timeout_secs = secs;
        }
    }

    if let Some(agent) = var("LOOKUP_USER_AGENT") {
        config.lookup.user_agent = agent;
    }

    if let Some(rows) = var("MAX_ROWS") {
        if let Ok(n) = rows.parse() {
            config.pipeline.max_rows = n;
        }
    }

    if let Some(name) = var("OUTPUT_FILENAME") {
        config.pipeline.output_file = name;
    }

    config.validate()?;
    Ok(config)
}
