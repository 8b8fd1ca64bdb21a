//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
///
/// Tunables come from an optional TOML file; the key, storage credential,
/// container and input file are filled from the environment at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search API settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Blob storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Row selection and output naming
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.lookup.api_key.trim().is_empty() {
            return Err(AppError::config("lookup API key is empty"));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(AppError::config("lookup.timeout_secs must be > 0"));
        }
        if self.lookup.user_agent.trim().is_empty() {
            return Err(AppError::config("lookup.user_agent is empty"));
        }
        let endpoint = Url::parse(&self.lookup.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "lookup.endpoint must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }
        if self.storage.connection.trim().is_empty() {
            return Err(AppError::config("storage connection is empty"));
        }
        if self.storage.container.trim().is_empty() {
            return Err(AppError::config("storage.container is empty"));
        }
        if self.storage.input_file.trim().is_empty() {
            return Err(AppError::config("storage.input_file is empty"));
        }
        if self.pipeline.output_file.trim().is_empty() {
            return Err(AppError::config("pipeline.output_file is empty"));
        }
        if self.pipeline.max_rows == 0 {
            return Err(AppError::config("pipeline.max_rows must be > 0"));
        }
        Ok(())
    }
}

/// Local-search API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Search endpoint queried once per organisation
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// API key, sent as the `key` query parameter
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            api_key: String::new(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Blob storage location of the input and output artifacts.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Connection URL: `file:///root/dir` or `s3://[region]`
    #[serde(default, skip_serializing)]
    pub connection: String,

    /// Container (directory or bucket) holding both blobs
    #[serde(default)]
    pub container: String,

    /// Name of the input spreadsheet blob
    #[serde(default)]
    pub input_file: String,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("connection", &redact(&self.connection))
            .field("container", &self.container)
            .field("input_file", &self.input_file)
            .finish()
    }
}

/// Row selection and output naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of organisations looked up per run
    #[serde(default = "defaults::max_rows")]
    pub max_rows: usize,

    /// Name of the CSV blob written back to the container
    #[serde(default = "defaults::output_file")]
    pub output_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rows: defaults::max_rows(),
            output_file: defaults::output_file(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

mod defaults {
    pub fn endpoint() -> String {
        "https://dev.virtualearth.net/REST/v1/LocalSearch/".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; nonprofit-lookup/0.1)".into()
    }
    pub fn max_rows() -> usize {
        200
    }
    pub fn output_file() -> String {
        "NonprofitLookupResults.csv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> Config {
        let mut config = Config::default();
        config.lookup.api_key = "secret".to_string();
        config.storage.connection = "file:///tmp/blobs".to_string();
        config.storage.container = "nonprofits".to_string();
        config.storage.input_file = "Vereine.xlsx".to_string();
        config
    }

    #[test]
    fn validate_complete_config_ok() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_key() {
        let mut config = complete_config();
        config.lookup.api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_row_cap() {
        let mut config = complete_config();
        config.pipeline.max_rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let mut config = complete_config();
        config.lookup.endpoint = "ftp://example.com/search".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_match_output_contract() {
        let config = Config::default();
        assert_eq!(config.pipeline.max_rows, 200);
        assert_eq!(config.pipeline.output_file, "NonprofitLookupResults.csv");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", complete_config());
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("/tmp/blobs"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn toml_tunables_parse_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [lookup]
            timeout_secs = 5

            [pipeline]
            max_rows = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.lookup.timeout_secs, 5);
        assert_eq!(config.pipeline.max_rows, 10);
        assert_eq!(config.pipeline.output_file, "NonprofitLookupResults.csv");
        assert!(config.lookup.api_key.is_empty());
    }
}
