//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`STREAMGATE_API_BASE`, `STREAMGATE_AUTH_TOKEN`)
//! 2. TOML file supplied by the embedder
//! 3. Built-in defaults
//!
//! Only the submission gate consumes configuration; routing and decision
//! aggregation are pure in-memory concerns.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_API_BASE: &str = "http://localhost:8065/plugins/streamgate/api/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the submission gate's HTTP client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL the bulk tool-execution endpoint hangs off.
    pub api_base: String,
    /// Bearer token attached to outbound requests when present.
    pub auth_token: Option<String>,
    /// Per-request timeout for the submission POST.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            auth_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// TOML file shape; every field optional so partial files layer over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_base: Option<String>,
    auth_token: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Load configuration, layering an optional TOML file and the environment
/// over defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(path) = path {
        let raw = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&raw)?;
        if let Some(api_base) = file.api_base {
            config.api_base = api_base;
        }
        if file.auth_token.is_some() {
            config.auth_token = file.auth_token;
        }
        if let Some(timeout) = file.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
    }

    if let Ok(api_base) = std::env::var("STREAMGATE_API_BASE") {
        if !api_base.trim().is_empty() {
            config.api_base = api_base;
        }
    }
    if let Ok(token) = std::env::var("STREAMGATE_AUTH_TOKEN") {
        if !token.trim().is_empty() {
            config.auth_token = Some(token);
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api_base.trim().is_empty() {
        return Err(ConfigError::Invalid("api_base must not be empty".into()));
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "request_timeout_secs must be positive".into(),
        ));
    }
    Ok(())
}
