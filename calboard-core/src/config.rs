//! calboard configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_API_URL, DEFAULT_LOG_FILTER, DEFAULT_REQUEST_TIMEOUT, ENV_PREFIX};
use crate::error::{CalboardError, CalboardResult};

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> String {
    humantime::format_duration(DEFAULT_REQUEST_TIMEOUT).to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Configuration at ~/.config/calboard/config.toml, overridable with
/// `CALBOARD_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalboardConfig {
    /// Base endpoint of the event store.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout, e.g. "10s" or "1m 30s".
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    /// `tracing` filter used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for CalboardConfig {
    fn default() -> Self {
        CalboardConfig {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            log_filter: default_log_filter(),
        }
    }
}

impl CalboardConfig {
    pub fn config_path() -> CalboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalboardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file means defaults.
    pub fn load() -> CalboardResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CalboardResult<Self> {
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> CalboardResult<Self> {
        let config: CalboardConfig = builder
            .build()
            .map_err(|e| CalboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalboardError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CalboardResult<()> {
        self.api_url()?;
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            CalboardError::Config(format!(
                "Invalid request_timeout '{}': {e}",
                self.request_timeout
            ))
        })?;
        Ok(())
    }

    /// The store endpoint. Must be an absolute http(s) URL.
    pub fn api_url(&self) -> CalboardResult<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| CalboardError::Config(format!("Invalid api_url '{}': {e}", self.api_url)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CalboardError::Config(format!(
                "Invalid api_url '{}': unsupported scheme '{other}'",
                self.api_url
            ))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        humantime::parse_duration(&self.request_timeout).unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalboardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# Event store endpoint:
# api_url = \"{}\"

# Give up on a request after:
# request_timeout = \"{}\"

# Log filter when RUST_LOG is not set:
# log_filter = \"{}\"
",
            DEFAULT_API_URL,
            default_request_timeout(),
            DEFAULT_LOG_FILTER
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
