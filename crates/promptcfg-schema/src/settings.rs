//! Schema source configuration.
//!
//! Where the schema comes from is configuration, not code: a local,
//! pre-provisioned file checked first, and a canonical remote URL used
//! only as a fallback, bounded by a fetch timeout. Defaults point at the
//! repository's `schemas/` copy and the published upstream schema.
//! Override via environment variables or explicit construction.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Canonical published location of the prompt configuration schema.
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/JanDeDobbeleer/oh-my-posh/main/themes/schema.json";

/// Default pre-provisioned schema location, relative to the working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/prompt.schema.json";

/// Default bound on the remote schema fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to acquire the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSettings {
    /// Local schema file, tried first.
    pub local_path: PathBuf,
    /// Remote canonical schema URL, tried when the local file is unusable.
    pub remote_url: Url,
    /// Timeout for the remote fetch. Exceeding it is a load failure.
    pub fetch_timeout: Duration,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            remote_url: default_remote_url(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl SchemaSettings {
    /// Load settings from environment variables.
    ///
    /// Variables:
    /// - `PROMPTCFG_SCHEMA_PATH` (default: `schemas/prompt.schema.json`)
    /// - `PROMPTCFG_SCHEMA_URL` (default: the upstream raw GitHub schema)
    /// - `PROMPTCFG_FETCH_TIMEOUT_SECS` (default: 10)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `PROMPTCFG_SCHEMA_URL` is set
    /// but does not parse, and [`ConfigError::InvalidTimeout`] if the
    /// timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let local_path = std::env::var("PROMPTCFG_SCHEMA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCHEMA_PATH));

        let remote_url = match std::env::var("PROMPTCFG_SCHEMA_URL") {
            Ok(raw) => parse_url("PROMPTCFG_SCHEMA_URL", &raw)?,
            Err(_) => default_remote_url(),
        };

        let fetch_timeout = match std::env::var("PROMPTCFG_FETCH_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Self {
            local_path,
            remote_url,
            fetch_timeout,
        })
    }

    /// Replace the local schema path.
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = path.into();
        self
    }

    /// Replace the remote URL from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `raw` is not a valid URL.
    pub fn with_remote_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.remote_url = parse_url("remote_url", raw)?;
        Ok(self)
    }

    /// Replace the fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

fn default_remote_url() -> Url {
    // The constant is a well-formed absolute URL.
    Url::parse(DEFAULT_SCHEMA_URL).unwrap_or_else(|e| unreachable!("{DEFAULT_SCHEMA_URL}: {e}"))
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid fetch timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}
