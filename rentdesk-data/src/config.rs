//! Backend configuration: a TOML file plus environment overrides.
//!
//! ```toml
//! url = "https://project.example.co"
//! api_key = "service-role-key"
//! storage_bucket = "attachments"
//! timeout_secs = 30
//! max_strikes = 3
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_URL: &str = "RENTDESK_BACKEND_URL";
pub const ENV_API_KEY: &str = "RENTDESK_API_KEY";
pub const ENV_BUCKET: &str = "RENTDESK_STORAGE_BUCKET";
pub const ENV_MAX_STRIKES: &str = "RENTDESK_MAX_STRIKES";

/// Connection settings and policy thresholds for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend project.
    #[serde(default)]
    pub url: String,
    /// Key sent as `apikey` and bearer token.
    #[serde(default)]
    pub api_key: String,
    /// Object storage bucket holding contract and bill attachments.
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Clients with more strikes than this are hidden and cannot be deleted.
    #[serde(default = "default_max_strikes")]
    pub max_strikes: u32,
}

fn default_bucket() -> String {
    "attachments".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_strikes() -> u32 {
    3
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            storage_bucket: default_bucket(),
            timeout_secs: default_timeout_secs(),
            max_strikes: default_max_strikes(),
        }
    }
}

impl BackendConfig {
    /// Read `path`, apply the process environment, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        config.with_env(|key| std::env::var(key).ok())?.validated()
    }

    /// Build from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default()
            .with_env(|key| std::env::var(key).ok())?
            .validated()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(bucket) = lookup(ENV_BUCKET) {
            self.storage_bucket = bucket;
        }
        if let Some(raw) = lookup(ENV_MAX_STRIKES) {
            self.max_strikes = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    key: ENV_MAX_STRIKES,
                    value: raw,
                })?;
        }
        Ok(self)
    }

    /// Reject settings the client cannot work with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("url"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
