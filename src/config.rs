//! Client configuration
//!
//! Settings are read from an optional YAML or JSON file, then overridden by
//! environment variables, then by command line flags.

use crate::error::{Error, Result};
use crate::http::{ArmClientConfig, DEFAULT_ENDPOINT};
use crate::pagination::DEFAULT_MAX_RECORDS;
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Overrides `endpoint`
pub const ENV_ENDPOINT: &str = "ARM_ENDPOINT";
/// Overrides `subscription_id`
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
/// Overrides `access_token`
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";

// ============================================================================
// Client Config
// ============================================================================

/// Settings shared by every command
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Management endpoint
    pub endpoint: String,

    /// Subscription commands run against
    pub subscription_id: Option<String>,

    /// Already issued bearer token
    pub access_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum records per listing when `--max` is not given
    pub default_max: usize,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subscription_id: None,
            access_token: None,
            timeout_secs: default_timeout(),
            default_max: DEFAULT_MAX_RECORDS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("arm-pager/{}", env!("CARGO_PKG_VERSION"))
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .field("has_access_token", &self.access_token.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .field("default_max", &self.default_max)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Load from file (if given) and apply environment overrides
    ///
    /// Not validated: callers apply their own overrides first, then call
    /// [`ClientConfig::validate`].
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Load from a YAML or JSON file; `.json` files are parsed as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    #[must_use]
    pub fn with_env_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = var(ENV_ENDPOINT).none_if_blank() {
            self.endpoint = endpoint;
        }
        if let Some(subscription) = var(ENV_SUBSCRIPTION_ID).none_if_blank() {
            self.subscription_id = Some(subscription);
        }
        if let Some(token) = var(ENV_ACCESS_TOKEN).none_if_blank() {
            self.access_token = Some(token);
        }
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::config("endpoint cannot be empty"));
        }
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(Error::config(format!(
                "endpoint must start with http:// or https://, got '{endpoint}'"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.default_max == 0 {
            return Err(Error::config("default_max must be greater than zero"));
        }
        Ok(())
    }

    /// Subscription ID, required by subscription-scoped commands
    pub fn require_subscription(&self) -> Result<&str> {
        self.subscription_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                Error::missing_field(format!("subscription_id (or {ENV_SUBSCRIPTION_ID})"))
            })
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the HTTP client
    pub fn client_config(&self) -> ArmClientConfig {
        let mut builder = ArmClientConfig::builder()
            .endpoint(self.endpoint.trim())
            .timeout(self.timeout())
            .user_agent(&self.user_agent);
        if let Some(token) = &self.access_token {
            builder = builder.access_token(token);
        }
        builder.build()
    }
}
