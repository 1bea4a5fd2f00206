//! HTTP client for Azure Resource Manager
//!
//! Provides a thin reqwest wrapper that handles:
//! - Bearer token and user agent on every request
//! - Endpoint-relative URL building
//! - Classification of failures into unavailable / rejected

use crate::error::{Error, Result};
use crate::types::JsonValue;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public ARM endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Configuration for the ARM client
#[derive(Clone)]
pub struct ArmClientConfig {
    /// Management endpoint, e.g. `https://management.azure.com`
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Already issued bearer token
    pub access_token: Option<String>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ArmClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            access_token: None,
            default_headers: HashMap::new(),
            user_agent: format!("arm-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ArmClientConfig {
    /// Create a new config builder
    pub fn builder() -> ArmClientConfigBuilder {
        ArmClientConfigBuilder::default()
    }
}

impl std::fmt::Debug for ArmClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("has_access_token", &self.access_token.is_some())
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for ARM client config
#[derive(Default)]
pub struct ArmClientConfigBuilder {
    config: ArmClientConfig,
}

impl ArmClientConfigBuilder {
    /// Set the management endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the bearer token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ArmClientConfig {
        self.config
    }
}

/// ARM error envelope: `{ "error": { "code": "...", "message": "..." } }`
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// HTTP client for ARM management endpoints
#[derive(Clone)]
pub struct ArmClient {
    client: Client,
    config: ArmClientConfig,
    endpoint: Url,
}

impl ArmClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ArmClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ArmClientConfig) -> Result<Self> {
        let endpoint = Url::parse(config.endpoint.trim())?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint must be http(s), got '{}'",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Management endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Client configuration
    pub fn config(&self) -> &ArmClientConfig {
        &self.config
    }

    /// Build an absolute URL for a path under the endpoint
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Resolve a continuation link; absolute links are used verbatim
    ///
    /// Links to another origin are followed without the bearer token.
    pub fn resolve_link(&self, link: &str) -> Result<Url> {
        match Url::parse(link) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.url_for(link),
            Err(e) => Err(e.into()),
        }
    }

    /// GET a URL and return the raw response after status classification
    ///
    /// Returns `Ok(None)` for a 404 when `allow_missing` is set.
    pub async fn get(&self, url: Url, allow_missing: bool) -> Result<Option<Response>> {
        let mut req = self.client.get(url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(token) = &self.config.access_token {
            if url.origin() == self.endpoint.origin() {
                req = req.bearer_auth(token);
            } else {
                debug!("Not sending credentials to {}", url.origin().ascii_serialization());
            }
        }

        debug!("GET {url}");
        let response = req.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(Some(response));
        }

        if allow_missing && status == StatusCode::NOT_FOUND {
            debug!("GET {url}: not found");
            return Ok(None);
        }

        let body = response.text().await.unwrap_or_default();
        let err = classify_status(status, &body);
        warn!("GET {url} failed: {err}");
        Err(err)
    }

    /// GET a URL and parse the JSON body
    pub async fn get_json(&self, url: Url, allow_missing: bool) -> Result<Option<JsonValue>> {
        let Some(response) = self.get(url, allow_missing).await? else {
            return Ok(None);
        };
        let body = response.text().await.map_err(transport_error)?;
        Ok(Some(serde_json::from_str(&body)?))
    }
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map a transport failure (connect, timeout, broken body) to `RemoteUnavailable`
fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::unavailable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        Error::unavailable(format!("connection failed: {e}"))
    } else {
        Error::unavailable(e.to_string())
    }
}

/// Map a non-success status to an error, reading the ARM error envelope
pub(crate) fn classify_status(status: StatusCode, body: &str) -> Error {
    let ErrorBody { code, message } = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .unwrap_or_default();

    if status.is_server_error() {
        let detail = if message.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("HTTP {}: {message}", status.as_u16())
        };
        return Error::unavailable(detail);
    }

    let code = if code.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown")
            .replace(' ', "")
    } else {
        code
    };
    let message = if message.is_empty() {
        body.trim().to_string()
    } else {
        message
    };
    Error::rejected(status.as_u16(), code, message)
}
