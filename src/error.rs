//! Error types for arm-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for arm-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Remote Errors
    // ============================================================================
    /// The service could not be reached (connect failure, timeout, 5xx)
    #[error("Remote service unavailable: {message}")]
    RemoteUnavailable { message: String },

    /// The service rejected the request (bad parameters, forbidden, ...)
    #[error("Request rejected with HTTP {status} ({code}): {message}")]
    RemoteRejected {
        status: u16,
        code: String,
        message: String,
    },

    /// A point lookup found no matching record
    #[error("Resource '{resource}' not found")]
    NotFound { resource: String },

    /// The service handed back a continuation token it had already issued
    #[error("Continuation token repeated: {token}")]
    RepeatedToken { token: String },

    // ============================================================================
    // Materialization Errors
    // ============================================================================
    /// A record value could not be coerced to the declared field type
    #[error("Schema mismatch at '{path}': expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A post-materialization hook rejected the object
    #[error("Hook for {type_name} failed: {source}")]
    Hook {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid resource id '{id}': {message}")]
    InvalidResourceId { id: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a remote-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Create a remote-rejected error
    pub fn rejected(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid resource id error
    pub fn invalid_resource_id(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResourceId {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from the remote service
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::RemoteUnavailable { .. } | Error::RemoteRejected { .. }
        )
    }

    /// Check if this error is a failed point lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias for arm-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
