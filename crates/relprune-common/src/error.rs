//! Error types and utilities for relprune

use std::fmt;
use thiserror::Error;

/// Result type alias for relprune operations
pub type Result<T> = std::result::Result<T, PruneError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for relprune operations
#[derive(Error, Debug)]
pub enum PruneError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong.
        message: String,
        /// Offending setting, if known.
        field: Option<String>,
    },

    /// Authentication errors (missing or rejected token)
    #[error("Auth error: {message}")]
    Auth {
        /// Why the token was refused.
        message: String,
    },

    /// The API answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or the canonical reason.
        message: String,
    },

    /// Connection could not be established or timed out
    #[error("Connection error: {message}")]
    Connection {
        /// What failed.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxError>,
    },

    /// Any other transport failure
    #[error("Network error: {message}")]
    Network {
        /// What failed.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxError>,
    },

    /// A payload had the wrong shape
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache file errors
    #[error("Cache error: {message}")]
    Cache {
        /// What failed.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxError>,
    },
}

/// Coarse classification used when a failure is logged and absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Non-2xx response.
    Status,
    /// Connect failure or timeout.
    Connection,
    /// Everything else.
    Unknown,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Connection => "connection",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl PruneError {
    /// Create a new configuration error naming the offending field
    pub fn config_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth {
            message: msg.into(),
        }
    }

    /// Create a new status error
    pub fn status(status: u16, msg: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: msg.into(),
        }
    }

    /// Create a new connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new connection error with source
    pub fn connection_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new payload-shape error
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Create a new cache error with source
    pub fn cache_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Cache {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Classify this error for logging.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Status { .. } => ErrorClass::Status,
            Self::Connection { .. } => ErrorClass::Connection,
            _ => ErrorClass::Unknown,
        }
    }

    /// HTTP status code, if this is a status error.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convert from reqwest::Error to PruneError
impl From<reqwest::Error> for PruneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() {
            let status = err.status().map_or(0, |s| s.as_u16());
            let reason = err
                .status()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("unexpected status");
            Self::status(status, reason)
        } else if err.is_timeout() {
            Self::connection_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::connection_with_source("Connection failed", err)
        } else if err.is_decode() {
            Self::network_with_source("Failed to decode response body", err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}
