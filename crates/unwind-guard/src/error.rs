//! Error types for unwind-guard

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::exception::Exception;

/// Result type alias for unwind-guard configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading guard configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A panic intercepted by the guard, re-expressed as a plain error value.
///
/// `domain` and `code` come from the exception name and code, `message`
/// from its reason and `detail` is the exception's user info, unchanged.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{domain}: {message}")]
pub struct GuardError {
    /// Exception name
    pub domain: String,

    /// Optional numeric code carried by the exception
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    /// Human-readable reason
    pub message: String,

    /// Auxiliary key/value information
    #[serde(default)]
    pub detail: Map<String, Value>,

    /// `file:line:column` where the panic started, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl GuardError {
    /// Look up a single detail entry
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.detail.get(key)
    }

    pub(crate) fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}

impl From<Exception> for GuardError {
    fn from(exception: Exception) -> Self {
        Self {
            domain: exception.name,
            code: exception.code,
            message: exception.reason,
            detail: exception.user_info,
            location: None,
        }
    }
}
