//! Typed panic payloads
//!
//! An [`Exception`] is what guarded code throws when it wants the guard to
//! report a specific name, reason and auxiliary info. Plain `panic!` calls
//! are caught too and normalised by [`Exception::from_panic`].

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reason reported for panic payloads that are neither an [`Exception`]
/// nor a string.
pub const UNKNOWN_PANIC_REASON: &str = "unknown panic";

/// A panic payload carrying an identifying name and a reason
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{name}: {reason}")]
pub struct Exception {
    /// Identifying name, e.g. `InvalidArgument`
    pub name: String,

    /// Human-readable reason
    pub reason: String,

    /// Optional numeric code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    /// Auxiliary key/value information
    #[serde(default)]
    pub user_info: Map<String, Value>,
}

impl Exception {
    /// Create a new exception with no code and empty user info
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            code: None,
            user_info: Map::new(),
        }
    }

    /// Set the numeric code
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Add one user info entry
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user_info.insert(key.into(), value.into());
        self
    }

    /// Replace the user info map
    pub fn with_user_info(mut self, user_info: Map<String, Value>) -> Self {
        self.user_info = user_info;
        self
    }

    /// Throw this exception by unwinding with it as the panic payload.
    ///
    /// Inside [`run`](crate::run) or [`catch`](crate::catch) the guard
    /// recovers the exception intact. Anywhere else this is an ordinary
    /// panic.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }

    /// Normalise a caught panic payload.
    ///
    /// `Exception` payloads are returned as-is. `&str` and `String`
    /// payloads (from `panic!`) become an exception named `panic_domain`
    /// with the message as reason. Anything else gets
    /// [`UNKNOWN_PANIC_REASON`].
    pub fn from_panic(payload: Box<dyn Any + Send>, panic_domain: &str) -> Self {
        let payload = match payload.downcast::<Exception>() {
            Ok(exception) => return *exception,
            Err(other) => other,
        };

        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            UNKNOWN_PANIC_REASON.to_string()
        };

        Self::new(panic_domain, reason)
    }
}
