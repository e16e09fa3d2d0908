//! Guarded execution
//!
//! [`ExceptionGuard`] invokes a work item once, on the calling thread,
//! inside `catch_unwind`. A panic raised by the work item is converted to
//! a [`GuardError`] and returned; it never unwinds past the guard.
//!
//! The work item is wrapped in `AssertUnwindSafe`. Callers that share
//! mutable state with it are responsible for that state being usable
//! after a failure.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::exception::Exception;
use crate::hook::Scope;

/// Result of one guarded invocation
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome {
    /// The work item returned normally
    Success,

    /// The work item panicked
    Failure(GuardError),
}

impl Outcome {
    /// Whether the work item returned normally
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Whether the work item panicked
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The error, if the work item panicked
    pub fn error(&self) -> Option<&GuardError> {
        match self {
            Outcome::Success => None,
            Outcome::Failure(err) => Some(err),
        }
    }

    /// Convert into a `Result` for use with `?`
    pub fn into_result(self) -> Result<(), GuardError> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Failure(err) => Err(err),
        }
    }
}

impl From<Result<(), GuardError>> for Outcome {
    fn from(result: Result<(), GuardError>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(err) => Outcome::Failure(err),
        }
    }
}

/// Runs work items and turns their panics into [`GuardError`] values.
///
/// The guard only holds its configuration; one instance can be shared
/// freely across threads and used re-entrantly.
#[derive(Debug, Clone, Default)]
pub struct ExceptionGuard {
    config: GuardConfig,
}

impl ExceptionGuard {
    /// Create a guard with the given configuration
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// The guard's configuration
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Invoke `work` once and report whether it panicked
    pub fn run<F>(&self, work: F) -> Outcome
    where
        F: FnOnce(),
    {
        self.catch(work).into()
    }

    /// Invoke `work` once and return its value, or the panic as an error
    pub fn catch<F, R>(&self, work: F) -> Result<R, GuardError>
    where
        F: FnOnce() -> R,
    {
        let scope = Scope::enter(self.config.quiet);
        let result = catch_unwind(AssertUnwindSafe(work));
        let location = scope.take_location();
        drop(scope);

        result.map_err(|payload| {
            let exception = Exception::from_panic(payload, &self.config.panic_domain);
            tracing::trace!(
                domain = %exception.name,
                reason = %exception.reason,
                location = location.as_deref().unwrap_or("unknown"),
                "intercepted panic"
            );

            let location = location.filter(|_| self.config.capture_location);
            GuardError::from(exception).with_location(location)
        })
    }
}

/// Invoke `work` once with the default guard configuration
///
/// # Example
///
/// ```rust
/// let outcome = unwind_guard::run(|| {});
/// assert!(outcome.is_success());
/// ```
pub fn run<F>(work: F) -> Outcome
where
    F: FnOnce(),
{
    ExceptionGuard::default().run(work)
}

/// Invoke `work` once with the default guard configuration, returning its value
///
/// # Example
///
/// ```rust
/// let value = unwind_guard::catch(|| 40 + 2).unwrap();
/// assert_eq!(value, 42);
///
/// let err = unwind_guard::catch(|| -> u32 { panic!("nope") }).unwrap_err();
/// assert_eq!(err.domain, "RustPanic");
/// assert_eq!(err.message, "nope");
/// ```
pub fn catch<F, R>(work: F) -> Result<R, GuardError>
where
    F: FnOnce() -> R,
{
    ExceptionGuard::default().catch(work)
}
