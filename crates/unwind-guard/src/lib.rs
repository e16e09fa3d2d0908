//! Unwind Guard
//!
//! This crate runs code that may panic and hands the panic back as a
//! structured error value instead of letting it unwind into the caller:
//! - Typed panic payloads with a name, reason and auxiliary info
//! - A guard that converts caught panics into [`GuardError`]
//! - A chaining panic hook that keeps caught panics off stderr
//! - YAML-loadable configuration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Work item  │────▶│    Guard    │────▶│   Outcome   │
//! │  (FnOnce)   │     │(catch_unwind│     │ / GuardError│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Only unwinding panics are intercepted. Aborts (stack overflow,
//! `panic = "abort"` builds, panics while panicking) stay fatal.
//!
//! # Example
//!
//! ```rust
//! use unwind_guard::{Exception, Outcome};
//!
//! let outcome = unwind_guard::run(|| {
//!     Exception::new("InvalidArgument", "index out of bounds").raise();
//! });
//!
//! match outcome {
//!     Outcome::Success => unreachable!(),
//!     Outcome::Failure(err) => {
//!         assert_eq!(err.domain, "InvalidArgument");
//!         assert_eq!(err.message, "index out of bounds");
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod exception;
pub mod guard;
mod hook;

pub use config::GuardConfig;
pub use error::{Error, GuardError, Result};
pub use exception::Exception;
pub use guard::{ExceptionGuard, Outcome, catch, run};
