//! Error types for the lifokit library.
//!
//! ## Key Components
//!
//! - [`CancelError`]: Returned by blocking pops when the caller's
//!   cancellation fires before an element became available. Carries the
//!   token's own reason verbatim.
//! - [`ConfigError`]: Returned by strict builders when configuration is
//!   invalid (e.g. zero capacity).
//! - [`InvariantError`]: Returned by `check_invariants` when the stack's
//!   bookkeeping is inconsistent.
//!
//! ## Example Usage
//!
//! ```
//! use lifokit::cancel::CancelToken;
//! use lifokit::error::CancelError;
//! use lifokit::stack::BoundedLifo;
//!
//! let stack: BoundedLifo<u32> = BoundedLifo::new(4);
//! let token = CancelToken::new();
//! token.cancel();
//!
//! // Empty stack + fired token: the token's own error comes back.
//! assert_eq!(stack.pop(&token), Err(CancelError::Cancelled));
//! assert_eq!(token.err(), Some(CancelError::Cancelled));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CancelError
// ---------------------------------------------------------------------------

/// Reason a cancellation token fired.
///
/// Produced by [`CancelToken::err`](crate::cancel::CancelToken::err) and
/// surfaced unchanged by [`BoundedLifo::pop`](crate::stack::BoundedLifo::pop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelError {
    /// The token (or one of its ancestors) was cancelled explicitly.
    Cancelled,
    /// The token's effective deadline passed.
    DeadlineExceeded,
}

impl CancelError {
    /// Returns `true` if this error came from an expired deadline.
    #[inline]
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, CancelError::DeadlineExceeded)
    }
}

impl fmt::Display for CancelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelError::Cancelled => f.write_str("operation cancelled"),
            CancelError::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

impl std::error::Error for CancelError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when stack configuration parameters are invalid.
///
/// Produced by [`LifoBuilder::try_build`](crate::builder::LifoBuilder::try_build).
/// The lenient constructors never fail; they clamp instead.
///
/// # Example
///
/// ```
/// use lifokit::builder::LifoBuilder;
///
/// let err = LifoBuilder::<u64>::new(0).try_build().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal stack invariants are violated.
///
/// Produced by [`BoundedLifo::check_invariants`](crate::stack::BoundedLifo::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
