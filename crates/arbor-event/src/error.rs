//! Event layer errors and the unified error interface.
//!
//! All arbor error types implement [`ErrorCode`] so callers can handle
//! failures uniformly across crates.
//!
//! # Error Code Convention
//!
//! Event errors use the `EVENT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::NotCancelable`] | `EVENT_NOT_CANCELABLE` | No |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error code interface for arbor errors.
///
/// Implement this trait for every error type to provide:
///
/// - **Machine-readable codes**: for programmatic error handling
/// - **Recoverability info**: for retry logic and user feedback
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE, e.g. `"EVENT_NOT_CANCELABLE"`
/// - Prefixed with the owning layer (`EVENT_`, `NODE_`)
/// - Stable once defined (changing a code is a breaking change)
///
/// # Example
///
/// ```
/// use arbor_event::ErrorCode;
///
/// #[derive(Debug)]
/// enum MyError {
///     Missing,
///     Busy,
/// }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Missing => "MY_MISSING",
///             Self::Busy => "MY_BUSY",
///         }
///     }
///
///     fn is_recoverable(&self) -> bool {
///         matches!(self, Self::Busy)
///     }
/// }
///
/// assert_eq!(MyError::Busy.code(), "MY_BUSY");
/// assert!(MyError::Busy.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Event layer error.
///
/// # Example
///
/// ```
/// use arbor_event::{ErrorCode, Event, EventError};
///
/// let event = Event::new(false);
/// let err = event.cancel().unwrap_err();
/// assert!(matches!(err, EventError::NotCancelable));
/// assert_eq!(err.code(), "EVENT_NOT_CANCELABLE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum EventError {
    /// Attempted to cancel an event that was constructed non-cancelable.
    ///
    /// **Not recoverable** - cancelability is fixed at construction.
    #[error("event is not cancelable")]
    NotCancelable,
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotCancelable => "EVENT_NOT_CANCELABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::NotCancelable => false,
        }
    }
}
