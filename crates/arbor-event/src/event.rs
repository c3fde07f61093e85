//! Cancelable event flag.
//!
//! An [`Event`] travels through a message fan-out so that any receiver can
//! veto a notification. The flag is monotonic: once canceled it stays
//! canceled.
//!
//! # State
//!
//! | Field | Set | Mutability |
//! |-------|-----|------------|
//! | cancelable | at construction | fixed |
//! | canceled | via [`cancel`](Event::cancel) | false → true, one way |
//!
//! # Sharing
//!
//! Cancellation goes through `&self`, so a single `Arc<Event>` can be handed
//! to every receiver of a fan-out and the sender observes the combined
//! outcome afterwards.

use crate::EventError;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cancelable notification flag.
///
/// The runtime never inspects the flag; receivers call
/// [`cancel`](Event::cancel) and the sender decides what cancellation means.
///
/// # Example
///
/// ```
/// use arbor_event::Event;
/// use std::sync::Arc;
///
/// let event = Arc::new(Event::new(true));
///
/// // A receiver somewhere in the fan-out vetoes the notification.
/// let seen_by_receiver = Arc::clone(&event);
/// seen_by_receiver.cancel().unwrap();
///
/// assert!(event.was_canceled());
/// ```
#[derive(Debug, Default)]
pub struct Event {
    cancelable: bool,
    canceled: AtomicBool,
}

impl Event {
    /// Creates an event; `cancelable` is fixed for the event's lifetime.
    #[must_use]
    pub fn new(cancelable: bool) -> Self {
        Self {
            cancelable,
            canceled: AtomicBool::new(false),
        }
    }

    /// Returns whether this event can be canceled.
    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Returns whether any receiver has canceled this event.
    #[must_use]
    pub fn was_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Marks the event canceled.
    ///
    /// Idempotent once canceled. Fails with [`EventError::NotCancelable`]
    /// (leaving state unchanged) when the event was constructed
    /// non-cancelable.
    pub fn cancel(&self) -> Result<(), EventError> {
        if !self.cancelable {
            return Err(EventError::NotCancelable);
        }
        self.canceled.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn construct_default() {
        let event = Event::default();
        assert!(!event.is_cancelable());
        assert!(!event.was_canceled());
    }

    #[test]
    fn construct_cancelable() {
        let event = Event::new(true);
        assert!(event.is_cancelable());
        assert!(!event.was_canceled());
    }

    #[test]
    fn construct_non_cancelable() {
        let event = Event::new(false);
        assert!(!event.is_cancelable());
        assert!(!event.was_canceled());
    }

    #[test]
    fn cancel_sets_flag() {
        let event = Event::new(true);
        event.cancel().unwrap();
        assert!(event.was_canceled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let event = Event::new(true);
        event.cancel().unwrap();
        event.cancel().unwrap();
        assert!(event.was_canceled());
    }

    #[test]
    fn cancel_non_cancelable_fails() {
        let event = Event::new(false);
        let err = event.cancel().unwrap_err();
        assert_eq!(err.code(), "EVENT_NOT_CANCELABLE");
        assert!(!event.was_canceled());
    }

    #[test]
    fn shared_cancellation_is_visible() {
        use std::sync::Arc;

        let event = Arc::new(Event::new(true));
        let receiver = Arc::clone(&event);
        receiver.cancel().unwrap();
        assert!(event.was_canceled());
    }
}
