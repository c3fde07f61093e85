//! Event primitives for the arbor runtime.
//!
//! This crate is the bottom layer of the arbor workspace. It carries the
//! pieces that have no dependency on the node runtime itself:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  arbor-node  : Node, Blueprint, Behavior, dispatch          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arbor-event : Event, EventError, ErrorCode  ◄── HERE       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Event`] | Cancelable notification flag passed through dispatch |
//! | [`EventError`] | Errors raised by event operations |
//! | [`ErrorCode`] | Unified error interface implemented by all arbor errors |
//!
//! # Cancelable Events
//!
//! An [`Event`] is a small mutable flag that lets any receiver in a message
//! fan-out veto a notification. The runtime never inspects the flag; the
//! sender decides what cancellation means.
//!
//! ```
//! use arbor_event::Event;
//!
//! let event = Event::new(true);
//! assert!(!event.was_canceled());
//!
//! event.cancel().unwrap();
//! assert!(event.was_canceled());
//! ```

mod error;
mod event;

pub use error::{ErrorCode, EventError};
pub use event::Event;
