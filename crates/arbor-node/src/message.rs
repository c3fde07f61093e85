//! Messages dispatched through [`send`](crate::Node::send) and
//! [`broadcast`](crate::Node::broadcast).
//!
//! A [`Message`] is a notification name plus an ordered list of typed
//! arguments. The runtime routes well-known names (the [`notify`] module) to
//! the matching [`Behavior`](crate::Behavior) callbacks; everything else
//! reaches [`Behavior::on_message`](crate::Behavior::on_message).
//!
//! # Arguments
//!
//! | Variant | Carries | Typical use |
//! |---------|---------|-------------|
//! | [`Arg::Node`] | a node handle | structural notifications (`on_add_child`) |
//! | [`Arg::Event`] | a shared cancelable [`Event`] | veto-able notifications |
//! | [`Arg::Value`] | arbitrary JSON | host payloads |
//!
//! # Example
//!
//! ```
//! use arbor_event::Event;
//! use arbor_node::Message;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let event = Arc::new(Event::new(true));
//! let msg = Message::new("on_save_requested")
//!     .with_event(Arc::clone(&event))
//!     .with_value(json!({"path": "notes.txt"}));
//!
//! assert_eq!(msg.name(), "on_save_requested");
//! assert!(msg.event(0).is_some());
//! assert_eq!(msg.value(1).unwrap()["path"], "notes.txt");
//! ```

use crate::Node;
use arbor_event::Event;
use serde_json::Value;
use std::sync::Arc;

/// Well-known notification names emitted by the runtime.
///
/// | Constant | Emitted by | Arguments |
/// |----------|-----------|-----------|
/// | `INIT` | `init()` | — |
/// | `START` | `init()` | — |
/// | `LATE_START` | `init()` | — |
/// | `UPDATE` | `update()` | — |
/// | `AFTER_UPDATE` | `update()` | — |
/// | `SHUTDOWN` | `shutdown()` | shutting-down node |
/// | `OWNER_SHUTDOWN` | `shutdown()` on a root of ownership | shutting-down node |
/// | `COMPONENT_SHUTDOWN` | `shutdown()` on an owned component | shutting-down node |
/// | `ADD_CHILD` | `add_child()`, direct | owner, child |
/// | `OWNER_ADD_CHILD` | `add_child()`, tree-wide | owner, child |
/// | `REMOVE_CHILD` | `remove_child()`, direct | owner, child |
/// | `OWNER_REMOVE_CHILD` | `remove_child()`, tree-wide | owner, child |
/// | `TOGGLE_CHILD` | `ToggleGroup::toggle` | toggled child |
/// | `AFTER_TOGGLE_CHILD` | `ToggleGroup::toggle` | toggled child |
pub mod notify {
    /// First lifecycle notification after a node is marked initialized.
    pub const INIT: &str = "on_init";
    /// Follows `on_init` in the init sequence.
    pub const START: &str = "on_start";
    /// Last notification of the init sequence.
    pub const LATE_START: &str = "on_late_start";
    /// Update cycle, first half.
    pub const UPDATE: &str = "on_update";
    /// Update cycle, second half.
    pub const AFTER_UPDATE: &str = "on_after_update";
    /// Final shutdown notification, after the context-specific one.
    pub const SHUTDOWN: &str = "on_shutdown";
    /// A root of ownership is shutting down.
    pub const OWNER_SHUTDOWN: &str = "on_owner_shutdown";
    /// An owned component is shutting down.
    pub const COMPONENT_SHUTDOWN: &str = "on_component_shutdown";
    /// A child was appended; sent to the owner only.
    pub const ADD_CHILD: &str = "on_add_child";
    /// A child was appended; broadcast through the owner's tree.
    pub const OWNER_ADD_CHILD: &str = "on_owner_add_child";
    /// A child was removed; sent to the owner only.
    pub const REMOVE_CHILD: &str = "on_remove_child";
    /// A child was removed; broadcast through the owner's tree.
    pub const OWNER_REMOVE_CHILD: &str = "on_owner_remove_child";
    /// A toggle group activated a child.
    pub const TOGGLE_CHILD: &str = "on_toggle_child";
    /// A toggle group finished activating a child.
    pub const AFTER_TOGGLE_CHILD: &str = "on_after_toggle_child";
}

/// A typed message argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A node handle.
    Node(Node),
    /// A shared cancelable event.
    Event(Arc<Event>),
    /// An arbitrary JSON payload.
    Value(Value),
}

impl Arg {
    /// Returns the node handle if this argument is a node.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the event if this argument is an event.
    #[must_use]
    pub fn as_event(&self) -> Option<&Arc<Event>> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }

    /// Returns the JSON payload if this argument is a value.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// A named notification with typed, positional arguments.
///
/// Built with the `with_*` methods in argument order:
///
/// ```
/// use arbor_node::{notify, Message};
///
/// let msg = Message::new(notify::UPDATE);
/// assert_eq!(msg.name(), "on_update");
/// assert!(msg.args().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Message {
    name: String,
    args: Vec<Arg>,
}

impl Message {
    /// Creates a message with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends a node argument.
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.args.push(Arg::Node(node));
        self
    }

    /// Appends a shared event argument.
    #[must_use]
    pub fn with_event(mut self, event: Arc<Event>) -> Self {
        self.args.push(Arg::Event(event));
        self
    }

    /// Appends a JSON payload argument.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.args.push(Arg::Value(value));
        self
    }

    /// Returns the notification name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all arguments in order.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Returns the argument at `index`.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Returns the node argument at `index`, if it is one.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.arg(index).and_then(Arg::as_node)
    }

    /// Returns the event argument at `index`, if it is one.
    #[must_use]
    pub fn event(&self, index: usize) -> Option<&Arc<Event>> {
        self.arg(index).and_then(Arg::as_event)
    }

    /// Returns the JSON argument at `index`, if it is one.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.arg(index).and_then(Arg::as_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_without_args() {
        let msg = Message::new(notify::INIT);
        assert_eq!(msg.name(), "on_init");
        assert!(msg.args().is_empty());
        assert!(msg.arg(0).is_none());
    }

    #[test]
    fn args_keep_positions() {
        let event = Arc::new(Event::new(true));
        let msg = Message::new("on_custom")
            .with_event(Arc::clone(&event))
            .with_value(json!(42));

        assert!(msg.event(0).is_some());
        assert_eq!(msg.value(1), Some(&json!(42)));
        // Typed accessors miss on the wrong variant.
        assert!(msg.value(0).is_none());
        assert!(msg.event(1).is_none());
        assert!(msg.node(0).is_none());
    }

    #[test]
    fn event_arg_shares_state() {
        let event = Arc::new(Event::new(true));
        let msg = Message::new("on_custom").with_event(Arc::clone(&event));

        msg.event(0).unwrap().cancel().unwrap();
        assert!(event.was_canceled());
    }

    #[test]
    fn clone_preserves_args() {
        let msg = Message::new("on_custom").with_value(json!({"k": 1}));
        let copy = msg.clone();
        assert_eq!(copy.name(), msg.name());
        assert_eq!(copy.args().len(), 1);
    }
}
