//! Behavior trait: the handler interface every component and node type
//! implements.
//!
//! A [`Behavior`] is the host-defined half of a node. The runtime owns
//! structure (components, children, flags); the behavior owns semantics
//! (what the node does when notifications arrive).
//!
//! # Capability Callbacks
//!
//! Dispatch is capability-based: the runtime routes well-known notification
//! names to typed callbacks, and a behavior participates in a notification
//! by overriding the matching method. Everything is optional; the defaults
//! are no-ops, which is what makes "receiver does not handle this
//! notification" a silent skip instead of an error.
//!
//! | Callback | Notification |
//! |----------|--------------|
//! | `on_init` / `on_start` / `on_late_start` | init sequence |
//! | `on_update` / `on_after_update` | update cycle |
//! | `on_shutdown` / `on_owner_shutdown` / `on_component_shutdown` | shutdown pass |
//! | `on_child_added` / `on_owner_child_added` | `add_child` |
//! | `on_child_removed` / `on_owner_child_removed` | `remove_child` |
//! | `on_toggle_child` / `on_after_toggle_child` | toggle group |
//! | `on_message` | everything, including custom names |
//!
//! # Custom Notifications
//!
//! Override [`on_message`](Behavior::on_message) for host-defined names and
//! fall back to [`route`](Behavior::route) so the builtin callbacks keep
//! working:
//!
//! ```
//! use arbor_node::{Behavior, Message, Node, NodeError};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct Counter {
//!     pings: AtomicUsize,
//! }
//!
//! #[async_trait]
//! impl Behavior for Counter {
//!     async fn on_message(&self, node: &Node, message: &Message) -> Result<(), NodeError> {
//!         match message.name() {
//!             "on_ping" => {
//!                 self.pings.fetch_add(1, Ordering::Relaxed);
//!                 Ok(())
//!             }
//!             _ => self.route(node, message).await,
//!         }
//!     }
//! }
//! ```
//!
//! # State
//!
//! Handlers take `&self`; behaviors must be `Send + Sync` and keep their
//! mutable state behind interior mutability (atomics, `parking_lot`
//! locks). This is what allows sibling handlers to run concurrently in a
//! fan-out and lets a handler call back into its own node's API without
//! deadlocking on itself.

use crate::{notify, Blueprint, Message, Node, NodeError};
use async_trait::async_trait;
use std::any::Any;

/// Host-defined semantics attached to a [`Node`].
///
/// All methods have no-op defaults; implement only what the type needs. An
/// empty `impl Behavior for T {}` is a valid inert behavior.
///
/// Every callback receives the node hosting this behavior, giving handlers
/// synchronous access to the full node API (lookup, children, dispatch).
#[async_trait]
pub trait Behavior: Any + Send + Sync {
    /// This instance's own requirement list.
    ///
    /// Combined with the blueprint's declaration chain by
    /// [`resolve_requirements`](crate::resolve_requirements) and
    /// auto-attached when the node is created.
    fn requires(&self) -> Vec<&'static Blueprint> {
        Vec::new()
    }

    /// Entry point for every notification delivered to this behavior.
    ///
    /// The default forwards to [`route`](Behavior::route). Override for
    /// custom notification names; keep the `route` fallback unless the
    /// builtin callbacks should be suppressed.
    async fn on_message(&self, node: &Node, message: &Message) -> Result<(), NodeError> {
        self.route(node, message).await
    }

    /// Routes well-known notification names to the typed callbacks.
    ///
    /// Unknown names, and builtin names whose expected arguments are
    /// missing, resolve to `Ok(())`.
    async fn route(&self, node: &Node, message: &Message) -> Result<(), NodeError> {
        match message.name() {
            notify::INIT => self.on_init(node).await,
            notify::START => self.on_start(node).await,
            notify::LATE_START => self.on_late_start(node).await,
            notify::UPDATE => self.on_update(node).await,
            notify::AFTER_UPDATE => self.on_after_update(node).await,
            notify::SHUTDOWN => match message.node(0) {
                Some(target) => self.on_shutdown(node, target).await,
                None => Ok(()),
            },
            notify::OWNER_SHUTDOWN => match message.node(0) {
                Some(target) => self.on_owner_shutdown(node, target).await,
                None => Ok(()),
            },
            notify::COMPONENT_SHUTDOWN => match message.node(0) {
                Some(target) => self.on_component_shutdown(node, target).await,
                None => Ok(()),
            },
            notify::ADD_CHILD => match (message.node(0), message.node(1)) {
                (Some(owner), Some(child)) => self.on_child_added(node, owner, child).await,
                _ => Ok(()),
            },
            notify::OWNER_ADD_CHILD => match (message.node(0), message.node(1)) {
                (Some(owner), Some(child)) => self.on_owner_child_added(node, owner, child).await,
                _ => Ok(()),
            },
            notify::REMOVE_CHILD => match (message.node(0), message.node(1)) {
                (Some(owner), Some(child)) => self.on_child_removed(node, owner, child).await,
                _ => Ok(()),
            },
            notify::OWNER_REMOVE_CHILD => match (message.node(0), message.node(1)) {
                (Some(owner), Some(child)) => {
                    self.on_owner_child_removed(node, owner, child).await
                }
                _ => Ok(()),
            },
            notify::TOGGLE_CHILD => match message.node(0) {
                Some(child) => self.on_toggle_child(node, child).await,
                None => Ok(()),
            },
            notify::AFTER_TOGGLE_CHILD => match message.node(0) {
                Some(child) => self.on_after_toggle_child(node, child).await,
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// The hosting node was initialized.
    async fn on_init(&self, _node: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// Follows `on_init` in the init sequence.
    async fn on_start(&self, _node: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// Last notification of the init sequence.
    async fn on_late_start(&self, _node: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// Update cycle, first half.
    async fn on_update(&self, _node: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// Update cycle, second half.
    async fn on_after_update(&self, _node: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// `target` is shutting down.
    async fn on_shutdown(&self, _node: &Node, _target: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// `target`, a root of ownership, is shutting down.
    async fn on_owner_shutdown(&self, _node: &Node, _target: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// `target`, an owned component, is shutting down.
    async fn on_component_shutdown(&self, _node: &Node, _target: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// `owner` appended `child`; delivered to the owner and its components.
    async fn on_child_added(
        &self,
        _node: &Node,
        _owner: &Node,
        _child: &Node,
    ) -> Result<(), NodeError> {
        Ok(())
    }

    /// `owner` appended `child`; delivered through the whole tree.
    async fn on_owner_child_added(
        &self,
        _node: &Node,
        _owner: &Node,
        _child: &Node,
    ) -> Result<(), NodeError> {
        Ok(())
    }

    /// `owner` removed `child`; delivered to the owner and its components.
    async fn on_child_removed(
        &self,
        _node: &Node,
        _owner: &Node,
        _child: &Node,
    ) -> Result<(), NodeError> {
        Ok(())
    }

    /// `owner` removed `child`; delivered through the whole tree.
    async fn on_owner_child_removed(
        &self,
        _node: &Node,
        _owner: &Node,
        _child: &Node,
    ) -> Result<(), NodeError> {
        Ok(())
    }

    /// A toggle group activated `child`.
    async fn on_toggle_child(&self, _node: &Node, _child: &Node) -> Result<(), NodeError> {
        Ok(())
    }

    /// A toggle group finished activating `child`.
    async fn on_after_toggle_child(&self, _node: &Node, _child: &Node) -> Result<(), NodeError> {
        Ok(())
    }
}
