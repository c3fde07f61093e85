//! Composable node runtime with an async lifecycle and tree-wide messaging.
//!
//! arbor composes behavior out of independent, reusable units (components)
//! attached to a tree of owner nodes. The runtime manages structure,
//! lifecycle and messaging; what a component *does* is entirely up to its
//! [`Behavior`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Root of ownership                         │
//! │  components: {Audio, Input, Save}     children: [home, about]   │
//! │  lifecycle:  init → start → update* → shutdown                   │
//! └──────────────────────────────────────────────────────────────────┘
//!        │ send: owner + enabled components
//!        │ broadcast: send + every enabled child subtree
//!        ├──────────────┬──────────────┐
//!        ▼              ▼              ▼
//!  ┌──────────┐   ┌──────────┐   ┌──────────┐
//!  │  Audio   │   │  Input   │   │   home   │── own components,
//!  └──────────┘   └──────────┘   └──────────┘   own children
//! ```
//!
//! # Core Pieces
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Node`] | Entity node: attachment, children, lifecycle, dispatch |
//! | [`Blueprint`] | Typed component registry entry with requirement lists |
//! | [`Behavior`] | Optional-callback handler interface |
//! | [`Message`] / [`notify`] | Typed notifications flowing through dispatch |
//! | [`ToggleGroup`] | "Exactly one active child" utility node |
//! | [`NodeError`] | Error taxonomy, [`ErrorCode`](arbor_event::ErrorCode)-coded |
//! | [`testing`] | Probe/fail harness behaviors |
//!
//! # Ownership Model
//!
//! Components are hosted on their *root of ownership*: attaching through
//! any node that has an owner redirects to that owner, so one component
//! instance per type serves the whole group sharing the owner. Children are
//! their own roots; only a weak parent back-reference links them upward.
//!
//! # Requirement Resolution
//!
//! A blueprint declares the components it requires, per level of its
//! `extends` chain; a behavior instance can add its own list on top.
//! [`resolve_requirements`] flattens the chain ancestor-first with
//! first-occurrence dedup, and [`Node::create`] auto-attaches the result.
//!
//! # Example
//!
//! ```
//! use arbor_node::{Behavior, Blueprint, Node, NodeError, NODE};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct Heartbeat {
//!     beats: AtomicUsize,
//! }
//!
//! #[async_trait]
//! impl Behavior for Heartbeat {
//!     async fn on_update(&self, _node: &Node) -> Result<(), NodeError> {
//!         self.beats.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//! }
//!
//! static HEARTBEAT: Blueprint = Blueprint {
//!     key: "Heartbeat",
//!     extends: None,
//!     requires: &[],
//!     build: || Box::new(Heartbeat::default()),
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let app = Node::create(&NODE).await.unwrap();
//! let heart = app.attach(&HEARTBEAT).await.unwrap();
//!
//! app.init().await.unwrap();
//! app.update().await.unwrap();
//!
//! let beats = heart.behavior::<Heartbeat>().unwrap();
//! assert_eq!(beats.beats.load(Ordering::Relaxed), 2);
//! # });
//! ```
//!
//! # Concurrency Model
//!
//! Every attach, lifecycle and dispatch operation is an async task;
//! "concurrent" fan-out means the branch futures are created before any is
//! awaited, joined with await-all / first-failure semantics. Handlers take
//! `&self` and keep state behind interior mutability, so sibling handlers
//! may interleave at suspension points and reentrant calls can observe
//! structure mutated mid-dispatch. No cancellation or timeout exists for
//! in-flight dispatch.

mod behavior;
mod blueprint;
mod error;
mod message;
mod node;
pub mod testing;
mod toggle;

pub use behavior::Behavior;
pub use blueprint::{resolve_requirements, Blueprint, NODE};
pub use error::NodeError;
pub use message::{notify, Arg, Message};
pub use node::Node;
pub use toggle::{ToggleGroup, TOGGLE_GROUP};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, PROBE};

    #[tokio::test]
    async fn compose_lifecycle_and_dispatch() {
        let app = Node::create(&NODE).await.unwrap();
        let recorder = app.attach(&PROBE).await.unwrap();
        app.init().await.unwrap();

        let page = app
            .add_child(&NODE, Some(serde_json::json!({"name": "home"})))
            .await
            .unwrap();
        assert_eq!(app.child("home").unwrap(), page);

        app.broadcast(&Message::new("on_refresh")).await.unwrap();

        let probe = recorder.behavior::<Probe>().unwrap();
        assert_eq!(probe.count(notify::INIT), 1);
        assert_eq!(probe.count(notify::ADD_CHILD), 1);
        assert_eq!(probe.count("on_refresh"), 1);
    }
}
