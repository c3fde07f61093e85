//! Testing harnesses for behaviors and node trees.
//!
//! Engine-independent helpers for exercising composition, lifecycle and
//! dispatch without writing a bespoke recording behavior per test.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`Probe`] | Records every notification name it receives |
//! | [`PROBE`] | Ready-made blueprint building a fresh [`Probe`] |
//! | [`FailOn`] | Fails on one configured notification name |
//! | [`FAIL_ON_UPDATE`] | Blueprint failing the update cycle |
//!
//! # Example
//!
//! ```
//! use arbor_node::testing::{Probe, PROBE};
//! use arbor_node::{notify, Node, NODE};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let node = Node::create(&NODE).await.unwrap();
//! let recorder = node.attach(&PROBE).await.unwrap();
//!
//! node.init().await.unwrap();
//!
//! let probe = recorder.behavior::<Probe>().unwrap();
//! assert_eq!(probe.count(notify::INIT), 1);
//! assert_eq!(probe.count(notify::UPDATE), 1);
//! # });
//! ```

use crate::{Behavior, Blueprint, Message, Node, NodeError};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Records every notification name delivered to it, in arrival order.
///
/// Builtin callbacks still route normally, so a probe can double as a plain
/// inert component.
#[derive(Debug, Default)]
pub struct Probe {
    seen: Mutex<Vec<String>>,
}

impl Probe {
    /// All recorded notification names, in arrival order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.seen.lock().clone()
    }

    /// How many times `name` was received.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.seen.lock().iter().filter(|seen| *seen == name).count()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

#[async_trait]
impl Behavior for Probe {
    async fn on_message(&self, node: &Node, message: &Message) -> Result<(), NodeError> {
        self.seen.lock().push(message.name().to_owned());
        self.route(node, message).await
    }
}

/// Blueprint building a fresh [`Probe`] per node.
pub static PROBE: Blueprint = Blueprint {
    key: "Probe",
    extends: None,
    requires: &[],
    build: || Box::new(Probe::default()),
};

/// Fails with [`NodeError::ExecutionFailed`] when it receives the
/// configured notification; everything else routes normally.
#[derive(Debug)]
pub struct FailOn {
    name: &'static str,
}

impl FailOn {
    /// Creates a behavior failing on `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl Behavior for FailOn {
    async fn on_message(&self, node: &Node, message: &Message) -> Result<(), NodeError> {
        if message.name() == self.name {
            return Err(NodeError::ExecutionFailed(format!(
                "injected failure on {}",
                self.name
            )));
        }
        self.route(node, message).await
    }
}

/// Blueprint building a [`FailOn`] that fails the update cycle.
pub static FAIL_ON_UPDATE: Blueprint = Blueprint {
    key: "FailOnUpdate",
    extends: None,
    requires: &[],
    build: || Box::new(FailOn::new(crate::notify::UPDATE)),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{notify, NODE};

    #[tokio::test]
    async fn probe_records_in_order() {
        let node = Node::create(&NODE).await.unwrap();
        let recorder = node.attach(&PROBE).await.unwrap();

        node.send(&Message::new("on_first")).await.unwrap();
        node.send(&Message::new("on_second")).await.unwrap();

        let probe = recorder.behavior::<Probe>().unwrap();
        assert_eq!(probe.names(), vec!["on_first", "on_second"]);
        assert_eq!(probe.count("on_first"), 1);
        assert_eq!(probe.count("on_missing"), 0);

        probe.clear();
        assert!(probe.names().is_empty());
    }

    #[tokio::test]
    async fn fail_on_update_rejects_init() {
        let node = Node::create(&NODE).await.unwrap();
        node.attach(&FAIL_ON_UPDATE).await.unwrap();

        // Init runs an update cycle, which the injected failure rejects.
        let err = node.init().await.unwrap_err();
        assert!(matches!(err, NodeError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn fail_on_other_names_routes_normally() {
        let node = Node::create(&NODE).await.unwrap();
        node.set_can_update(false);
        node.attach(&FAIL_ON_UPDATE).await.unwrap();

        node.init().await.unwrap();
        node.send(&Message::new("on_ping")).await.unwrap();
    }
}
