//! Toggle group: a node enforcing "exactly one active child".
//!
//! Built entirely on the public [`Node`] contract; the runtime gives toggle
//! groups no special treatment. Typical use is page-style switching where
//! one child is live and its siblings sit disabled:
//!
//! ```text
//! ToggleGroup
//!   ├── home     (enabled)
//!   ├── settings (disabled)
//!   └── about    (disabled)
//! ```
//!
//! # Notifications
//!
//! A successful toggle sends `on_toggle_child`, forces an update on the
//! newly enabled child, then sends `on_after_toggle_child`. Both carry the
//! toggled child and reach the group node and its components (not the
//! children). An unresolvable target is a complete no-op.
//!
//! # Example
//!
//! ```
//! use arbor_node::{ToggleGroup, NODE};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let group = ToggleGroup::create_and_init().await.unwrap();
//! group.add_child(&NODE, Some(json!({"name": "home", "enabled": false}))).await.unwrap();
//! group.add_child(&NODE, Some(json!({"name": "about", "enabled": false}))).await.unwrap();
//!
//! group.toggle("home").await.unwrap();
//! assert!(group.child("home").unwrap().is_enabled());
//! assert!(!group.child("about").unwrap().is_enabled());
//! # });
//! ```

use crate::{notify, Behavior, Blueprint, Message, Node, NodeError};
use std::ops::Deref;
use tracing::debug;

struct ToggleBehavior;

impl Behavior for ToggleBehavior {}

/// Blueprint for toggle group nodes.
pub static TOGGLE_GROUP: Blueprint = Blueprint {
    key: "ToggleGroup",
    extends: Some(&crate::NODE),
    requires: &[],
    build: || Box::new(ToggleBehavior),
};

/// A node whose direct children are kept "exactly one enabled".
///
/// The invariant holds only for the direct children of this group and only
/// through [`toggle`](ToggleGroup::toggle) /
/// [`toggle_node`](ToggleGroup::toggle_node); it is not transitive and
/// nothing stops host code flipping enabled flags directly.
///
/// Derefs to [`Node`], so the full node API is available on the group.
pub struct ToggleGroup {
    node: Node,
}

impl ToggleGroup {
    /// Creates an uninitialized toggle group node.
    pub async fn create() -> Result<Self, NodeError> {
        let node = Node::create(&TOGGLE_GROUP).await?;
        Ok(Self { node })
    }

    /// Creates and fully initializes a toggle group node.
    pub async fn create_and_init() -> Result<Self, NodeError> {
        let node = Node::create_and_init(&TOGGLE_GROUP).await?;
        Ok(Self { node })
    }

    /// Wraps an existing node in the toggle contract.
    ///
    /// The node keeps its blueprint and behavior; only the toggle methods
    /// are added on top of the public contract.
    #[must_use]
    pub fn from_node(node: Node) -> Self {
        Self { node }
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Toggles the first direct child whose name matches.
    ///
    /// No-op (and no notification) when no child has that name.
    pub async fn toggle(&self, name: &str) -> Result<(), NodeError> {
        match self.node.child(name) {
            Some(child) => self.activate(child).await,
            None => Ok(()),
        }
    }

    /// Toggles a direct child resolved by handle identity.
    ///
    /// No-op (and no notification) when the node is not one of this group's
    /// direct children.
    pub async fn toggle_node(&self, child: &Node) -> Result<(), NodeError> {
        let is_member = self.node.children().iter().any(|stored| stored == child);
        if !is_member {
            return Ok(());
        }
        self.activate(child.clone()).await
    }

    async fn activate(&self, child: Node) -> Result<(), NodeError> {
        debug!("toggle {} -> {}", self.node.name(), child.name());
        for sibling in self.node.children() {
            sibling.set_enabled(sibling == child);
        }

        self.node
            .send(&Message::new(notify::TOGGLE_CHILD).with_node(child.clone()))
            .await?;
        child.update().await?;
        self.node
            .send(&Message::new(notify::AFTER_TOGGLE_CHILD).with_node(child.clone()))
            .await?;
        Ok(())
    }
}

impl Deref for ToggleGroup {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Probe;
    use crate::NODE;
    use serde_json::json;

    fn probe() -> Box<dyn Behavior> {
        Box::new(Probe::default())
    }

    static PAGE: Blueprint = Blueprint { key: "Page", extends: None, requires: &[], build: probe };
    static WATCHER: Blueprint = Blueprint { key: "Watcher", extends: None, requires: &[], build: probe };

    fn probe_of(node: &Node) -> &Probe {
        node.behavior::<Probe>().expect("probe behavior")
    }

    async fn group_with_pages(names: &[&str]) -> ToggleGroup {
        let group = ToggleGroup::create_and_init().await.unwrap();
        for name in names {
            group
                .add_child(&PAGE, Some(json!({"name": name, "enabled": false})))
                .await
                .unwrap();
        }
        group
    }

    #[tokio::test]
    async fn toggle_leaves_exactly_one_enabled() {
        let group = group_with_pages(&["home", "settings", "about"]).await;

        group.toggle("settings").await.unwrap();
        let enabled = group.find_children(|child| child.is_enabled());
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name(), "settings");

        group.toggle("about").await.unwrap();
        let enabled = group.find_children(|child| child.is_enabled());
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name(), "about");
    }

    #[tokio::test]
    async fn toggle_unknown_name_changes_nothing() {
        let group = group_with_pages(&["home", "about"]).await;
        group.toggle("home").await.unwrap();

        let watcher = group.attach(&WATCHER).await.unwrap();
        probe_of(&watcher).clear();

        group.toggle("missing").await.unwrap();
        assert!(group.child("home").unwrap().is_enabled());
        assert!(!group.child("about").unwrap().is_enabled());
        assert_eq!(probe_of(&watcher).count(notify::TOGGLE_CHILD), 0);
        assert_eq!(probe_of(&watcher).count(notify::AFTER_TOGGLE_CHILD), 0);
    }

    #[tokio::test]
    async fn toggle_notifies_group_components() {
        let group = group_with_pages(&["home"]).await;
        let watcher = group.attach(&WATCHER).await.unwrap();
        probe_of(&watcher).clear();

        group.toggle("home").await.unwrap();
        assert_eq!(probe_of(&watcher).count(notify::TOGGLE_CHILD), 1);
        assert_eq!(probe_of(&watcher).count(notify::AFTER_TOGGLE_CHILD), 1);
    }

    #[tokio::test]
    async fn toggle_forces_update_on_target() {
        let group = group_with_pages(&["home"]).await;
        let home = group.child("home").unwrap();
        probe_of(&home).clear();

        group.toggle("home").await.unwrap();
        assert!(probe_of(&home).count(notify::UPDATE) >= 1);
    }

    #[tokio::test]
    async fn toggle_node_requires_membership() {
        let group = group_with_pages(&["home"]).await;
        let stranger = Node::create(&PAGE).await.unwrap();
        stranger.set_enabled(false);

        group.toggle_node(&stranger).await.unwrap();
        assert!(!stranger.is_enabled());
        assert!(!group.child("home").unwrap().is_enabled());

        let home = group.child("home").unwrap();
        group.toggle_node(&home).await.unwrap();
        assert!(home.is_enabled());
    }

    #[tokio::test]
    async fn invariant_is_not_transitive() {
        let group = group_with_pages(&["home"]).await;
        let home = group.child("home").unwrap();
        let nested = home.add_child(&PAGE, None).await.unwrap();

        group.toggle("home").await.unwrap();
        // Grandchildren keep whatever enabled state they had.
        assert!(nested.is_enabled());
    }

    #[tokio::test]
    async fn from_node_wraps_existing_node() {
        let node = Node::create_and_init(&NODE).await.unwrap();
        node.add_child(&PAGE, Some(json!({"name": "only", "enabled": false})))
            .await
            .unwrap();

        let group = ToggleGroup::from_node(node);
        group.toggle("only").await.unwrap();
        assert!(group.child("only").unwrap().is_enabled());
    }
}
