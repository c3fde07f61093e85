//! Entity node: ownership, attachment, children, lifecycle and dispatch.
//!
//! A [`Node`] is the fundamental unit of the runtime. It owns a table of
//! attached components, an ordered list of children, and its lifecycle
//! flags. Nodes created as components of another node hold an *owner*
//! reference instead: every structural operation on them redirects to the
//! owner, so a component is hosted logically on its root of ownership, not
//! on the intermediate node that requested it.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Root of ownership                        │
//! │  components: {Audio, Input, Physics}                      │
//! │  children:   [page-1, page-2]                             │
//! └───────────────────────────────────────────────────────────┘
//!        ▲ owner            ▲ owner           │ parent (weak)
//!   ┌─────────┐        ┌─────────┐        ┌─────────┐
//!   │  Audio  │        │  Input  │        │ page-1  │  (own root:
//!   └─────────┘        └─────────┘        └─────────┘   own table,
//!                                                        own children)
//! ```
//!
//! # Ownership & Cycles
//!
//! The owner and parent references are resolved once at construction and
//! held weakly; the component table and child list hold the strong
//! references. Dropping a root therefore releases its whole component
//! table, while externally-held component handles stay valid and fall back
//! to behaving as their own root.
//!
//! # Dispatch
//!
//! | Primitive | Reaches |
//! |-----------|---------|
//! | [`send`](Node::send) | the owner, then every enabled component |
//! | [`broadcast`](Node::broadcast) | `send`, then every enabled child subtree |
//!
//! Both delegate to the owner first, so delivery always originates at the
//! root of ownership. Fan-out within a phase is concurrent and unordered;
//! the aggregate wait surfaces the first failure.

use crate::{notify, resolve_requirements, Behavior, Blueprint, Message, NodeError};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

struct NodeInner {
    blueprint: &'static Blueprint,
    behavior: Box<dyn Behavior>,
    name: RwLock<String>,
    enabled: AtomicBool,
    initialized: AtomicBool,
    started: AtomicBool,
    can_update: AtomicBool,
    owner: Option<Weak<NodeInner>>,
    parent: Option<Weak<NodeInner>>,
    components: RwLock<Vec<(&'static str, Node)>>,
    children: RwLock<Vec<Node>>,
    props: RwLock<Map<String, Value>>,
}

/// A cheaply clonable handle to one entity node.
///
/// Clones share the same node; equality is handle identity.
///
/// # Example
///
/// ```
/// use arbor_node::{Node, NODE};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let app = Node::create_and_init(&NODE).await.unwrap();
/// assert!(app.is_initialized());
/// assert!(app.is_root());
/// # });
/// ```
#[derive(Clone)]
pub struct Node(Arc<NodeInner>);

impl Node {
    // ------------------------------------------------------------
    // Factory
    // ------------------------------------------------------------

    fn construct(
        blueprint: &'static Blueprint,
        owner: Option<&Node>,
        parent: Option<&Node>,
    ) -> Node {
        let owner = owner.map(Node::root);
        Node(Arc::new(NodeInner {
            blueprint,
            behavior: (blueprint.build)(),
            name: RwLock::new(blueprint.key.to_owned()),
            enabled: AtomicBool::new(true),
            initialized: AtomicBool::new(false),
            started: AtomicBool::new(false),
            can_update: AtomicBool::new(true),
            owner: owner.map(|root| Arc::downgrade(&root.0)),
            parent: parent.map(|parent| Arc::downgrade(&parent.0)),
            components: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
            props: RwLock::new(Map::new()),
        }))
    }

    /// Creates a root node and auto-attaches its resolved requirements.
    pub async fn create(blueprint: &'static Blueprint) -> Result<Node, NodeError> {
        Self::create_with(blueprint, None, None).await
    }

    /// Creates a node with an optional owner and an optional parent, then
    /// auto-attaches the instance's resolved requirements.
    ///
    /// The owner reference is resolved to its root of ownership once, here;
    /// requirements therefore land on that root's component table.
    pub async fn create_with(
        blueprint: &'static Blueprint,
        owner: Option<&Node>,
        parent: Option<&Node>,
    ) -> Result<Node, NodeError> {
        let node = Self::construct(blueprint, owner, parent);
        let required = resolve_requirements(&node.0.behavior.requires(), blueprint);
        for requirement in required {
            node.attach(requirement).await?;
        }
        Ok(node)
    }

    /// [`create`](Node::create) followed by [`init`](Node::init).
    pub async fn create_and_init(blueprint: &'static Blueprint) -> Result<Node, NodeError> {
        let node = Self::create(blueprint).await?;
        node.init().await?;
        Ok(node)
    }

    // ------------------------------------------------------------
    // Identity & flags
    // ------------------------------------------------------------

    /// The blueprint this node was built from.
    #[must_use]
    pub fn blueprint(&self) -> &'static Blueprint {
        self.0.blueprint
    }

    /// The node's name; defaults to the blueprint key.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.name.read().clone()
    }

    /// Renames the node. Name-based child lookup matches on this value.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.0.name.write() = name.into();
    }

    /// Whether this node participates in update/dispatch fan-out.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.enabled.load(Ordering::Acquire)
    }

    /// Sets the enabled flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.0.enabled.store(enabled, Ordering::Release);
    }

    /// Whether [`init`](Node::init) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.0.initialized.load(Ordering::Acquire)
    }

    /// Whether the init sequence has passed its start phase.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.0.started.load(Ordering::Acquire)
    }

    /// The update gate. When closed, [`update`](Node::update) is a no-op.
    #[must_use]
    pub fn can_update(&self) -> bool {
        self.0.can_update.load(Ordering::Acquire)
    }

    /// Opens or closes the update gate.
    pub fn set_can_update(&self, can_update: bool) {
        self.0.can_update.store(can_update, Ordering::Release);
    }

    // ------------------------------------------------------------
    // Ownership
    // ------------------------------------------------------------

    /// The root of ownership this node delegates to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<Node> {
        self.0.owner.as_ref()?.upgrade().map(Node)
    }

    /// The node that created this node as a child. Navigational only;
    /// never traversed for dispatch.
    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        self.0.parent.as_ref()?.upgrade().map(Node)
    }

    /// Whether this node is a root of ownership.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.owner().is_none()
    }

    /// The root of ownership: the owner when set, otherwise this node.
    #[must_use]
    pub fn root(&self) -> Node {
        self.owner().unwrap_or_else(|| self.clone())
    }

    /// Downcasts this node's behavior to its concrete type.
    #[must_use]
    pub fn behavior<T: Behavior>(&self) -> Option<&T> {
        let any: &dyn Any = self.0.behavior.as_ref();
        any.downcast_ref::<T>()
    }

    // ------------------------------------------------------------
    // Property bag
    // ------------------------------------------------------------

    /// Reads a property merged in via [`add_child`](Node::add_child) or
    /// [`set_prop`](Node::set_prop).
    #[must_use]
    pub fn prop(&self, key: &str) -> Option<Value> {
        self.0.props.read().get(key).cloned()
    }

    /// Stores a property on this node.
    pub fn set_prop(&self, key: impl Into<String>, value: Value) {
        self.0.props.write().insert(key.into(), value);
    }

    fn apply_props(&self, props: Value) {
        let Value::Object(mut fields) = props else {
            return;
        };
        if let Some(Value::String(name)) = fields.remove("name") {
            self.set_name(name);
        }
        if let Some(Value::Bool(enabled)) = fields.remove("enabled") {
            self.set_enabled(enabled);
        }
        if let Some(Value::Bool(can_update)) = fields.remove("can_update") {
            self.set_can_update(can_update);
        }
        self.0.props.write().extend(fields);
    }

    // ------------------------------------------------------------
    // Components
    // ------------------------------------------------------------

    fn stored_component(&self, key: &str) -> Option<Node> {
        let table = self.0.components.read();
        table
            .iter()
            .find(|(stored, _)| *stored == key)
            .map(|(_, node)| node.clone())
    }

    /// Attaches a component, or returns the existing instance.
    ///
    /// New instances are built with this node's root of ownership as their
    /// owner; their own resolved requirements are attached first, in
    /// resolved order. When the owner is already initialized the new
    /// instance is initialized immediately.
    pub async fn attach(&self, blueprint: &'static Blueprint) -> Result<Node, NodeError> {
        let root = self.root();
        root.attach_local(blueprint).await
    }

    fn attach_local(&self, blueprint: &'static Blueprint) -> BoxFuture<'_, Result<Node, NodeError>> {
        async move {
            if let Some(existing) = self.stored_component(blueprint.key) {
                return Ok(existing);
            }

            debug!("attach {} -> {}", blueprint.key, self.name());
            let instance = Node::create_with(blueprint, Some(self), None).await?;

            {
                let mut table = self.0.components.write();
                // A handler awaited during creation may have attached the
                // same key; the first stored instance wins.
                if let Some((_, existing)) = table.iter().find(|(key, _)| *key == blueprint.key) {
                    return Ok(existing.clone());
                }
                table.push((blueprint.key, instance.clone()));
            }

            if self.is_initialized() {
                instance.init().await?;
            }
            Ok(instance)
        }
        .boxed()
    }

    /// Detaches a component after delivering its shutdown notifications.
    ///
    /// # Errors
    ///
    /// [`NodeError::ComponentNotFound`] when no instance is attached.
    pub async fn detach(&self, blueprint: &'static Blueprint) -> Result<(), NodeError> {
        let root = self.root();
        let component = root.component(blueprint)?;
        debug!("detach {} <- {}", blueprint.key, root.name());
        component.shutdown().await?;
        let mut table = root.0.components.write();
        table.retain(|(key, _)| *key != blueprint.key);
        Ok(())
    }

    /// Whether an instance of `blueprint` is attached to the owner.
    #[must_use]
    pub fn has_component(&self, blueprint: &'static Blueprint) -> bool {
        self.root().stored_component(blueprint.key).is_some()
    }

    /// Fetches the attached instance of `blueprint`.
    ///
    /// # Errors
    ///
    /// [`NodeError::ComponentNotFound`] when no instance is attached; the
    /// error names the owning type and the missing key.
    pub fn component(&self, blueprint: &'static Blueprint) -> Result<Node, NodeError> {
        let root = self.root();
        root.stored_component(blueprint.key)
            .ok_or_else(|| NodeError::ComponentNotFound {
                node: root.0.blueprint.key.to_owned(),
                component: blueprint.key.to_owned(),
            })
    }

    /// Snapshot of the owner's attached components, in attachment order.
    #[must_use]
    pub fn components(&self) -> Vec<Node> {
        let root = self.root();
        let table = root.0.components.read();
        table.iter().map(|(_, node)| node.clone()).collect()
    }

    // ------------------------------------------------------------
    // Children
    // ------------------------------------------------------------

    /// Creates a child node and appends it to the owner's child list.
    ///
    /// The child is its own root of ownership; only the parent
    /// back-reference links it here. `props` is a flat JSON object merged
    /// onto the child before lifecycle init: `name`, `enabled` and
    /// `can_update` map onto the node fields, everything else lands in the
    /// child's property bag. When the owner is already initialized the
    /// child is initialized immediately. Completion of this call covers the
    /// `on_add_child` send and the `on_owner_add_child` broadcast.
    pub async fn add_child(
        &self,
        blueprint: &'static Blueprint,
        props: Option<Value>,
    ) -> Result<Node, NodeError> {
        let root = self.root();
        root.add_child_local(blueprint, props).await
    }

    async fn add_child_local(
        &self,
        blueprint: &'static Blueprint,
        props: Option<Value>,
    ) -> Result<Node, NodeError> {
        let child = Node::create_with(blueprint, None, Some(self)).await?;
        if let Some(props) = props {
            child.apply_props(props);
        }
        self.0.children.write().push(child.clone());
        debug!("add child {} -> {}", child.name(), self.name());

        if self.is_initialized() {
            child.init().await?;
        }

        let direct = Message::new(notify::ADD_CHILD)
            .with_node(self.clone())
            .with_node(child.clone());
        self.send_local(&direct).await?;

        let tree = Message::new(notify::OWNER_ADD_CHILD)
            .with_node(self.clone())
            .with_node(child.clone());
        self.broadcast_local(&tree).await?;

        Ok(child)
    }

    /// Concurrent [`add_child`](Node::add_child) over a slice of
    /// blueprints; the same `props` bag is applied to every child.
    /// Returns the children in slice order.
    pub async fn add_children(
        &self,
        blueprints: &[&'static Blueprint],
        props: Option<Value>,
    ) -> Result<Vec<Node>, NodeError> {
        try_join_all(
            blueprints
                .iter()
                .map(|&blueprint| self.add_child(blueprint, props.clone())),
        )
        .await
    }

    /// Removes `child` from the owner's child list by handle identity.
    ///
    /// On a hit: notify the owner (`on_remove_child`), the tree
    /// (`on_owner_remove_child`), shut the child down, and return `true`.
    /// An unknown child resolves to `false`; it is not an error.
    pub async fn remove_child(&self, child: &Node) -> Result<bool, NodeError> {
        let root = self.root();

        let found = {
            let mut children = root.0.children.write();
            match children.iter().position(|stored| stored == child) {
                Some(index) => {
                    children.remove(index);
                    true
                }
                None => false,
            }
        };
        if !found {
            return Ok(false);
        }
        debug!("remove child {} <- {}", child.name(), root.name());

        let direct = Message::new(notify::REMOVE_CHILD)
            .with_node(root.clone())
            .with_node(child.clone());
        root.send_local(&direct).await?;

        let tree = Message::new(notify::OWNER_REMOVE_CHILD)
            .with_node(root.clone())
            .with_node(child.clone());
        root.broadcast_local(&tree).await?;

        child.shutdown().await?;
        Ok(true)
    }

    /// First child whose name matches, or `None`. Never an error.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<Node> {
        let root = self.root();
        let children = root.0.children.read();
        children.iter().find(|child| child.name() == name).cloned()
    }

    /// Snapshot of the owner's children, in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        let root = self.root();
        let children = root.0.children.read();
        children.clone()
    }

    /// Children matching a predicate, in insertion order.
    ///
    /// ```ignore
    /// let active = node.find_children(|child| child.is_enabled());
    /// ```
    #[must_use]
    pub fn find_children(&self, predicate: impl Fn(&Node) -> bool) -> Vec<Node> {
        let root = self.root();
        let children = root.0.children.read();
        children
            .iter()
            .filter(|child| predicate(child))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------

    /// Runs the one-shot init sequence: broadcast `on_init`, broadcast
    /// `on_start`, mark started, run one update cycle if the update gate is
    /// open, broadcast `on_late_start`.
    ///
    /// Idempotent: repeat calls return immediately.
    pub async fn init(&self) -> Result<(), NodeError> {
        if self.0.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("init {}", self.name());

        self.broadcast(&Message::new(notify::INIT)).await?;
        self.broadcast(&Message::new(notify::START)).await?;
        self.0.started.store(true, Ordering::SeqCst);
        if self.can_update() {
            self.update_inner().await?;
        }
        self.broadcast(&Message::new(notify::LATE_START)).await?;
        Ok(())
    }

    /// Runs one update cycle: broadcast `on_update` then `on_after_update`.
    ///
    /// Initializes the node first when it was never initialized (lazy
    /// init). A disabled node or a closed update gate makes this a no-op.
    /// Update notifications never carry arguments, on any path.
    pub async fn update(&self) -> Result<(), NodeError> {
        self.update_inner().await
    }

    fn update_inner(&self) -> BoxFuture<'_, Result<(), NodeError>> {
        async move {
            if !self.is_initialized() {
                self.init().await?;
            }
            if !self.is_enabled() || !self.can_update() {
                return Ok(());
            }
            self.broadcast(&Message::new(notify::UPDATE)).await?;
            self.broadcast(&Message::new(notify::AFTER_UPDATE)).await?;
            Ok(())
        }
        .boxed()
    }

    /// Delivers the shutdown notification pass through the owner's tree:
    /// `on_owner_shutdown` when this node is a root of ownership, else
    /// `on_component_shutdown`, followed by `on_shutdown`. Both carry this
    /// node as argument.
    ///
    /// Notification only; no state is cleared and the node stays
    /// addressable. Removal belongs to [`detach`](Node::detach) and
    /// [`remove_child`](Node::remove_child).
    pub async fn shutdown(&self) -> Result<(), NodeError> {
        debug!("shutdown {}", self.name());
        let notice = if self.is_root() {
            notify::OWNER_SHUTDOWN
        } else {
            notify::COMPONENT_SHUTDOWN
        };
        self.broadcast(&Message::new(notice).with_node(self.clone()))
            .await?;
        self.broadcast(&Message::new(notify::SHUTDOWN).with_node(self.clone()))
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------

    async fn deliver(&self, message: &Message) -> Result<(), NodeError> {
        trace!("deliver {} -> {}", message.name(), self.name());
        self.0.behavior.on_message(self, message).await
    }

    /// Dispatches a message to the owner and its enabled components.
    ///
    /// The owner's own handler completes before the component fan-out is
    /// awaited together. Disabled components and receivers without the
    /// handler are skipped silently. Children are never reached.
    pub async fn send(&self, message: &Message) -> Result<(), NodeError> {
        let root = self.root();
        root.send_local(message).await
    }

    async fn send_local(&self, message: &Message) -> Result<(), NodeError> {
        self.deliver(message).await?;

        let components: Vec<Node> = {
            let table = self.0.components.read();
            table
                .iter()
                .filter(|(_, component)| component.is_enabled())
                .map(|(_, component)| component.clone())
                .collect()
        };
        try_join_all(components.iter().map(|component| component.deliver(message))).await?;
        Ok(())
    }

    /// Dispatches a message to the owner, its enabled components, and
    /// recursively every enabled child subtree.
    ///
    /// The `send` phase completes before the child fan-out begins; fan-out
    /// within a phase is concurrent and unordered, and the call resolves
    /// only once every receiver completed (or the first failure surfaced).
    pub async fn broadcast(&self, message: &Message) -> Result<(), NodeError> {
        let root = self.root();
        root.broadcast_local(message).await
    }

    fn broadcast_local<'a>(&'a self, message: &'a Message) -> BoxFuture<'a, Result<(), NodeError>> {
        async move {
            self.send_local(message).await?;

            let children: Vec<Node> = {
                let children = self.0.children.read();
                children
                    .iter()
                    .filter(|child| child.is_enabled())
                    .cloned()
                    .collect()
            };
            try_join_all(children.iter().map(|child| child.broadcast_local(message))).await?;
            Ok(())
        }
        .boxed()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("blueprint", &self.0.blueprint.key)
            .field("enabled", &self.is_enabled())
            .field("initialized", &self.is_initialized())
            .field("root", &self.is_root())
            .finish()
    }
}
