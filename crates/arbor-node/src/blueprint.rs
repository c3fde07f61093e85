//! Typed component registry.
//!
//! A [`Blueprint`] is a `'static` descriptor standing in for a component
//! type: a stable key, a constructor, an optional link to the blueprint it
//! extends, and the requirement list declared at that level. Blueprints are
//! plain statics, so component identity is checked at compile time and
//! requirement lists are explicit data instead of runtime reflection.
//!
//! # Declaration Chains
//!
//! `extends` links blueprints into a chain; requirement resolution walks it
//! from the most-derived level outward:
//!
//! ```text
//! WIDGET (requires [LAYOUT])
//!    ▲ extends
//! BUTTON (requires [INPUT])
//!    ▲ extends
//! ICON_BUTTON (requires [SPRITE])
//! ```
//!
//! Attaching an `ICON_BUTTON` auto-attaches `LAYOUT`, `INPUT`, `SPRITE` in
//! that order: levels closer to the chain root are satisfied first.
//!
//! # Example
//!
//! ```
//! use arbor_node::{Behavior, Blueprint};
//!
//! struct Audio;
//! impl Behavior for Audio {}
//!
//! static AUDIO: Blueprint = Blueprint {
//!     key: "Audio",
//!     extends: None,
//!     requires: &[],
//!     build: || Box::new(Audio),
//! };
//!
//! assert_eq!(AUDIO.key, "Audio");
//! ```

use crate::{Behavior, Node, NodeError};

/// A component type descriptor.
///
/// The `key` doubles as the component's lookup name and the default name of
/// nodes built from this blueprint. Keys must be unique within one owner's
/// component table; the runtime enforces at most one instance per key.
pub struct Blueprint {
    /// Component-type name used for lookup.
    pub key: &'static str,
    /// Blueprint this one extends, forming the declaration chain.
    pub extends: Option<&'static Blueprint>,
    /// Requirement list declared at this level of the chain.
    pub requires: &'static [&'static Blueprint],
    /// Constructs a fresh behavior instance.
    pub build: fn() -> Box<dyn Behavior>,
}

impl Blueprint {
    /// Fetches the instance of this blueprint from `node`'s owner.
    ///
    /// Shorthand for [`Node::component`].
    ///
    /// # Errors
    ///
    /// [`NodeError::ComponentNotFound`] when no instance is attached.
    pub fn of(&'static self, node: &Node) -> Result<Node, NodeError> {
        node.component(self)
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("key", &self.key)
            .field("extends", &self.extends.map(|b| b.key))
            .field(
                "requires",
                &self.requires.iter().map(|b| b.key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

struct Plain;

impl Behavior for Plain {}

/// The plain node blueprint: no requirements, no-op behavior.
///
/// The counterpart of instantiating the base type directly; useful as a
/// bare container node or as the chain root for `extends`.
pub static NODE: Blueprint = Blueprint {
    key: "Node",
    extends: None,
    requires: &[],
    build: || Box::new(Plain),
};

/// Resolves the full requirement list for one instance.
///
/// `own` is the instance's own requirement list
/// ([`Behavior::requires`](crate::Behavior::requires)); `blueprint` is the
/// instance's blueprint, whose `extends` chain is walked from most-derived
/// to least-derived.
///
/// The accumulation order reproduces declaration order across the chain:
/// own-list reversed first, then each chain level's list reversed, then one
/// final reversal of the whole sequence, then deduplication by key keeping
/// the first occurrence. Requirements declared closer to the chain root are
/// therefore satisfied before requirements declared by more derived levels,
/// and a requirement appearing at multiple levels attaches exactly once, at
/// its most-ancestral position.
///
/// Attachment-time side effects (a requirement's own requirements, and
/// `on_init` ordering once the owner initializes) depend on this order.
#[must_use]
pub fn resolve_requirements(
    own: &[&'static Blueprint],
    blueprint: &'static Blueprint,
) -> Vec<&'static Blueprint> {
    let mut acc: Vec<&'static Blueprint> = own.iter().rev().copied().collect();

    let mut level = Some(blueprint);
    while let Some(bp) = level {
        acc.extend(bp.requires.iter().rev().copied());
        level = bp.extends;
    }

    acc.reverse();

    let mut resolved: Vec<&'static Blueprint> = Vec::with_capacity(acc.len());
    for bp in acc {
        if !resolved.iter().any(|seen| seen.key == bp.key) {
            resolved.push(bp);
        }
    }
    resolved
}
