//! Node layer errors.
//!
//! # Error Code Convention
//!
//! Node errors use the `NODE_` prefix; event errors pass through with their
//! own codes:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NodeError::ComponentNotFound`] | `NODE_COMPONENT_NOT_FOUND` | No |
//! | [`NodeError::ExecutionFailed`] | `NODE_EXECUTION_FAILED` | Yes |
//! | [`NodeError::Event`] | delegated to [`EventError`] | delegated |
//!
//! # Soft Misses
//!
//! Not everything negative is an error. Name lookups ([`Node::child`]),
//! presence checks ([`Node::has_component`]), reference removal
//! ([`Node::remove_child`]) and notifications a receiver does not handle all
//! resolve to a negative or no-op result instead of raising.
//!
//! [`Node::child`]: crate::Node::child
//! [`Node::has_component`]: crate::Node::has_component
//! [`Node::remove_child`]: crate::Node::remove_child

use arbor_event::{ErrorCode, EventError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Node layer error.
///
/// Handler failures propagate uncaught through the awaiting chain: one
/// failing handler in a fan-out rejects the aggregate wait with the first
/// failure. The runtime performs no retry and no isolation between sibling
/// handlers.
///
/// # Example
///
/// ```
/// use arbor_event::ErrorCode;
/// use arbor_node::NodeError;
///
/// let err = NodeError::ExecutionFailed("handler panicked on empty input".into());
/// assert_eq!(err.code(), "NODE_EXECUTION_FAILED");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum NodeError {
    /// Component lookup on the owning node found no instance.
    ///
    /// The only raising case in component lookup; everything else is a soft
    /// miss. Names the owner and the missing component key.
    ///
    /// **Not recoverable** - attach the component first.
    #[error("{node} has no component: {component}")]
    ComponentNotFound {
        /// Name of the owning node the lookup bottomed out on.
        node: String,
        /// Key of the missing component.
        component: String,
    },

    /// A handler or factory failed while the runtime was awaiting it.
    ///
    /// **Recoverable** - retry may succeed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// An event operation failed inside a handler.
    #[error(transparent)]
    Event(#[from] EventError),
}

impl ErrorCode for NodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::ComponentNotFound { .. } => "NODE_COMPONENT_NOT_FOUND",
            Self::ExecutionFailed(_) => "NODE_EXECUTION_FAILED",
            Self::Event(err) => err.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ComponentNotFound { .. } => false,
            Self::ExecutionFailed(_) => true,
            Self::Event(err) => err.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<NodeError> {
        vec![
            NodeError::ComponentNotFound {
                node: "Node".into(),
                component: "Missing".into(),
            },
            NodeError::ExecutionFailed("x".into()),
            NodeError::Event(EventError::NotCancelable),
        ]
    }

    #[test]
    fn component_not_found_error() {
        let err = NodeError::ComponentNotFound {
            node: "App".into(),
            component: "Router".into(),
        };
        assert_eq!(err.code(), "NODE_COMPONENT_NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "App has no component: Router");
    }

    #[test]
    fn execution_failed_error() {
        let err = NodeError::ExecutionFailed("timeout".into());
        assert_eq!(err.code(), "NODE_EXECUTION_FAILED");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("execution failed"));
    }

    #[test]
    fn event_error_passthrough() {
        let err: NodeError = EventError::NotCancelable.into();
        assert_eq!(err.code(), "EVENT_NOT_CANCELABLE");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn node_error_code_prefix() {
        for err in all_variants() {
            assert!(err.code().starts_with("NODE_") || err.code().starts_with("EVENT_"));
        }
    }

    #[test]
    fn serialization_roundtrip() {
        for err in all_variants() {
            let json = serde_json::to_string(&err).unwrap();
            let restored: NodeError = serde_json::from_str(&json).unwrap();
            assert_eq!(err, restored);
        }
    }
}
