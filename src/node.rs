//! Graph nodes and reference identity.
//!
//! A [`Node`] is one value in the object graph being validated: a shared,
//! dynamically typed handle. Children that are absent (a `None` field, a null
//! element) are represented as `Option<Node>::None` rather than a node.

use std::any::Any;
use std::sync::Arc;

/// One value in the object graph.
///
/// Nodes are `Arc`-shared so the same instance can appear in several places
/// in the graph, and so the validator can track instances by identity rather
/// than by value.
pub type Node = Arc<dyn Any + Send + Sync>;

/// Wraps a value into a fresh [`Node`].
///
/// # Example
///
/// ```rust
/// use walkabout::node;
///
/// let n = node(42_i32);
/// assert_eq!(n.downcast_ref::<i32>(), Some(&42));
/// ```
pub fn node<T: Send + Sync + 'static>(value: T) -> Node {
    Arc::new(value)
}

/// Re-shares an existing handle as a [`Node`] without copying the value.
///
/// Property accessors should hand out the stored handle via `share` so the
/// returned node keeps the identity the side table and visited set were
/// keyed on; wrapping a fresh copy with [`node`] produces a new identity on
/// every call.
pub fn share<T: Send + Sync + 'static>(handle: &Arc<T>) -> Node {
    Arc::clone(handle) as Node
}

/// The identity of a [`Node`]: its allocation, not its value.
///
/// Two clones of the same `Arc` share one `NodeId`; two structurally equal
/// but separately allocated values have distinct ids. This is the key type
/// for the side table and the visitor's cycle tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the identity of `node`.
    pub fn of(node: &Node) -> Self {
        NodeId(Arc::as_ptr(node) as *const () as usize)
    }
}
