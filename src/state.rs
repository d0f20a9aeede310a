//! The validation state side table.
//!
//! A binder that assembles the object graph can attach per-instance overrides
//! before validation runs: an explicit path key, replacement metadata, or a
//! suppress flag that skips the subtree entirely. Entries are keyed by node
//! identity ([`NodeId`]), not value equality, so two structurally equal
//! instances are tracked independently. The validator only reads this table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::metadata::Metadata;
use crate::node::{Node, NodeId};

/// Per-instance overrides recorded by the binder.
#[derive(Default)]
pub struct ValidationState {
    /// Explicit path key for the instance, replacing the computed one.
    pub key: Option<String>,
    /// Replacement metadata for the instance.
    pub metadata: Option<Arc<Metadata>>,
    /// When set, the instance and everything under it is not validated; its
    /// keys end up [`crate::FieldStatus::Skipped`].
    pub suppress: bool,
}

impl ValidationState {
    /// An entry that only suppresses validation of the instance.
    pub fn suppressed() -> Self {
        Self {
            suppress: true,
            ..Self::default()
        }
    }

    /// An entry that redirects the instance to an explicit key.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }
}

/// Identity-keyed map from graph nodes to their [`ValidationState`].
#[derive(Default)]
pub struct ValidationStateMap {
    entries: HashMap<NodeId, ValidationState>,
}

impl ValidationStateMap {
    /// Creates an empty side table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` for the given instance.
    pub fn insert(&mut self, node: &Node, state: ValidationState) {
        self.entries.insert(NodeId::of(node), state);
    }

    /// Returns the entry recorded for the given instance, if any.
    pub fn get(&self, node: &Node) -> Option<&ValidationState> {
        self.entries.get(&NodeId::of(node))
    }

    /// The number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::node;

    #[test]
    fn test_lookup_is_by_identity_not_value() {
        let a = node(String::from("same"));
        let b = node(String::from("same"));

        let mut table = ValidationStateMap::new();
        table.insert(&a, ValidationState::suppressed());

        assert!(table.get(&a).is_some());
        assert!(table.get(&b).is_none());
    }

    #[test]
    fn test_clone_of_node_finds_entry() {
        let a = node(42_i32);
        let clone = Arc::clone(&a);

        let mut table = ValidationStateMap::new();
        table.insert(&a, ValidationState::keyed("Root"));

        let entry = table.get(&clone).unwrap();
        assert_eq!(entry.key.as_deref(), Some("Root"));
        assert!(!entry.suppress);
    }
}
