//! Rule contracts and the default per-type rule provider.
//!
//! The validator does not define concrete rules; it discovers them through a
//! [`RuleProvider`] and invokes them with a [`RuleContext`]. Rules report
//! failures as data ([`RuleResult`]) and never abort the traversal.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::metadata::Metadata;
use crate::node::Node;

/// What a rule sees when it is invoked for one node.
pub struct RuleContext<'a> {
    /// The node's parent in the graph, if any.
    pub container: Option<&'a Node>,
    /// The node being validated; `None` for an absent value.
    pub model: Option<&'a Node>,
    /// The node's shape descriptor.
    pub metadata: &'a Metadata,
}

/// One failure reported by a rule.
pub struct RuleResult {
    /// The member the failure belongs to, relative to the node's key. Empty
    /// addresses the node itself.
    pub member: String,
    /// Human-readable failure message.
    pub message: String,
}

impl RuleResult {
    /// Creates a result for a named member of the node.
    pub fn new(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            message: message.into(),
        }
    }

    /// Creates a result addressing the node itself.
    pub fn for_node(message: impl Into<String>) -> Self {
        Self::new("", message)
    }
}

/// A single validation rule.
///
/// Implementations downcast the context's model to the type they understand
/// and return every failure they find; an empty vec means the rule passed.
///
/// # Example
///
/// ```rust
/// use walkabout::{Rule, RuleContext, RuleResult};
///
/// struct NonNegative;
///
/// impl Rule for NonNegative {
///     fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
///         match cx.model.and_then(|m| m.downcast_ref::<i32>()) {
///             Some(n) if *n < 0 => {
///                 vec![RuleResult::for_node("must be greater than or equal to 0")]
///             }
///             _ => Vec::new(),
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Evaluates the rule against one node.
    fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult>;
}

/// Supplies the rules applicable to a node.
///
/// Queried fresh for every node; providers hold no per-traversal state.
pub trait RuleProvider: Send + Sync {
    /// Returns the rules to run for a node with the given descriptor, in
    /// invocation order.
    fn rules_for(&self, metadata: &Metadata) -> Vec<Arc<dyn Rule>>;
}

/// A thread-safe rule provider keyed by underlying model type.
///
/// # Example
///
/// ```rust
/// use walkabout::{Rule, RuleContext, RuleRegistry, RuleResult};
///
/// struct NonEmpty;
///
/// impl Rule for NonEmpty {
///     fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
///         match cx.model.and_then(|m| m.downcast_ref::<String>()) {
///             Some(s) if s.is_empty() => vec![RuleResult::for_node("must not be empty")],
///             _ => Vec::new(),
///         }
///     }
/// }
///
/// let rules = RuleRegistry::new();
/// rules.add::<String>(NonEmpty);
/// ```
pub struct RuleRegistry {
    rules: RwLock<HashMap<TypeId, Vec<Arc<dyn Rule>>>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `rule` to run for nodes whose underlying type is `T`.
    ///
    /// Rules for the same type run in registration order.
    pub fn add<T: 'static>(&self, rule: impl Rule + 'static) {
        self.rules
            .write()
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Arc::new(rule));
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleProvider for RuleRegistry {
    fn rules_for(&self, metadata: &Metadata) -> Vec<Arc<dyn Rule>> {
        self.rules
            .read()
            .get(&metadata.underlying_type())
            .cloned()
            .unwrap_or_default()
    }
}
