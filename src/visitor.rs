//! The depth-first validation visitor.
//!
//! One visitor drives one validation request: it walks the object graph
//! depth-first, consults the side table and exclusion filters at each node,
//! invokes the rule provider's rules, records failures into the error
//! collection, and returns an aggregate validity flag per subtree. Traversal
//! state (current container, key, model, the visited set) is per-visitor;
//! independent requests each get a fresh instance.

use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use log::{debug, trace};

use crate::errors::{ErrorCollection, FieldStatus};
use crate::exclude::ExcludeFilter;
use crate::metadata::{Kind, Metadata, MetadataProvider, MetadataRef};
use crate::node::{Node, NodeId};
use crate::path;
use crate::rules::{RuleContext, RuleProvider, RuleResult};
use crate::state::ValidationStateMap;

/// Default recursion depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Hard faults that abort a validation request.
///
/// Expected validation failures are recorded in the [`ErrorCollection`] and
/// never surface here; only contract violations and stack protection do.
#[derive(Debug, thiserror::Error)]
pub enum VisitError {
    /// The graph nested deeper than the configured limit.
    #[error("recursion depth limit of {limit} exceeded at '{key}'")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
        /// The key at which the limit was hit.
        key: String,
    },
    /// A deferred metadata reference could not be resolved.
    #[error("no metadata registered for type '{0}'")]
    MissingMetadata(&'static str),
    /// The root model's runtime type has no registered metadata and the side
    /// table supplied no override.
    #[error("no metadata registered for the root model's runtime type")]
    MissingRootMetadata,
}

/// Walks one object graph, validating every reachable node.
pub struct ValidationVisitor<'a> {
    metadata_provider: &'a dyn MetadataProvider,
    rule_provider: &'a dyn RuleProvider,
    exclude_filters: &'a [Box<dyn ExcludeFilter>],
    errors: &'a mut ErrorCollection,
    state: &'a ValidationStateMap,

    root: Node,
    container: Option<Node>,
    key: String,
    model: Option<Node>,

    // Node identities on the current descent path, for cycle detection only.
    visited: HashSet<NodeId>,
    depth: usize,
    max_depth: usize,
}

impl<'a> ValidationVisitor<'a> {
    /// Creates a visitor for one validation request over `model`.
    pub fn new(
        metadata_provider: &'a dyn MetadataProvider,
        rule_provider: &'a dyn RuleProvider,
        exclude_filters: &'a [Box<dyn ExcludeFilter>],
        errors: &'a mut ErrorCollection,
        state: &'a ValidationStateMap,
        model: Node,
        max_depth: usize,
    ) -> Self {
        Self {
            metadata_provider,
            rule_provider,
            exclude_filters,
            errors,
            state,
            root: model,
            container: None,
            key: String::new(),
            model: None,
            visited: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Validates the root model and everything reachable from it.
    ///
    /// Returns false when any reachable node failed a rule, or when the root
    /// itself was suppressed. Errors are recorded in the error collection as
    /// the walk proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`VisitError`] for missing metadata or when the graph nests
    /// deeper than the configured limit.
    pub fn validate(&mut self) -> Result<bool, VisitError> {
        let root = Arc::clone(&self.root);
        let entry = self.state.get(&root);

        let key = entry.and_then(|e| e.key.clone()).unwrap_or_default();
        let metadata = match entry.and_then(|e| e.metadata.clone()) {
            Some(metadata) => metadata,
            None => self
                .metadata_provider
                .metadata_for((*root).type_id())
                .ok_or(VisitError::MissingRootMetadata)?,
        };

        if entry.is_some_and(|e| e.suppress) || self.errors.has_reached_max_errors() {
            debug!("root validation suppressed at '{key}'");
            self.suppress_validation(&key);
            return Ok(false);
        }

        self.visit(key, metadata, Some(root))
    }

    fn visit(
        &mut self,
        key: String,
        metadata: Arc<Metadata>,
        model: Option<Node>,
    ) -> Result<bool, VisitError> {
        if self.depth >= self.max_depth {
            return Err(VisitError::DepthLimitExceeded {
                limit: self.max_depth,
                key,
            });
        }

        let entered = match &model {
            Some(model) => {
                let id = NodeId::of(model);
                if !self.visited.insert(id) {
                    // Already on the current descent path: a cycle. Bail out
                    // without re-validating or reporting.
                    trace!("cycle detected at '{key}'");
                    return Ok(true);
                }
                Some(id)
            }
            None => None,
        };

        let saved = Frame::enter(self, key, model);
        self.depth += 1;

        let result = match &metadata.kind {
            Kind::Collection { .. } => self.visit_collection(&metadata),
            Kind::Complex { .. } => self.visit_complex(&metadata),
            Kind::Simple => self.visit_simple(&metadata),
        };

        // Restored on every exit, including an Err propagating from a child.
        self.depth -= 1;
        saved.exit(self);
        if let Some(id) = entered {
            self.visited.remove(&id);
        }

        result
    }

    fn visit_collection(&mut self, metadata: &Metadata) -> Result<bool, VisitError> {
        let mut is_valid = true;

        if let (Some(model), Some(element_ref)) = (self.model.clone(), metadata.element()) {
            let default_element = self.resolve(element_ref)?;

            for (index, element) in metadata.elements(&model).into_iter().enumerate() {
                let entry = element.as_ref().and_then(|e| self.state.get(e));

                let key = match entry.and_then(|e| e.key.clone()) {
                    Some(key) => key,
                    None => path::index_path(&self.key, index),
                };
                let element_metadata = entry
                    .and_then(|e| e.metadata.clone())
                    .unwrap_or_else(|| Arc::clone(&default_element));

                if entry.is_some_and(|e| e.suppress) || self.errors.has_reached_max_errors() {
                    self.suppress_validation(&key);
                } else if !self.visit(key, element_metadata, element)? {
                    is_valid = false;
                }
            }
        }

        // Double-check the cutoff in case the loop never consulted it.
        if is_valid && !self.errors.has_reached_max_errors() {
            is_valid &= self.validate_node(metadata);
        }

        Ok(is_valid)
    }

    fn visit_complex(&mut self, metadata: &Metadata) -> Result<bool, VisitError> {
        let mut is_valid = true;

        if let Some(model) = self.model.clone() {
            if self.should_validate_properties(metadata) {
                for property in metadata.properties() {
                    let value = property.get(&model);
                    let entry = value.as_ref().and_then(|v| self.state.get(v));

                    let key = match entry.and_then(|e| e.key.clone()) {
                        Some(key) => key,
                        None => path::property_path(&self.key, property.name()),
                    };
                    let property_metadata = match entry.and_then(|e| e.metadata.clone()) {
                        Some(metadata) => metadata,
                        None => self.resolve(property.metadata())?,
                    };

                    if entry.is_some_and(|e| e.suppress) || self.errors.has_reached_max_errors() {
                        self.suppress_validation(&key);
                    } else if !self.visit(key, property_metadata, value)? {
                        is_valid = false;
                    }
                }
            } else {
                // Excluded underlying type: no descent, the whole subtree is
                // deliberately unvalidated.
                let key = self.key.clone();
                self.suppress_validation(&key);
            }
        }

        // Double-check the cutoff in case this node had no properties.
        if is_valid && !self.errors.has_reached_max_errors() {
            is_valid &= self.validate_node(metadata);
        }

        Ok(is_valid)
    }

    fn visit_simple(&mut self, metadata: &Metadata) -> Result<bool, VisitError> {
        if self.errors.has_reached_max_errors() {
            let key = self.key.clone();
            self.suppress_validation(&key);
            return Ok(false);
        }

        Ok(self.validate_node(metadata))
    }

    fn validate_node(&mut self, metadata: &Metadata) -> bool {
        let rules = self.rule_provider.rules_for(metadata);
        if !rules.is_empty() {
            trace!("running {} rule(s) at '{}'", rules.len(), self.key);

            // Collect every result from every rule before recording any.
            let results: Vec<RuleResult> = {
                let cx = RuleContext {
                    container: self.container.as_ref(),
                    model: self.model.as_ref(),
                    metadata,
                };
                rules.iter().flat_map(|rule| rule.validate(&cx)).collect()
            };

            for result in results {
                let key = path::property_path(&self.key, &result.member);
                self.errors.try_add_error(key, result.message);
            }
        }

        if self.errors.field_status(&self.key) == FieldStatus::Invalid {
            false
        } else {
            // Record the node as valid only if an entry already exists;
            // don't create entries that nothing else asked for.
            if let Some(entry) = self.errors.entry_mut(&self.key) {
                entry.mark_valid();
            }
            true
        }
    }

    fn should_validate_properties(&self, metadata: &Metadata) -> bool {
        !self
            .exclude_filters
            .iter()
            .any(|filter| filter.is_type_excluded(metadata.underlying_type()))
    }

    fn suppress_validation(&mut self, key: &str) {
        debug!("suppressing validation at and under '{key}'");
        for entry in self.errors.entries_with_prefix_mut(key) {
            entry.mark_skipped();
        }
    }

    fn resolve(&self, reference: &MetadataRef) -> Result<Arc<Metadata>, VisitError> {
        match *reference {
            MetadataRef::Inline(ref metadata) => Ok(Arc::clone(metadata)),
            MetadataRef::ForType { id, name } => self
                .metadata_provider
                .metadata_for(id)
                .ok_or(VisitError::MissingMetadata(name)),
        }
    }
}

/// The saved traversal frame around one child visit.
///
/// Entering swaps the visitor's (container, key, model) for the child's, with
/// the parent model becoming the child's container; exiting restores the
/// parent frame exactly. `visit` applies the exit on every non-panic path so
/// a child's early return or error can't leak its frame into a sibling.
struct Frame {
    container: Option<Node>,
    key: String,
    model: Option<Node>,
}

impl Frame {
    fn enter(visitor: &mut ValidationVisitor<'_>, key: String, model: Option<Node>) -> Frame {
        let saved = Frame {
            container: visitor.container.take(),
            key: mem::replace(&mut visitor.key, key),
            model: visitor.model.take(),
        };
        visitor.container = saved.model.clone();
        visitor.model = model;
        saved
    }

    fn exit(self, visitor: &mut ValidationVisitor<'_>) {
        visitor.container = self.container;
        visitor.key = self.key;
        visitor.model = self.model;
    }
}
