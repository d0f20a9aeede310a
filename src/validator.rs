//! The object validator facade.

use std::sync::Arc;

use crate::errors::ErrorCollection;
use crate::exclude::{ExcludeFilter, SimpleTypesFilter};
use crate::metadata::MetadataProvider;
use crate::node::Node;
use crate::rules::RuleProvider;
use crate::state::ValidationStateMap;
use crate::visitor::{ValidationVisitor, VisitError, DEFAULT_MAX_DEPTH};

/// Recursively validates object graphs.
///
/// The facade is stateless across requests: every call to
/// [`validate`](Self::validate) builds a fresh [`ValidationVisitor`], so one
/// `ObjectValidator` can serve independent validation requests concurrently
/// as long as each request brings its own error collection.
///
/// A [`SimpleTypesFilter`] is installed by default; further filters can be
/// added with [`with_exclude_filter`](Self::with_exclude_filter).
pub struct ObjectValidator {
    metadata_provider: Arc<dyn MetadataProvider>,
    exclude_filters: Vec<Box<dyn ExcludeFilter>>,
    max_depth: usize,
}

impl ObjectValidator {
    /// Creates a validator resolving shape descriptors through
    /// `metadata_provider`.
    pub fn new(metadata_provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            metadata_provider,
            exclude_filters: vec![Box::new(SimpleTypesFilter::new())],
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Adds an exclusion filter; a type excluded by any filter has no
    /// property-level validation.
    pub fn with_exclude_filter(mut self, filter: impl ExcludeFilter + 'static) -> Self {
        self.exclude_filters.push(Box::new(filter));
        self
    }

    /// Sets the recursion depth limit (default [`DEFAULT_MAX_DEPTH`]).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validates `model` and everything reachable from it.
    ///
    /// Rules come from `rule_provider`, failures land in `errors`, and
    /// `state` carries the binder's per-instance overrides. Returns the
    /// aggregate validity of the graph.
    ///
    /// # Errors
    ///
    /// Returns [`VisitError`] for missing metadata or a graph nesting deeper
    /// than the configured limit.
    pub fn validate(
        &self,
        rule_provider: &dyn RuleProvider,
        errors: &mut ErrorCollection,
        state: &ValidationStateMap,
        model: &Node,
    ) -> Result<bool, VisitError> {
        let mut visitor = ValidationVisitor::new(
            self.metadata_provider.as_ref(),
            rule_provider,
            &self.exclude_filters,
            errors,
            state,
            Arc::clone(model),
            self.max_depth,
        );
        visitor.validate()
    }
}
