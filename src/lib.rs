//! # Walkabout
//!
//! A recursive object-graph validator that accumulates path-keyed errors.
//!
//! ## Overview
//!
//! Walkabout walks an arbitrary object graph depth-first and applies
//! pluggable validation rules at every node, recording failures against a
//! path-addressed error collection (`Age`, `Items[3].Name`) rather than
//! stopping at the first problem. The walk is hardened for hostile input:
//! cycles terminate, a max-error cutoff degrades gracefully to skipped paths,
//! and a depth limit fails fast instead of overflowing the stack.
//!
//! ## Core Types
//!
//! - [`Node`]: one dynamically typed, shared value in the graph
//! - [`Metadata`]: a node's shape (simple, complex, or collection) with
//!   precompiled property accessors
//! - [`ErrorCollection`]: the keyed error store with per-path [`FieldStatus`]
//! - [`ValidationStateMap`]: identity-keyed per-instance overrides recorded
//!   by a binder before validation
//! - [`ObjectValidator`]: the entry point; builds one [`ValidationVisitor`]
//!   per request
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use walkabout::{
//!     node, ErrorCollection, FieldStatus, Metadata, MetadataRegistry, ObjectValidator,
//!     Property, Rule, RuleContext, RuleRegistry, RuleResult, ValidationStateMap,
//! };
//!
//! struct Person {
//!     name: Option<String>,
//!     age: i32,
//! }
//!
//! // Shape descriptors, registered once per type.
//! let metadata = MetadataRegistry::new();
//! metadata
//!     .register(Metadata::complex::<Person>(vec![
//!         Property::new("Name", Metadata::simple::<String>(), |p: &Person| {
//!             p.name.clone().map(node)
//!         }),
//!         Property::new("Age", Metadata::simple::<i32>(), |p: &Person| {
//!             Some(node(p.age))
//!         }),
//!     ]))
//!     .unwrap();
//!
//! // A rule for every i32 in the graph.
//! struct NonNegative;
//! impl Rule for NonNegative {
//!     fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
//!         match cx.model.and_then(|m| m.downcast_ref::<i32>()) {
//!             Some(n) if *n < 0 => {
//!                 vec![RuleResult::for_node("must be greater than or equal to 0")]
//!             }
//!             _ => Vec::new(),
//!         }
//!     }
//! }
//! let rules = RuleRegistry::new();
//! rules.add::<i32>(NonNegative);
//!
//! let validator = ObjectValidator::new(Arc::new(metadata));
//! let mut errors = ErrorCollection::new();
//! let state = ValidationStateMap::new();
//! let model = node(Person { name: None, age: -1 });
//!
//! let valid = validator.validate(&rules, &mut errors, &state, &model).unwrap();
//! assert!(!valid);
//! assert_eq!(errors.field_status("Age"), FieldStatus::Invalid);
//! ```

pub mod errors;
pub mod exclude;
pub mod metadata;
pub mod node;
pub mod path;
pub mod rules;
pub mod state;
pub mod validator;
pub mod visitor;

pub use errors::{ErrorCollection, FieldEntry, FieldStatus, DEFAULT_MAX_ERRORS};
pub use exclude::{ExcludeFilter, SimpleTypesFilter};
pub use metadata::{
    Metadata, MetadataProvider, MetadataRef, MetadataRegistry, Property, RegistryError,
};
pub use node::{node, share, Node, NodeId};
pub use rules::{Rule, RuleContext, RuleProvider, RuleRegistry, RuleResult};
pub use state::{ValidationState, ValidationStateMap};
pub use validator::ObjectValidator;
pub use visitor::{ValidationVisitor, VisitError, DEFAULT_MAX_DEPTH};
