//! Shape metadata for graph nodes.
//!
//! Every node the visitor touches is classified through a [`Metadata`]
//! descriptor as exactly one of three shapes: simple (a leaf), complex (named
//! properties), or collection (an ordered sequence of elements). Descriptors
//! are built once per type with precompiled accessors and reused for every
//! instance, so no per-visit reflection happens.
//!
//! # Example
//!
//! ```rust
//! use walkabout::{node, Metadata, Property};
//!
//! struct Person {
//!     age: i32,
//! }
//!
//! let metadata = Metadata::complex::<Person>(vec![Property::new(
//!     "Age",
//!     Metadata::simple::<i32>(),
//!     |p: &Person| Some(node(p.age)),
//! )]);
//! assert!(metadata.is_complex());
//! assert_eq!(metadata.properties().len(), 1);
//! ```

use std::any::{self, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::node::Node;

type PropertyGetter = Arc<dyn Fn(&Node) -> Option<Node> + Send + Sync>;
type ElementLister = Arc<dyn Fn(&Node) -> Vec<Option<Node>> + Send + Sync>;

/// The shape of a node, resolved once per descriptor.
pub(crate) enum Kind {
    Simple,
    Complex { properties: Vec<Property> },
    Collection { element: MetadataRef, elements: ElementLister },
}

/// A reference to a descriptor, either held directly or resolved through the
/// [`MetadataProvider`] at visit time.
///
/// The deferred form is what makes recursive types expressible: a
/// `LinkedListNode` property of type `LinkedListNode` refers to its own
/// descriptor by type rather than by value.
#[derive(Clone)]
pub enum MetadataRef {
    /// A descriptor held directly.
    Inline(Arc<Metadata>),
    /// A descriptor looked up by type when the property is visited.
    ForType {
        /// The type to resolve.
        id: TypeId,
        /// The type's name, for diagnostics.
        name: &'static str,
    },
}

impl MetadataRef {
    /// Creates a deferred reference to the descriptor registered for `T`.
    pub fn of<T: 'static>() -> Self {
        MetadataRef::ForType {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }
}

impl From<Arc<Metadata>> for MetadataRef {
    fn from(metadata: Arc<Metadata>) -> Self {
        MetadataRef::Inline(metadata)
    }
}

impl From<Metadata> for MetadataRef {
    fn from(metadata: Metadata) -> Self {
        MetadataRef::Inline(Arc::new(metadata))
    }
}

/// One declared property of a complex node.
///
/// The getter is a precompiled, strongly typed accessor wrapped for dynamic
/// dispatch; it returns `None` for an absent value or when the model is not
/// of the property's declaring type. Getters should return stored handles
/// (see [`crate::share`]) when instances need a stable identity for the side
/// table or cycle tracking.
pub struct Property {
    name: String,
    metadata: MetadataRef,
    getter: PropertyGetter,
}

impl Property {
    /// Creates a property descriptor for a field of `T`.
    pub fn new<T: 'static>(
        name: impl Into<String>,
        metadata: impl Into<MetadataRef>,
        getter: impl Fn(&T) -> Option<Node> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            metadata: metadata.into(),
            getter: Arc::new(move |model: &Node| {
                model.downcast_ref::<T>().and_then(|typed| getter(typed))
            }),
        }
    }

    /// The declared property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property's own descriptor reference.
    pub fn metadata(&self) -> &MetadataRef {
        &self.metadata
    }

    /// Reads the property's value from `model`.
    pub fn get(&self, model: &Node) -> Option<Node> {
        (self.getter)(model)
    }
}

/// Externally supplied descriptor of a node's shape.
pub struct Metadata {
    type_name: &'static str,
    underlying_type: TypeId,
    pub(crate) kind: Kind,
}

impl std::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metadata")
            .field("type_name", &self.type_name)
            .field("underlying_type", &self.underlying_type)
            .finish_non_exhaustive()
    }
}

impl Metadata {
    /// Creates a descriptor for a leaf value of type `T`.
    pub fn simple<T: 'static>() -> Self {
        Self {
            type_name: any::type_name::<T>(),
            underlying_type: TypeId::of::<T>(),
            kind: Kind::Simple,
        }
    }

    /// Creates a descriptor for a complex value of type `T` with the given
    /// properties, iterated in declaration order.
    pub fn complex<T: 'static>(properties: Vec<Property>) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            underlying_type: TypeId::of::<T>(),
            kind: Kind::Complex { properties },
        }
    }

    /// Creates a descriptor for a collection of type `T`.
    ///
    /// `elements` enumerates the collection's elements in order; absent
    /// elements are `None`. `element` describes each element's shape.
    pub fn collection<T: 'static>(
        element: impl Into<MetadataRef>,
        elements: impl Fn(&T) -> Vec<Option<Node>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            underlying_type: TypeId::of::<T>(),
            kind: Kind::Collection {
                element: element.into(),
                elements: Arc::new(move |model: &Node| {
                    model
                        .downcast_ref::<T>()
                        .map(|typed| elements(typed))
                        .unwrap_or_default()
                }),
            },
        }
    }

    /// The name of the described type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The underlying model type, used for exclusion checks.
    pub fn underlying_type(&self) -> TypeId {
        self.underlying_type
    }

    /// True if the described shape is a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, Kind::Collection { .. })
    }

    /// True if the described shape is complex.
    pub fn is_complex(&self) -> bool {
        matches!(self.kind, Kind::Complex { .. })
    }

    /// The declared properties of a complex shape, empty otherwise.
    pub fn properties(&self) -> &[Property] {
        match &self.kind {
            Kind::Complex { properties } => properties,
            _ => &[],
        }
    }

    /// The element descriptor of a collection shape.
    pub fn element(&self) -> Option<&MetadataRef> {
        match &self.kind {
            Kind::Collection { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Enumerates the elements of `model` for a collection shape.
    pub fn elements(&self, model: &Node) -> Vec<Option<Node>> {
        match &self.kind {
            Kind::Collection { elements, .. } => elements(model),
            _ => Vec::new(),
        }
    }
}

/// Supplies shape descriptors for runtime types.
pub trait MetadataProvider: Send + Sync {
    /// Returns the descriptor registered for `type_id`, if any.
    fn metadata_for(&self, type_id: TypeId) -> Option<Arc<Metadata>>;
}

/// A thread-safe, per-type descriptor cache.
///
/// Descriptors are registered once per type and shared by every validation
/// run. Registration takes `&self`, so a registry can be built behind an
/// `Arc` and handed to an [`crate::ObjectValidator`] up front.
///
/// # Example
///
/// ```rust
/// use walkabout::{Metadata, MetadataRegistry};
///
/// let registry = MetadataRegistry::new();
/// registry.register(Metadata::simple::<i32>()).unwrap();
///
/// // Duplicate registration fails.
/// assert!(registry.register(Metadata::simple::<i32>()).is_err());
/// ```
pub struct MetadataRegistry {
    entries: RwLock<HashMap<TypeId, Arc<Metadata>>>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a descriptor under its own underlying type, returning the
    /// shared handle for reuse in inline references.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the type already has a
    /// descriptor.
    pub fn register(&self, metadata: Metadata) -> Result<Arc<Metadata>, RegistryError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&metadata.underlying_type) {
            return Err(RegistryError::Duplicate(metadata.type_name));
        }
        let metadata = Arc::new(metadata);
        entries.insert(metadata.underlying_type, Arc::clone(&metadata));
        Ok(metadata)
    }

    /// Returns the descriptor registered for `type_id`, if any.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<Metadata>> {
        self.entries.read().get(&type_id).cloned()
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for MetadataRegistry {
    fn metadata_for(&self, type_id: TypeId) -> Option<Arc<Metadata>> {
        self.get(type_id)
    }
}

/// Errors from descriptor registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A descriptor for the type is already registered.
    #[error("metadata for type '{0}' already registered")]
    Duplicate(&'static str),
}
