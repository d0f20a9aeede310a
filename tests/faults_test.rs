//! Hard faults: depth protection and unresolvable metadata.

mod common;

use std::sync::Arc;

use common::{Customer, Order, Person};
use parking_lot::RwLock;
use walkabout::{
    node, share, ErrorCollection, Metadata, MetadataRef, MetadataRegistry, Node, ObjectValidator,
    Property, RuleRegistry, ValidationStateMap, VisitError,
};

struct LinkedNode {
    value: i32,
    next: RwLock<Option<Node>>,
}

fn chain(len: usize) -> Node {
    let head = Arc::new(LinkedNode {
        value: 0,
        next: RwLock::new(None),
    });
    let mut tail = Arc::clone(&head);
    for value in 1..len as i32 {
        let next = Arc::new(LinkedNode {
            value,
            next: RwLock::new(None),
        });
        *tail.next.write() = Some(share(&next));
        tail = next;
    }
    head
}

#[test]
fn test_deep_graph_hits_the_depth_limit() {
    let registry = MetadataRegistry::new();
    registry
        .register(Metadata::complex::<LinkedNode>(vec![
            Property::new("Value", Metadata::simple::<i32>(), |n: &LinkedNode| {
                Some(node(n.value))
            }),
            Property::new("Next", MetadataRef::of::<LinkedNode>(), |n: &LinkedNode| {
                n.next.read().clone()
            }),
        ]))
        .unwrap();

    let rules = RuleRegistry::new();
    let validator = ObjectValidator::new(Arc::new(registry)).with_max_depth(4);
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = chain(10);

    let err = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap_err();

    match err {
        VisitError::DepthLimitExceeded { limit, key } => {
            assert_eq!(limit, 4);
            assert!(key.contains("Next"));
        }
        other => panic!("expected a depth fault, got {other}"),
    }
}

#[test]
fn test_deep_graph_within_the_limit_is_fine() {
    let registry = MetadataRegistry::new();
    registry
        .register(Metadata::complex::<LinkedNode>(vec![Property::new(
            "Next",
            MetadataRef::of::<LinkedNode>(),
            |n: &LinkedNode| n.next.read().clone(),
        )]))
        .unwrap();

    let rules = RuleRegistry::new();
    let validator = ObjectValidator::new(Arc::new(registry)).with_max_depth(20);
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = chain(10);

    assert!(validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap());
}

#[test]
fn test_unregistered_root_type_is_a_fault() {
    let registry = MetadataRegistry::new();
    let rules = RuleRegistry::new();
    let validator = ObjectValidator::new(Arc::new(registry));
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(Person {
        name: None,
        age: 30,
    });

    let err = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap_err();

    assert!(matches!(err, VisitError::MissingRootMetadata));
}

#[test]
fn test_unresolvable_property_reference_names_the_type() {
    // Order points at Customer by type, but Customer is never registered.
    let registry = MetadataRegistry::new();
    registry
        .register(Metadata::complex::<Order>(vec![Property::new(
            "Customer",
            MetadataRef::of::<Customer>(),
            |o: &Order| Some(share(&o.customer)),
        )]))
        .unwrap();

    let rules = RuleRegistry::new();
    let validator = ObjectValidator::new(Arc::new(registry));
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(Order {
        customer: Arc::new(Customer { id: 1 }),
    });

    let err = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap_err();

    match err {
        VisitError::MissingMetadata(name) => assert!(name.contains("Customer")),
        other => panic!("expected a missing-metadata fault, got {other}"),
    }
}
