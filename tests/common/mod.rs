//! Shared model types, metadata, and rules for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use walkabout::{
    node, share, Metadata, MetadataRef, MetadataRegistry, Property, Rule, RuleContext, RuleResult,
};

pub struct Person {
    pub name: Option<String>,
    pub age: i32,
}

pub struct Customer {
    pub id: i32,
}

pub struct Order {
    pub customer: Arc<Customer>,
}

/// Registers the `Person` shape: a complex node with a nullable `Name` and
/// an `Age` leaf.
pub fn register_person(registry: &MetadataRegistry) {
    registry
        .register(Metadata::complex::<Person>(vec![
            Property::new("Name", Metadata::simple::<String>(), |p: &Person| {
                p.name.clone().map(node)
            }),
            Property::new("Age", Metadata::simple::<i32>(), |p: &Person| {
                Some(node(p.age))
            }),
        ]))
        .unwrap();
}

/// Registers `Order` and `Customer`; the `Customer` property resolves its
/// metadata through the provider and hands out the stored handle so the
/// instance keeps a stable identity.
pub fn register_order(registry: &MetadataRegistry) {
    registry
        .register(Metadata::complex::<Customer>(vec![Property::new(
            "Id",
            Metadata::simple::<i32>(),
            |c: &Customer| Some(node(c.id)),
        )]))
        .unwrap();
    registry
        .register(Metadata::complex::<Order>(vec![Property::new(
            "Customer",
            MetadataRef::of::<Customer>(),
            |o: &Order| Some(share(&o.customer)),
        )]))
        .unwrap();
}

/// Registers `Vec<i32>` as a collection of `i32` leaves.
pub fn register_scores(registry: &MetadataRegistry) {
    registry
        .register(Metadata::collection::<Vec<i32>>(
            Metadata::simple::<i32>(),
            |v: &Vec<i32>| v.iter().map(|n| Some(node(*n))).collect(),
        ))
        .unwrap();
}

/// Fails any `i32` below zero.
pub struct NonNegative;

impl Rule for NonNegative {
    fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
        match cx.model.and_then(|m| m.downcast_ref::<i32>()) {
            Some(n) if *n < 0 => vec![RuleResult::for_node("must be greater than or equal to 0")],
            _ => Vec::new(),
        }
    }
}

/// Fails a `Person` without a name, reporting against the `Name` member.
pub struct NameRequired;

impl Rule for NameRequired {
    fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
        match cx.model.and_then(|m| m.downcast_ref::<Person>()) {
            Some(p) if p.name.is_none() => vec![RuleResult::new("Name", "is required")],
            _ => Vec::new(),
        }
    }
}

/// Counts invocations and always passes.
pub struct CountingRule {
    hits: Arc<AtomicUsize>,
}

impl CountingRule {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        (
            Self {
                hits: Arc::clone(&hits),
            },
            hits,
        )
    }
}

impl Rule for CountingRule {
    fn validate(&self, _cx: &RuleContext<'_>) -> Vec<RuleResult> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

pub fn hit_count(hits: &Arc<AtomicUsize>) -> usize {
    hits.load(Ordering::SeqCst)
}
