//! Validation of collection nodes and their elements.

mod common;

use std::sync::Arc;

use common::{register_scores, NonNegative};
use walkabout::{
    node, ErrorCollection, FieldStatus, Metadata, MetadataRegistry, ObjectValidator, Property,
    Rule, RuleContext, RuleRegistry, RuleResult, ValidationStateMap,
};

/// Fails a `Vec<i32>` with fewer than `min` elements.
struct MinItems(usize);

impl Rule for MinItems {
    fn validate(&self, cx: &RuleContext<'_>) -> Vec<RuleResult> {
        match cx.model.and_then(|m| m.downcast_ref::<Vec<i32>>()) {
            Some(v) if v.len() < self.0 => {
                vec![RuleResult::for_node(format!(
                    "must contain at least {} item(s)",
                    self.0
                ))]
            }
            _ => Vec::new(),
        }
    }
}

fn scores_validator() -> ObjectValidator {
    let registry = MetadataRegistry::new();
    register_scores(&registry);
    ObjectValidator::new(Arc::new(registry))
}

#[test]
fn test_failing_element_is_keyed_by_index() {
    let rules = RuleRegistry::new();
    rules.add::<i32>(NonNegative);

    let validator = scores_validator();
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(vec![1, -2, 3]);

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    assert!(!valid);
    assert_eq!(errors.field_status("[1]"), FieldStatus::Invalid);
    // Passing elements without pre-registered entries stay untouched.
    assert!(errors.entry("[0]").is_none());
    assert!(errors.entry("[2]").is_none());
    assert_eq!(errors.error_count(), 1);
}

#[test]
fn test_passing_elements_with_entries_are_marked_valid() {
    let rules = RuleRegistry::new();
    rules.add::<i32>(NonNegative);

    let validator = scores_validator();
    let mut errors = ErrorCollection::new();
    errors.ensure_entry("[0]");
    errors.ensure_entry("[2]");
    let state = ValidationStateMap::new();
    let model = node(vec![1, -2, 3]);

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    assert!(!valid);
    assert_eq!(errors.field_status("[0]"), FieldStatus::Valid);
    assert_eq!(errors.field_status("[1]"), FieldStatus::Invalid);
    assert_eq!(errors.field_status("[2]"), FieldStatus::Valid);
}

#[test]
fn test_all_failing_elements_are_each_reported() {
    let rules = RuleRegistry::new();
    rules.add::<i32>(NonNegative);

    let validator = scores_validator();
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(vec![-1, -2]);

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    // Element visits don't short-circuit; every failure is recorded.
    assert!(!valid);
    assert_eq!(errors.field_status("[0]"), FieldStatus::Invalid);
    assert_eq!(errors.field_status("[1]"), FieldStatus::Invalid);
}

#[test]
fn test_collection_under_property_uses_indexed_property_keys() {
    struct Team {
        scores: Vec<i32>,
    }

    let registry = MetadataRegistry::new();
    register_scores(&registry);
    registry
        .register(Metadata::complex::<Team>(vec![Property::new(
            "Scores",
            walkabout::MetadataRef::of::<Vec<i32>>(),
            |t: &Team| Some(node(t.scores.clone())),
        )]))
        .unwrap();

    let rules = RuleRegistry::new();
    rules.add::<i32>(NonNegative);

    let validator = ObjectValidator::new(Arc::new(registry));
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(Team {
        scores: vec![5, -6],
    });

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    assert!(!valid);
    assert_eq!(errors.field_status("Scores[1]"), FieldStatus::Invalid);
}

#[test]
fn test_node_level_rule_runs_on_the_collection_itself() {
    let rules = RuleRegistry::new();
    rules.add::<Vec<i32>>(MinItems(1));

    let validator = scores_validator();
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(Vec::<i32>::new());

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    assert!(!valid);
    assert_eq!(errors.field_status(""), FieldStatus::Invalid);
    assert_eq!(
        errors.entry("").unwrap().errors(),
        ["must contain at least 1 item(s)"]
    );
}

#[test]
fn test_node_level_rule_skipped_when_an_element_already_failed() {
    let rules = RuleRegistry::new();
    rules.add::<i32>(NonNegative);
    rules.add::<Vec<i32>>(MinItems(5));

    let validator = scores_validator();
    let mut errors = ErrorCollection::new();
    let state = ValidationStateMap::new();
    let model = node(vec![-1]);

    let valid = validator
        .validate(&rules, &mut errors, &state, &model)
        .unwrap();

    // The element failure makes the subtree invalid; the collection's own
    // rules are not evaluated on an already-invalid subtree.
    assert!(!valid);
    assert_eq!(errors.field_status("[0]"), FieldStatus::Invalid);
    assert!(errors.entry("").is_none());
}
