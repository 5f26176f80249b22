//! Unit tests for the sort-order rotation state machine.

use pretty_assertions::assert_eq;

use super::*;
use crate::catalog::{Criterion, Direction};

fn keys(order: &SortOrder) -> Vec<Criterion> {
    order.entries().iter().map(|e| e.criterion).collect()
}

#[test]
fn test_default_order_matches_catalog() {
    let order = SortOrder::default();
    assert_eq!(
        keys(&order),
        vec![
            Criterion::Age,
            Criterion::Comments,
            Criterion::Voted,
            Criterion::Support,
            Criterion::Tilt,
        ]
    );
    assert_eq!(order.entries()[0].direction, Direction::Newest);
    assert_eq!(order.entries()[4].direction, Direction::Even);
    assert!(order.is_valid());
}

#[test]
fn test_reorder_moves_criterion_to_front() {
    let mut order = SortOrder::default();
    order.reorder("voted").unwrap();

    assert_eq!(
        keys(&order),
        vec![
            Criterion::Voted,
            Criterion::Age,
            Criterion::Comments,
            Criterion::Support,
            Criterion::Tilt,
        ]
    );
    // Move-to-front keeps the direction it had.
    assert_eq!(order.entries()[0].direction, Direction::Most);
}

#[test]
fn test_reorder_first_toggles_direction() {
    let mut order = SortOrder::default();
    order.reorder("voted").unwrap();
    order.reorder("voted").unwrap();

    assert_eq!(keys(&order)[0], Criterion::Voted);
    assert_eq!(order.entries()[0].direction, Direction::Least);

    // A third reorder toggles back.
    order.reorder("voted").unwrap();
    assert_eq!(order.entries()[0].direction, Direction::Most);
}

#[test]
fn test_reorder_preserves_relative_order_of_rest() {
    let mut order = SortOrder::default();
    order.reorder("support").unwrap();

    let rest: Vec<Criterion> = keys(&order)[1..].to_vec();
    assert_eq!(
        rest,
        vec![
            Criterion::Age,
            Criterion::Comments,
            Criterion::Voted,
            Criterion::Tilt,
        ]
    );
}

#[test]
fn test_reorder_unknown_key_fails() {
    let mut order = SortOrder::default();
    let before = order.clone();

    let err = order.reorder("flavor").unwrap_err();
    assert!(err.to_string().contains("flavor"));
    assert_eq!(order, before);
}

#[test]
fn test_coverage_invariant_over_many_reorders() {
    let mut order = SortOrder::default();
    for key in [
        "tilt", "age", "age", "support", "voted", "comments", "tilt", "voted", "voted", "age",
    ] {
        order.reorder(key).unwrap();
        assert!(order.is_valid(), "invariant broken after reorder({})", key);
        assert_eq!(order.entries().len(), 5);
    }
}

#[test]
fn test_order_clause_follows_precedence_with_id_tie_break() {
    let order = SortOrder::default();
    assert_eq!(
        order.order_clause(),
        "created_at DESC, comment_count DESC, vote_count DESC, \
         vote_proportion DESC, vote_proportion_away_mid ASC, id ASC"
    );

    let mut order = SortOrder::default();
    order.reorder("tilt").unwrap();
    assert!(order
        .order_clause()
        .starts_with("vote_proportion_away_mid ASC"));
    assert!(order.order_clause().ends_with("id ASC"));
}

#[test]
fn test_toggled_direction_changes_order_clause() {
    let mut order = SortOrder::default();
    order.reorder("age").unwrap();
    assert!(order.order_clause().starts_with("created_at ASC"));
}

#[test]
fn test_sort_order_serde_round_trip() {
    let mut order = SortOrder::default();
    order.reorder("support").unwrap();
    order.reorder("support").unwrap();

    let json = serde_json::to_string(&order).unwrap();
    let back: SortOrder = serde_json::from_str(&json).unwrap();
    assert_eq!(back, order);
    assert!(back.is_valid());
}

#[test]
fn test_invalid_deserialized_order_is_detected() {
    // Duplicate criterion.
    let json = r#"[
        {"criterion":"age","direction":"newest"},
        {"criterion":"age","direction":"oldest"},
        {"criterion":"voted","direction":"most"},
        {"criterion":"support","direction":"most"},
        {"criterion":"tilt","direction":"even"}
    ]"#;
    let order: SortOrder = serde_json::from_str(json).unwrap();
    assert!(!order.is_valid());

    // Direction belonging to another criterion.
    let json = r#"[
        {"criterion":"age","direction":"most"},
        {"criterion":"comments","direction":"most"},
        {"criterion":"voted","direction":"most"},
        {"criterion":"support","direction":"most"},
        {"criterion":"tilt","direction":"even"}
    ]"#;
    let order: SortOrder = serde_json::from_str(json).unwrap();
    assert!(!order.is_valid());
}
