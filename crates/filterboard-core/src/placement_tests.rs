//! Tests for the group placement engine.

use crate::condition::{values_of, Condition};
use crate::field::Field;
use crate::placement::{fits_in_group, place};
use crate::schema::Prop;
use crate::tree::GroupTree;

fn tag(key: &str, relation: &str, value: &str) -> Condition {
    let mut values = values_of([(Prop::Key, key), (Prop::Relation, relation)]);
    if !value.is_empty() {
        values.insert(Prop::Value, value.to_string());
    }
    Condition::new(Field::Tag, values)
}

fn country(relation: &str, value: &str) -> Condition {
    Condition::new(
        Field::Country,
        values_of([(Prop::Relation, relation), (Prop::Value, value)]),
    )
}

fn seeded(conditions: &[Condition]) -> GroupTree {
    let mut tree = GroupTree::new();
    let first = tree.first_group();
    for cond in conditions {
        tree.insert(first, cond.clone()).unwrap();
    }
    tree
}

#[test]
fn test_empty_group_accepts_anything() {
    let tree = GroupTree::new();
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &country("is", "US")));
    assert!(fits_in_group(group, &tag("plan", "is greater than", "10")));
}

#[test]
fn test_duplicate_equality_conflicts() {
    // "Country is United States" + "Country is Canada" cannot share an
    // AND-group.
    let mut tree = seeded(&[country("is", "United States")]);
    let first = tree.first_group();

    let (placed, _) = place(&mut tree, Some(first), country("is", "Canada")).unwrap();
    assert_ne!(placed, first);
    assert_eq!(tree.groups().len(), 2);
}

#[test]
fn test_multiple_negations_coexist() {
    let tree = seeded(&[country("is not", "FR"), country("is not", "DE")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &country("is not", "ES")));
    assert!(!fits_in_group(group, &country("is", "US")));
}

#[test]
fn test_mixed_field_conditions_coexist() {
    let tree = seeded(&[country("is", "US")]);
    let group = tree.group(tree.first_group()).unwrap();
    let language = Condition::new(
        Field::Language,
        values_of([(Prop::Relation, "is"), (Prop::Value, "en")]),
    );
    assert!(fits_in_group(group, &language));
}

#[test]
fn test_tag_infeasible_range_opens_new_group() {
    // plan > 10 then plan < 5: empty range, must not share a group.
    let mut tree = seeded(&[tag("plan", "is greater than", "10")]);
    let first = tree.first_group();

    let (placed, _) = place(&mut tree, Some(first), tag("plan", "is less than", "5")).unwrap();
    assert_ne!(placed, first);
}

#[test]
fn test_tag_feasible_range_stays() {
    // plan > 10 then plan < 20: 10 < 20 holds.
    let mut tree = seeded(&[tag("plan", "is greater than", "10")]);
    let first = tree.first_group();

    let (placed, _) = place(&mut tree, Some(first), tag("plan", "is less than", "20")).unwrap();
    assert_eq!(placed, first);
    assert_eq!(tree.groups().len(), 1);
}

#[test]
fn test_tag_bounds_tighten_across_conditions() {
    let tree = seeded(&[
        tag("plan", "is greater than", "10"),
        tag("plan", "is less than", "20"),
    ]);
    let group = tree.group(tree.first_group()).unwrap();

    // 15 still fits between the bounds; 25 does not.
    assert!(fits_in_group(group, &tag("plan", "is greater than", "15")));
    assert!(!fits_in_group(group, &tag("plan", "is greater than", "25")));
    assert!(!fits_in_group(group, &tag("plan", "is less than", "5")));
}

#[test]
fn test_tag_time_elapsed_shares_bound_pool() {
    let tree = seeded(&[tag("last_seen", "time elapsed since is greater than", "48")]);
    let group = tree.group(tree.first_group()).unwrap();

    assert!(fits_in_group(
        group,
        &tag("last_seen", "time elapsed since is less than", "72")
    ));
    assert!(!fits_in_group(
        group,
        &tag("last_seen", "time elapsed since is less than", "24")
    ));
    // The plain comparators pool with the time-elapsed ones.
    assert!(!fits_in_group(group, &tag("last_seen", "is less than", "12")));
}

#[test]
fn test_tag_non_numeric_comparator_is_isolated() {
    let mut tree = GroupTree::new();
    let first = tree.first_group();

    let (placed, _) = place(&mut tree, Some(first), tag("plan", "is greater than", "gold")).unwrap();
    assert_ne!(placed, first, "non-numeric comparator must not join a group");
}

#[test]
fn test_tag_equality_same_value_is_idempotent() {
    let tree = seeded(&[tag("plan", "is", "pro")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &tag("plan", "is", "pro")));
    assert!(!fits_in_group(group, &tag("plan", "is", "gold")));
}

#[test]
fn test_tag_equality_dominates_other_relations() {
    let tree = seeded(&[tag("plan", "is", "pro")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(!fits_in_group(group, &tag("plan", "is not", "gold")));
    assert!(!fits_in_group(group, &tag("plan", "is greater than", "1")));
    assert!(!fits_in_group(group, &tag("plan", "exists", "")));
}

#[test]
fn test_tag_equality_kept_apart_from_open_comparators() {
    let tree = seeded(&[tag("plan", "is greater than", "10")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(!fits_in_group(group, &tag("plan", "is", "15")));
}

#[test]
fn test_tag_exists_rules() {
    let tree = seeded(&[tag("plan", "is greater than", "10")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &tag("plan", "exists", "")));

    let tree = seeded(&[tag("plan", "doesn't exist", "")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(!fits_in_group(group, &tag("plan", "exists", "")));
}

#[test]
fn test_tag_not_exists_combines_with_nothing_else() {
    let tree = seeded(&[tag("plan", "is not", "pro")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(!fits_in_group(group, &tag("plan", "doesn't exist", "")));

    // Repeating the same not_exists is idempotent.
    let tree = seeded(&[tag("plan", "doesn't exist", "")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &tag("plan", "doesn't exist", "")));
}

#[test]
fn test_tag_inequalities_always_fit() {
    let tree = seeded(&[
        tag("plan", "is not", "free"),
        tag("plan", "is greater than", "10"),
    ]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &tag("plan", "is not", "trial")));
}

#[test]
fn test_tag_scoped_by_key_not_field() {
    // Different keys never interact.
    let tree = seeded(&[tag("plan", "is", "pro")]);
    let group = tree.group(tree.first_group()).unwrap();
    assert!(fits_in_group(group, &tag("tier", "is", "gold")));
    assert!(fits_in_group(group, &tag("tier", "is greater than", "3")));
}

#[test]
fn test_place_prefers_any_accepting_group_before_creating_one() {
    let mut tree = GroupTree::new();
    let first = tree.first_group();
    tree.insert(first, country("is", "US")).unwrap();
    let second = tree.push_group();
    tree.insert(second, country("is", "CA")).unwrap();

    // Conflicts with the preferred second group but fits the first.
    let language = Condition::new(
        Field::Language,
        values_of([(Prop::Relation, "is"), (Prop::Value, "en")]),
    );
    tree.insert(second, language.clone()).unwrap();
    let (placed, _) = place(&mut tree, Some(second), language).unwrap();
    assert_eq!(placed, first);
    assert_eq!(tree.groups().len(), 2);
}

#[test]
fn test_place_activates_target() {
    let mut tree = seeded(&[country("is", "US")]);
    let first = tree.first_group();

    let (placed, _) = place(&mut tree, Some(first), country("is", "CA")).unwrap();
    assert_eq!(tree.active(), placed);
}

#[test]
fn test_place_without_preference_uses_last_group() {
    let mut tree = GroupTree::new();
    tree.push_group();
    let last = tree.last_group();

    let (placed, _) = place(&mut tree, None, country("is", "US")).unwrap();
    assert_eq!(placed, last);
}
