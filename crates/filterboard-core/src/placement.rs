//! Group placement engine.
//!
//! Given the existing tree of AND-groups and an incoming condition, decides
//! whether the condition may join a candidate group or must open a new OR'd
//! group. The rules reconstruct, from what is already in a group, whether
//! adding the new condition keeps the group satisfiable: conflicting or
//! redundant conditions must not silently share one AND-group.

use crate::condition::Condition;
use crate::error::Result;
use crate::field::Field;
use crate::relation::Relation;
use crate::schema::Prop;
use crate::tree::{ConditionId, Group, GroupId, GroupTree};

/// Whether the incoming condition may join this group without breaking the
/// group's satisfiability rules.
///
/// Scoping: Tag conditions are compared only against conditions with the
/// same tag key; every other field is compared against conditions of the
/// same field.
#[must_use]
pub fn fits_in_group(group: &Group, incoming: &Condition) -> bool {
    if incoming.field == Field::Tag {
        let key = incoming.tag_key();
        let same_key: Vec<&Condition> = group
            .conditions()
            .map(|(_, cond)| cond)
            .filter(|cond| cond.field == Field::Tag && cond.tag_key() == key)
            .collect();
        tag_fits(&same_key, incoming)
    } else {
        let same_field: Vec<&Condition> = group
            .conditions()
            .map(|(_, cond)| cond)
            .filter(|cond| cond.field == incoming.field)
            .collect();
        if same_field.is_empty() {
            return true;
        }
        // Multiple negations coexist; any other duplicate conflicts.
        incoming.relation() == Relation::Ne
            && same_field.iter().all(|cond| cond.relation() == Relation::Ne)
    }
}

fn tag_fits(same_key: &[&Condition], incoming: &Condition) -> bool {
    let relation = incoming.relation();
    let value = incoming.get(Prop::Value).unwrap_or("");

    if same_key.is_empty() {
        // A comparator whose value is not numeric is unsafe to combine with
        // anything later; keep it alone from the start.
        return !(relation.is_comparator() && numeric(value).is_none());
    }

    // Equality dominates: once an "is" holds for this key, only the
    // identical "is" may share the group.
    if same_key.iter().any(|cond| cond.relation() == Relation::Eq) {
        return relation == Relation::Eq
            && same_key.iter().any(|cond| {
                cond.relation() == Relation::Eq && cond.get(Prop::Value).unwrap_or("") == value
            });
    }

    match relation {
        // No matching equality exists, so pairing with the existing
        // conditions for this key would be contradictory or confusing.
        Relation::Eq => false,
        Relation::Exists => !same_key
            .iter()
            .any(|cond| cond.relation() == Relation::NotExists),
        Relation::NotExists => same_key
            .iter()
            .all(|cond| cond.relation() == Relation::NotExists),
        // Multiple inequalities for the same key are compatible.
        Relation::Ne => true,
        _ => {
            if numeric(value).is_none() {
                return false;
            }
            bounds_feasible(same_key, incoming)
        }
    }
}

/// Range feasibility over the existing same-key comparators plus the
/// incoming one: satisfiable iff `max(lower bounds) < min(upper bounds)`
/// whenever both sides are bounded. A single-sided range always passes.
fn bounds_feasible(same_key: &[&Condition], incoming: &Condition) -> bool {
    let mut lower: Option<f64> = None;
    let mut upper: Option<f64> = None;

    for cond in same_key.iter().copied().chain(std::iter::once(incoming)) {
        let relation = cond.relation();
        let Some(bound) = numeric(cond.get(Prop::Value).unwrap_or("")) else {
            continue;
        };
        if relation.is_lower_bound() {
            lower = Some(lower.map_or(bound, |cur| cur.max(bound)));
        } else if relation.is_upper_bound() {
            upper = Some(upper.map_or(bound, |cur| cur.min(bound)));
        }
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => lo < hi,
        _ => true,
    }
}

fn numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Routes a condition to a group, creating one only when necessary.
///
/// The preferred (active/candidate) group is tried first, then every other
/// group in document order; a brand-new group is appended at the end only
/// when every existing group would violate the placement rules. The chosen
/// group becomes active.
pub fn place(
    tree: &mut GroupTree,
    preferred: Option<GroupId>,
    condition: Condition,
) -> Result<(GroupId, ConditionId)> {
    let candidate = preferred
        .filter(|id| tree.group(*id).is_some())
        .unwrap_or_else(|| tree.last_group());

    let mut target = None;
    if let Some(group) = tree.group(candidate) {
        if fits_in_group(group, &condition) {
            target = Some(candidate);
        }
    }
    if target.is_none() {
        target = tree
            .groups()
            .iter()
            .filter(|group| group.id() != candidate)
            .find(|group| fits_in_group(group, &condition))
            .map(Group::id);
    }

    let target = match target {
        Some(id) => id,
        None => {
            let id = tree.push_group();
            tracing::debug!(group = %id, "opened a new group for conflicting condition");
            id
        }
    };

    let node = tree.insert(target, condition)?;
    tree.set_active(target)?;
    Ok((target, node))
}
