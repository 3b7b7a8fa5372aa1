//! Document assembler: group tree to and from the flat filter array.
//!
//! The flat form interleaves canonical filter objects with explicit
//! `{"operator":"OR"}` separators, one at each group boundary after the
//! first non-empty group and never at the ends. Serialization enforces that
//! invariant; deserialization is its inverse, routing each decoded entry
//! through the placement engine.

use serde_json::Value;

use crate::codec;
use crate::config::SkipPolicy;
use crate::placement;
use crate::tree::GroupTree;

/// Serializes the group tree to the flat filter array.
///
/// Empty groups contribute nothing; conditions that fail to encode (a Tag
/// with no key) are dropped. A defensive post-pass strips a leading or
/// trailing separator should one survive.
#[must_use]
pub fn serialize(tree: &GroupTree) -> Vec<Value> {
    let mut filters: Vec<Value> = Vec::new();

    for group in tree.groups() {
        let entries: Vec<Value> = group
            .conditions()
            .filter_map(|(_, cond)| codec::encode(cond))
            .collect();
        if entries.is_empty() {
            continue;
        }
        if !filters.is_empty() {
            filters.push(codec::separator());
        }
        filters.extend(entries);
    }

    while filters.first().is_some_and(codec::is_separator) {
        filters.remove(0);
    }
    while filters.last().is_some_and(codec::is_separator) {
        filters.pop();
    }

    filters
}

/// Rebuilds a group tree from the flat filter array.
///
/// Starts from a single fresh group. An explicit OR separator appends a new
/// group which becomes the routing target; every other entry is decoded and
/// routed through the placement engine with the current target preferred,
/// the target advancing to wherever the condition actually landed. Entries
/// that fail to decode are skipped without aborting the import, logged or
/// not per `policy`.
#[must_use]
pub fn deserialize(entries: &[Value], policy: SkipPolicy) -> GroupTree {
    let mut tree = GroupTree::new();
    let mut target = tree.first_group();

    for (index, entry) in entries.iter().enumerate() {
        if codec::is_separator(entry) {
            if codec::is_or_separator(entry) {
                target = tree.push_group();
            } else if policy == SkipPolicy::Warn {
                tracing::warn!(index, "skipping unrecognized separator entry");
            }
            continue;
        }

        match codec::decode(entry) {
            Some(condition) => match placement::place(&mut tree, Some(target), condition) {
                Ok((placed, _)) => target = placed,
                Err(err) => {
                    tracing::error!(index, error = %err, "failed to place decoded condition");
                }
            },
            None => {
                if policy == SkipPolicy::Warn {
                    tracing::warn!(index, "skipping unrecognized filter entry");
                }
            }
        }
    }

    let last = tree.last_group();
    let _ = tree.set_active(last);
    tree
}
