//! Explicit in-memory group tree.
//!
//! An arena of [`Group`] records, each holding an ordered list of
//! [`Condition`]s under stable identifiers. The rendering surface observes
//! this structure; it never derives tree shape from rendered output.

use std::collections::BTreeMap;
use std::fmt;

use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::relation::Relation;

/// Stable identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Stable identifier of a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(u64);

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// An ordered list of conditions, implicitly AND'ed. Consecutive groups in
/// the tree are OR'd.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    conditions: Vec<(ConditionId, Condition)>,
}

impl Group {
    /// Stable id of this group.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Conditions in insertion order.
    pub fn conditions(&self) -> impl Iterator<Item = (ConditionId, &Condition)> {
        self.conditions.iter().map(|(id, cond)| (*id, cond))
    }

    /// Number of conditions in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// True when the group holds no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions overridden by an equality constraint in this group.
    ///
    /// For every non-Tag field with more than one condition here: once any
    /// of them uses "is", the others are redundant inside an AND-group and
    /// get flagged. Tag conditions are exempt (they are keyed by tag key and
    /// have their own feasibility handling at placement time).
    #[must_use]
    pub fn conflicted(&self) -> Vec<ConditionId> {
        let mut by_field: BTreeMap<Field, Vec<(ConditionId, bool)>> = BTreeMap::new();
        for (id, cond) in &self.conditions {
            if cond.field == Field::Tag {
                continue;
            }
            let is_equality = cond
                .relation_phrase()
                .is_some_and(|phrase| Relation::normalize(phrase) == "=");
            by_field.entry(cond.field).or_default().push((*id, is_equality));
        }

        let mut flagged = Vec::new();
        for nodes in by_field.values() {
            if nodes.len() <= 1 || !nodes.iter().any(|(_, eq)| *eq) {
                continue;
            }
            flagged.extend(nodes.iter().filter(|(_, eq)| !eq).map(|(id, _)| *id));
        }
        flagged.sort_unstable();
        flagged
    }
}

/// The ordered list of OR'd groups plus id bookkeeping.
///
/// Always holds at least one group; the first group is permanent.
#[derive(Debug, Clone)]
pub struct GroupTree {
    groups: Vec<Group>,
    active: GroupId,
    next_group: u64,
    next_condition: u64,
}

impl Default for GroupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTree {
    /// Creates a tree with the mandatory first group, empty and active.
    #[must_use]
    pub fn new() -> Self {
        let first = Group {
            id: GroupId(1),
            conditions: Vec::new(),
        };
        Self {
            active: first.id,
            groups: vec![first],
            next_group: 2,
            next_condition: 1,
        }
    }

    /// Groups in document order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Looks up a group by id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Zero-based document position of a group.
    #[must_use]
    pub fn position(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    /// Id of the permanent first group.
    #[must_use]
    pub fn first_group(&self) -> GroupId {
        self.groups[0].id
    }

    /// Id of the last group in document order.
    #[must_use]
    pub fn last_group(&self) -> GroupId {
        self.groups[self.groups.len() - 1].id
    }

    /// The currently active group (the preferred append target).
    #[must_use]
    pub const fn active(&self) -> GroupId {
        self.active
    }

    /// Activates a group.
    pub fn set_active(&mut self, id: GroupId) -> Result<()> {
        if self.group(id).is_none() {
            return Err(Error::UnknownGroup(id));
        }
        self.active = id;
        Ok(())
    }

    /// Appends a new empty group and returns its id.
    pub fn push_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.groups.push(Group {
            id,
            conditions: Vec::new(),
        });
        id
    }

    /// Appends a condition to a group, returning the new node's id.
    pub fn insert(&mut self, group: GroupId, condition: Condition) -> Result<ConditionId> {
        let id = ConditionId(self.next_condition);
        let slot = self
            .groups
            .iter_mut()
            .find(|g| g.id == group)
            .ok_or(Error::UnknownGroup(group))?;
        self.next_condition += 1;
        slot.conditions.push((id, condition));
        Ok(id)
    }

    /// Removes a condition, returning the group that owned it.
    pub fn remove_condition(&mut self, id: ConditionId) -> Result<GroupId> {
        for group in &mut self.groups {
            if let Some(pos) = group.conditions.iter().position(|(cid, _)| *cid == id) {
                group.conditions.remove(pos);
                return Ok(group.id);
            }
        }
        Err(Error::UnknownCondition(id))
    }

    /// Removes a group and its conditions.
    ///
    /// The first group is permanent. Removing the active group activates the
    /// last remaining one.
    pub fn remove_group(&mut self, id: GroupId) -> Result<()> {
        let pos = self.position(id).ok_or(Error::UnknownGroup(id))?;
        if pos == 0 {
            return Err(Error::PermanentGroup);
        }
        self.groups.remove(pos);
        if self.active == id {
            self.active = self.last_group();
        }
        Ok(())
    }

    /// Finds a condition and its owning group.
    #[must_use]
    pub fn find_condition(&self, id: ConditionId) -> Option<(GroupId, &Condition)> {
        self.groups.iter().find_map(|group| {
            group
                .conditions
                .iter()
                .find(|(cid, _)| *cid == id)
                .map(|(_, cond)| (group.id, cond))
        })
    }

    /// Total number of conditions across all groups.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}
