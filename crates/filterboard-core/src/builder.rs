//! Builder facade: the user-action entry points.
//!
//! Owns the group tree, its serialized mirror, and the last diagnostic, and
//! keeps all three consistent: every operation runs as an atomic,
//! synchronous reaction to one user action, and the mirror is regenerated
//! before the operation returns. A failed operation leaves prior state
//! untouched.

use serde::Serialize as _;
use serde_json::{json, Value};

use crate::condition::{Condition, PropertyValues};
use crate::config::{BuilderConfig, MirrorConfig, MirrorStyle};
use crate::document;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::placement;
use crate::surface::RenderSurface;
use crate::text::{self, Applied, Diagnostic};
use crate::tree::{ConditionId, Group, GroupId, GroupTree};

/// The audience-filter builder engine.
///
/// `S` is the rendering surface observing the tree; use
/// [`crate::surface::NullSurface`] for headless operation.
#[derive(Debug)]
pub struct FilterBuilder<S: RenderSurface> {
    tree: GroupTree,
    config: BuilderConfig,
    mirror: String,
    diagnostic: Option<Diagnostic>,
    surface: S,
}

impl<S: RenderSurface> FilterBuilder<S> {
    /// Creates a builder with the mandatory first group, announcing the
    /// initial state to the surface.
    pub fn new(config: BuilderConfig, surface: S) -> Self {
        let mut builder = Self {
            tree: GroupTree::new(),
            config,
            mirror: String::new(),
            diagnostic: None,
            surface,
        };
        let first = builder.tree.first_group();
        builder.surface.group_added(first, 0);
        builder.surface.group_activated(first);
        builder.refresh_mirror();
        builder
    }

    /// The group tree.
    #[must_use]
    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    /// The current serialized mirror text.
    #[must_use]
    pub fn mirror(&self) -> &str {
        &self.mirror
    }

    /// The diagnostic currently on display, if any.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the rendering surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Validates and places a new condition, routing it to a compatible
    /// group (possibly a new one) and refreshing the mirror.
    ///
    /// # Errors
    ///
    /// [`Error::MissingProperty`] when a required input is empty; nothing is
    /// mutated in that case.
    pub fn add_condition(&mut self, field: Field, values: PropertyValues) -> Result<ConditionId> {
        let condition = Condition::new(field, values);
        condition.validate()?;

        let known: Vec<GroupId> = self.tree.groups().iter().map(Group::id).collect();
        let preferred = self.tree.active();
        let (group, node) = placement::place(&mut self.tree, Some(preferred), condition)?;

        if !known.contains(&group) {
            let index = self.tree.position(group).unwrap_or(known.len());
            self.surface.group_added(group, index);
        }
        self.surface.group_activated(group);
        let summary = self
            .tree
            .find_condition(node)
            .map(|(_, cond)| cond.summary())
            .unwrap_or_default();
        self.surface.condition_added(group, node, &summary);
        self.notify_count(group);
        self.notify_conflicts(group);
        self.refresh_mirror();
        Ok(node)
    }

    /// Starts a fresh OR'd group and makes it the active append target.
    pub fn new_group(&mut self) -> GroupId {
        let group = self.tree.push_group();
        let index = self.tree.groups().len() - 1;
        let _ = self.tree.set_active(group);
        self.surface.group_added(group, index);
        self.surface.group_activated(group);
        self.refresh_mirror();
        group
    }

    /// Removes a single condition node.
    pub fn remove_condition(&mut self, node: ConditionId) -> Result<()> {
        let group = self.tree.remove_condition(node)?;
        self.surface.condition_removed(group, node);
        self.notify_count(group);
        self.notify_conflicts(group);
        self.refresh_mirror();
        Ok(())
    }

    /// Removes a group and its conditions. The first group is permanent.
    pub fn remove_group(&mut self, group: GroupId) -> Result<()> {
        self.tree.remove_group(group)?;
        self.surface.group_removed(group);
        self.surface.group_activated(self.tree.active());
        self.refresh_mirror();
        Ok(())
    }

    /// Makes a group the preferred append target.
    pub fn activate_group(&mut self, group: GroupId) -> Result<()> {
        self.tree.set_active(group)?;
        self.surface.group_activated(group);
        Ok(())
    }

    /// Applies hand-edited filter text, replacing the whole tree.
    ///
    /// Empty input is an explicit clear-all. On a diagnostic the tree is
    /// left exactly as before and the error is surfaced with its location.
    pub fn apply_text(&mut self, raw: &str) -> Result<()> {
        self.clear_diagnostic();
        match text::parse_filter_text(raw) {
            Ok(Applied::Cleared) => {
                self.replace_tree(GroupTree::new());
                Ok(())
            }
            Ok(Applied::Filters(entries)) => {
                let tree = document::deserialize(&entries, self.config.import.on_skipped_entry);
                self.replace_tree(tree);
                Ok(())
            }
            Err(diagnostic) => {
                self.surface.diagnostic_shown(&diagnostic);
                self.diagnostic = Some(diagnostic.clone());
                Err(Error::Parse(diagnostic))
            }
        }
    }

    /// The user started typing into the raw text: drop any stale diagnostic
    /// display without touching the tree.
    pub fn text_edited(&mut self) {
        self.clear_diagnostic();
    }

    /// Routes the current mirror text to the surface clipboard hook.
    pub fn copy_mirror(&mut self) {
        self.surface.copy_text(&self.mirror);
    }

    fn clear_diagnostic(&mut self) {
        if self.diagnostic.take().is_some() {
            self.surface.diagnostic_cleared();
        }
    }

    fn replace_tree(&mut self, tree: GroupTree) {
        self.tree = tree;
        self.surface.tree_reset();
        for (index, group) in self.tree.groups().iter().enumerate() {
            self.surface.group_added(group.id(), index);
            for (node, cond) in group.conditions() {
                self.surface.condition_added(group.id(), node, &cond.summary());
            }
            self.surface.group_count_changed(group.id(), group.len());
            let conflicted = group.conflicted();
            self.surface.conflicts_changed(group.id(), &conflicted);
        }
        self.surface.group_activated(self.tree.active());
        self.refresh_mirror();
    }

    fn notify_count(&mut self, group: GroupId) {
        let count = self.tree.group(group).map_or(0, Group::len);
        self.surface.group_count_changed(group, count);
    }

    fn notify_conflicts(&mut self, group: GroupId) {
        if let Some(group_ref) = self.tree.group(group) {
            let conflicted = group_ref.conflicted();
            self.surface.conflicts_changed(group, &conflicted);
        }
    }

    fn refresh_mirror(&mut self) {
        let filters = document::serialize(&self.tree);
        self.mirror = render_mirror(filters, &self.config.mirror);
        self.surface.mirror_updated(&self.mirror);
    }
}

/// Renders the flat filter array in the configured mirror shape.
#[must_use]
pub fn render_mirror(filters: Vec<Value>, config: &MirrorConfig) -> String {
    match config.style {
        MirrorStyle::Array => pretty(&Value::Array(filters), config.indent),
        MirrorStyle::Wrapped => pretty(&json!({ "filters": filters }), config.indent),
        MirrorStyle::Fragment => {
            let rendered = pretty(&json!({ "filters": filters }), config.indent);
            rendered
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .unwrap_or(&rendered)
                .trim()
                .to_string()
        }
    }
}

fn pretty(value: &Value, indent: usize) -> String {
    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}
