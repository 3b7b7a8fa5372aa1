//! A single concrete constraint on a field.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::relation::Relation;
use crate::schema::{self, Prop};

/// Property values of a condition, keyed by declared property name.
///
/// Keys are exactly those the field's schema declares; optional properties
/// (Value under `exists`/`doesn't exist`) may be absent.
pub type PropertyValues = BTreeMap<Prop, String>;

/// One concrete constraint on a [`Field`] with specific property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Field this condition constrains.
    pub field: Field,
    /// Property values, keyed per the field schema.
    pub values: PropertyValues,
}

impl Condition {
    /// Creates a condition from a field and its property values.
    #[must_use]
    pub fn new(field: Field, values: PropertyValues) -> Self {
        Self { field, values }
    }

    /// Returns a property value, if present.
    #[must_use]
    pub fn get(&self, prop: Prop) -> Option<&str> {
        self.values.get(&prop).map(String::as_str)
    }

    /// The raw relation phrase stored on this condition, if any.
    #[must_use]
    pub fn relation_phrase(&self) -> Option<&str> {
        self.get(Prop::Relation)
    }

    /// The relation this condition uses, parsed leniently with the field's
    /// default as fallback.
    #[must_use]
    pub fn relation(&self) -> Relation {
        let default = self.field.default_relation();
        self.relation_phrase()
            .map_or(default, |phrase| Relation::parse_or(phrase, default))
    }

    /// The tag key this condition is scoped to; empty for non-Tag fields or
    /// a Tag condition missing its key.
    #[must_use]
    pub fn tag_key(&self) -> &str {
        if self.field == Field::Tag {
            self.get(Prop::Key).unwrap_or("")
        } else {
            ""
        }
    }

    /// Display summary for a rendered node: the field name followed by each
    /// declared property that carries a value.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = self.field.display_name().to_string();
        for spec in schema::properties(self.field) {
            if let Some(value) = self.get(spec.prop) {
                // write! into a String cannot fail
                let _ = write!(out, " {}={}", spec.prop, value);
            }
        }
        out
    }

    /// Validates a manually entered condition: every schema property must be
    /// non-empty unless the current relation hides it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProperty`] naming the first empty required
    /// property, so the surface can focus the offending input.
    pub fn validate(&self) -> Result<()> {
        let relation = self.relation();
        for spec in schema::properties(self.field) {
            if spec.prop == Prop::Value && schema::value_hidden(self.field, relation) {
                continue;
            }
            let filled = self
                .get(spec.prop)
                .is_some_and(|value| !value.trim().is_empty());
            if !filled {
                return Err(Error::MissingProperty {
                    field: self.field,
                    prop: spec.prop,
                });
            }
        }
        Ok(())
    }
}

/// Convenience constructor used heavily in tests and the CLI: builds the
/// property map from `(Prop, value)` pairs.
#[must_use]
pub fn values_of<const N: usize>(pairs: [(Prop, &str); N]) -> PropertyValues {
    pairs
        .into_iter()
        .map(|(prop, value)| (prop, value.to_string()))
        .collect()
}
