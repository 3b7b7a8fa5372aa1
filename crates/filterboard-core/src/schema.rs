//! Field schema registry: which properties each field declares and how the
//! rendering surface should build inputs for them.
//!
//! Pure lookup tables. The core consults only the property names and kinds
//! to decide what is required and serializable; placeholders, option lists
//! and minimums exist for the widget layer.

use std::fmt;

use crate::field::Field;
use crate::relation::Relation;

/// A property name a field schema may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    /// Tag key ("plan", "tier", ...).
    Key,
    /// Relation phrase.
    Relation,
    /// Comparison value.
    Value,
    /// Location radius in km.
    Radius,
    /// Location latitude.
    Lat,
    /// Location longitude.
    Long,
    /// Hours-ago value for the session-recency fields.
    HoursAgo,
}

impl Prop {
    /// Property name as declared in the schema.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Prop::Key => "Key",
            Prop::Relation => "Relation",
            Prop::Value => "Value",
            Prop::Radius => "Radius",
            Prop::Lat => "Lat",
            Prop::Long => "Long",
            Prop::HoursAgo => "HoursAgo",
        }
    }

    /// Parses a property name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [Prop; 7] = [
            Prop::Key,
            Prop::Relation,
            Prop::Value,
            Prop::Radius,
            Prop::Lat,
            Prop::Long,
            Prop::HoursAgo,
        ];
        let trimmed = name.trim();
        ALL.into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input kind the rendering surface should build for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Free-form text input.
    Text,
    /// Numeric input.
    Number,
    /// Fixed option list (relation phrases).
    Enum(&'static [&'static str]),
}

/// One property descriptor in a field's schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertySpec {
    /// Property this descriptor declares.
    pub prop: Prop,
    /// Widget kind.
    pub kind: PropertyKind,
    /// Placeholder hint for the input.
    pub placeholder: Option<&'static str>,
    /// Lower bound for numeric inputs.
    pub min: Option<f64>,
}

const fn spec(prop: Prop, kind: PropertyKind) -> PropertySpec {
    PropertySpec {
        prop,
        kind,
        placeholder: None,
        min: None,
    }
}

const fn text(prop: Prop, placeholder: &'static str) -> PropertySpec {
    PropertySpec {
        prop,
        kind: PropertyKind::Text,
        placeholder: Some(placeholder),
        min: None,
    }
}

const fn number(prop: Prop, placeholder: &'static str, min: Option<f64>) -> PropertySpec {
    PropertySpec {
        prop,
        kind: PropertyKind::Number,
        placeholder: Some(placeholder),
        min,
    }
}

const EQ_ONLY: &[&str] = &["is", "is not"];
const EQ_AND_RANGE: &[&str] = &["is", "is not", "is greater than", "is less than"];
const RANGE_ONLY: &[&str] = &["is greater than", "is less than"];
const TAG_RELATIONS: &[&str] = &[
    "is",
    "is not",
    "exists",
    "doesn't exist",
    "is greater than",
    "is less than",
    "time elapsed since is greater than",
    "time elapsed since is less than",
];

const COUNTRY: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(EQ_ONLY)),
    text(Prop::Value, "United States"),
];

const TAG: &[PropertySpec] = &[
    text(Prop::Key, "plan, tier, cohort"),
    spec(Prop::Relation, PropertyKind::Enum(TAG_RELATIONS)),
    text(Prop::Value, "pro, gold, vip"),
];

const LOCATION: &[PropertySpec] = &[
    number(Prop::Radius, "km", Some(0.0)),
    number(Prop::Lat, "37.7749", None),
    number(Prop::Long, "-122.4194", None),
];

const APP_VERSION: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(EQ_AND_RANGE)),
    text(Prop::Value, "1.2.3"),
];

const LANGUAGE: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(EQ_ONLY)),
    text(Prop::Value, "en, es, fr"),
];

const SESSION_TIME: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(RANGE_ONLY)),
    number(Prop::Value, "seconds", Some(0.0)),
];

const SESSION_COUNT: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(RANGE_ONLY)),
    number(Prop::Value, "count", Some(0.0)),
];

const HOURS_AGO: &[PropertySpec] = &[
    spec(Prop::Relation, PropertyKind::Enum(RANGE_ONLY)),
    number(Prop::HoursAgo, "hours", Some(0.0)),
];

/// Ordered property descriptors for a field.
#[must_use]
pub fn properties(field: Field) -> &'static [PropertySpec] {
    match field {
        Field::Country => COUNTRY,
        Field::Tag => TAG,
        Field::Location => LOCATION,
        Field::AppVersion => APP_VERSION,
        Field::Language => LANGUAGE,
        Field::SessionTime => SESSION_TIME,
        Field::SessionCount => SESSION_COUNT,
        Field::FirstSession | Field::LastSession => HOURS_AGO,
    }
}

/// Looks up a single property descriptor.
#[must_use]
pub fn property(field: Field, prop: Prop) -> Option<&'static PropertySpec> {
    properties(field).iter().find(|s| s.prop == prop)
}

/// Whether the Value input is hidden (and therefore not required) for this
/// field/relation combination.
///
/// Only Tag with `exists`/`doesn't exist` hides it.
#[must_use]
pub fn value_hidden(field: Field, relation: Relation) -> bool {
    field == Field::Tag && matches!(relation, Relation::Exists | Relation::NotExists)
}
