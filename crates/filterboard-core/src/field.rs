//! The fixed catalog of filterable audience fields.

use std::fmt;

use crate::relation::Relation;

/// One attribute type a condition can filter on.
///
/// The catalog is immutable; fields are never created or destroyed at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// User country.
    Country,
    /// Free-form data tag, keyed by tag key.
    Tag,
    /// Geographic location (lat/long/radius).
    Location,
    /// Installed application version.
    AppVersion,
    /// Device language.
    Language,
    /// Total usage duration in seconds.
    SessionTime,
    /// Number of sessions.
    SessionCount,
    /// Hours since the first session.
    FirstSession,
    /// Hours since the most recent session.
    LastSession,
}

impl Field {
    /// Every field, in catalog order.
    pub const ALL: [Field; 9] = [
        Field::Country,
        Field::Tag,
        Field::Location,
        Field::AppVersion,
        Field::Language,
        Field::SessionTime,
        Field::SessionCount,
        Field::FirstSession,
        Field::LastSession,
    ];

    /// Snake-case name used in the wire format.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Field::Country => "country",
            Field::Tag => "tag",
            Field::Location => "location",
            Field::AppVersion => "app_version",
            Field::Language => "language",
            Field::SessionTime => "session_time",
            Field::SessionCount => "session_count",
            Field::FirstSession => "first_session",
            Field::LastSession => "last_session",
        }
    }

    /// Display name shown in the builder.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Field::Country => "Country",
            Field::Tag => "Tag",
            Field::Location => "Location",
            Field::AppVersion => "AppVersion",
            Field::Language => "Language",
            Field::SessionTime => "SessionTime",
            Field::SessionCount => "SessionCount",
            Field::FirstSession => "FirstSession",
            Field::LastSession => "LastSession",
        }
    }

    /// Parses a wire-format field name, case-insensitively.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Field::ALL.into_iter().find(|f| f.wire_name() == lowered)
    }

    /// Parses a display name, case-insensitively.
    #[must_use]
    pub fn from_display(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.display_name().eq_ignore_ascii_case(trimmed))
    }

    /// Relation assumed when an entry carries none or an unrecognized one.
    ///
    /// The hours-ago fields are range-shaped and default to `>`; everything
    /// else defaults to equality.
    #[must_use]
    pub const fn default_relation(self) -> Relation {
        match self {
            Field::FirstSession | Field::LastSession => Relation::Gt,
            _ => Relation::Eq,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
