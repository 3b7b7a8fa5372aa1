//! Relation vocabulary: human phrases vs. canonical operator codes.
//!
//! The wire format speaks operator codes (`"="`, `"not_exists"`, ...) while
//! the builder UI and the condition value maps speak phrases ("is", "doesn't
//! exist", ...). Both directions plus a lenient normalizer live here.

/// Comparison relation a condition uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `=` — "is"
    Eq,
    /// `!=` — "is not"
    Ne,
    /// `>` — "is greater than"
    Gt,
    /// `<` — "is less than"
    Lt,
    /// `time_elapsed_gt` — "time elapsed since is greater than"
    TimeElapsedGt,
    /// `time_elapsed_lt` — "time elapsed since is less than"
    TimeElapsedLt,
    /// `exists`
    Exists,
    /// `not_exists` — "doesn't exist"
    NotExists,
}

impl Relation {
    /// Every relation, in vocabulary order.
    pub const ALL: [Relation; 8] = [
        Relation::Eq,
        Relation::Ne,
        Relation::Gt,
        Relation::Lt,
        Relation::TimeElapsedGt,
        Relation::TimeElapsedLt,
        Relation::Exists,
        Relation::NotExists,
    ];

    /// Canonical operator code used in the wire format.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Relation::Eq => "=",
            Relation::Ne => "!=",
            Relation::Gt => ">",
            Relation::Lt => "<",
            Relation::TimeElapsedGt => "time_elapsed_gt",
            Relation::TimeElapsedLt => "time_elapsed_lt",
            Relation::Exists => "exists",
            Relation::NotExists => "not_exists",
        }
    }

    /// Human-readable phrase shown in the builder. Exact inverse of [`Relation::code`].
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Relation::Eq => "is",
            Relation::Ne => "is not",
            Relation::Gt => "is greater than",
            Relation::Lt => "is less than",
            Relation::TimeElapsedGt => "time elapsed since is greater than",
            Relation::TimeElapsedLt => "time elapsed since is less than",
            Relation::Exists => "exists",
            Relation::NotExists => "doesn't exist",
        }
    }

    /// Parses a canonical operator code.
    ///
    /// Word-shaped codes are matched case-insensitively; the symbolic codes
    /// must match exactly.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "=" => Some(Relation::Eq),
            "!=" => Some(Relation::Ne),
            ">" => Some(Relation::Gt),
            "<" => Some(Relation::Lt),
            "time_elapsed_gt" => Some(Relation::TimeElapsedGt),
            "time_elapsed_lt" => Some(Relation::TimeElapsedLt),
            "exists" => Some(Relation::Exists),
            "not_exists" => Some(Relation::NotExists),
            _ => None,
        }
    }

    /// Parses a human phrase, case-insensitively, accepting loose synonyms
    /// ("does not exist" for "doesn't exist").
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        match phrase.trim().to_lowercase().as_str() {
            "is" => Some(Relation::Eq),
            "is not" => Some(Relation::Ne),
            "is greater than" => Some(Relation::Gt),
            "is less than" => Some(Relation::Lt),
            "time elapsed since is greater than" => Some(Relation::TimeElapsedGt),
            "time elapsed since is less than" => Some(Relation::TimeElapsedLt),
            "exists" => Some(Relation::Exists),
            "doesn't exist" | "does not exist" => Some(Relation::NotExists),
            _ => None,
        }
    }

    /// Accepts a phrase, a code, or a synonym and returns the canonical code.
    ///
    /// Unrecognized input is returned lowercased unchanged; callers treat it
    /// as opaque.
    #[must_use]
    pub fn normalize(input: &str) -> String {
        let lowered = input.trim().to_lowercase();
        Self::from_code(&lowered)
            .or_else(|| Self::from_phrase(&lowered))
            .map_or(lowered, |rel| rel.code().to_string())
    }

    /// Lenient parse: phrase or code, falling back to a field-appropriate
    /// default on unknown input. Deliberate leniency, not an error path.
    #[must_use]
    pub fn parse_or(input: &str, default: Self) -> Self {
        Self::from_code(input)
            .or_else(|| Self::from_phrase(input))
            .unwrap_or(default)
    }

    /// True for the four ordered comparators.
    #[must_use]
    pub const fn is_comparator(self) -> bool {
        matches!(
            self,
            Relation::Gt | Relation::Lt | Relation::TimeElapsedGt | Relation::TimeElapsedLt
        )
    }

    /// True when the relation constrains the value from below.
    #[must_use]
    pub const fn is_lower_bound(self) -> bool {
        matches!(self, Relation::Gt | Relation::TimeElapsedGt)
    }

    /// True when the relation constrains the value from above.
    #[must_use]
    pub const fn is_upper_bound(self) -> bool {
        matches!(self, Relation::Lt | Relation::TimeElapsedLt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_phrase_bijection() {
        for rel in Relation::ALL {
            assert_eq!(Relation::from_code(rel.code()), Some(rel));
            assert_eq!(Relation::from_phrase(rel.phrase()), Some(rel));
        }
    }

    #[test]
    fn test_normalize_accepts_phrase_and_code() {
        assert_eq!(Relation::normalize("is greater than"), ">");
        assert_eq!(Relation::normalize(">"), ">");
        assert_eq!(Relation::normalize("IS NOT"), "!=");
    }

    #[test]
    fn test_normalize_synonyms() {
        assert_eq!(Relation::normalize("does not exist"), "not_exists");
        assert_eq!(Relation::normalize("doesn't exist"), "not_exists");
        assert_eq!(Relation::normalize("Doesn't Exist"), "not_exists");
    }

    #[test]
    fn test_normalize_passes_unknown_through_lowercased() {
        assert_eq!(Relation::normalize("Resembles"), "resembles");
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(Relation::parse_or("bogus", Relation::Eq), Relation::Eq);
        assert_eq!(Relation::parse_or("bogus", Relation::Gt), Relation::Gt);
        assert_eq!(Relation::parse_or("is less than", Relation::Eq), Relation::Lt);
    }

    #[test]
    fn test_bound_classification() {
        assert!(Relation::Gt.is_lower_bound());
        assert!(Relation::TimeElapsedGt.is_lower_bound());
        assert!(Relation::Lt.is_upper_bound());
        assert!(Relation::TimeElapsedLt.is_upper_bound());
        assert!(!Relation::Eq.is_comparator());
        assert!(Relation::TimeElapsedLt.is_comparator());
    }
}
