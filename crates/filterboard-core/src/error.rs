//! Error types for filterboard-core.

use thiserror::Error;

use crate::config::ConfigError;
use crate::field::Field;
use crate::schema::Prop;
use crate::text::Diagnostic;
use crate::tree::{ConditionId, GroupId};

/// Builder error types.
///
/// Every variant is local and recoverable: a failed operation leaves the
/// group tree exactly as it was before the call.
#[derive(Error, Debug)]
pub enum Error {
    /// A required property was empty or absent on a manual add.
    #[error("required property '{prop}' is empty for {field}")]
    MissingProperty {
        /// Field the condition was built for.
        field: Field,
        /// The offending property.
        prop: Prop,
    },

    /// The first group is permanent and cannot be removed.
    #[error("the first group cannot be removed")]
    PermanentGroup,

    /// No group with this id exists in the tree.
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),

    /// No condition with this id exists in the tree.
    #[error("unknown condition {0}")]
    UnknownCondition(ConditionId),

    /// Hand-edited filter text was rejected with a located diagnostic.
    #[error("invalid filter JSON on line {}: {}", .0.line, .0.message)]
    Parse(Diagnostic),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingProperty {
            field: Field::Tag,
            prop: Prop::Key,
        };
        assert_eq!(err.to_string(), "required property 'Key' is empty for Tag");
    }

    #[test]
    fn test_permanent_group_display() {
        assert_eq!(
            Error::PermanentGroup.to_string(),
            "the first group cannot be removed"
        );
    }
}
