//! Recoverable data errors for timetable instances.
//!
//! Everything an external loader or a caller can get wrong about the
//! *data* is reported through [`ValidationError`]:
//! - Duplicate entity IDs and duplicate group memberships
//! - References to teams, slots, leagues or groups that do not exist
//! - Scheduling requests no unscheduled meeting can satisfy
//! - Malformed constraint attributes
//! - Declared objective values or lower bounds that disagree with the
//!   evaluated timetable
//!
//! Conditions the constraint catalogue was never meant to support (an
//! unsupported comparison mode reaching a rule, FA2 with partial
//! coverage) are programming errors and panic instead.

use thiserror::Error;

/// Result of a fallible store or parsing operation.
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// A recoverable validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description, including the offending ids.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    #[error("duplicate id")]
    DuplicateId,
    /// An entity is already a member of the group it is added to.
    #[error("duplicate membership")]
    DuplicateMembership,
    /// An ID does not resolve to an entity in the instance.
    #[error("unknown reference")]
    UnknownReference,
    /// No unscheduled meeting matches a scheduling request.
    #[error("no matching meeting")]
    UnscheduledMeeting,
    /// A constraint attribute or parameter, or a meeting, cannot be interpreted.
    #[error("malformed constraint")]
    MalformedConstraint,
    /// The internal BA2 rule was offered for registration.
    #[error("internal constraint")]
    InternalConstraint,
    /// A league declares a symmetry its round-robin count cannot carry.
    #[error("invalid symmetry declaration")]
    SymmetryDeclaration,
    /// The declared objective value differs from the evaluated one.
    #[error("objective mismatch")]
    ObjectiveMismatch,
    /// The declared lower bound exceeds the evaluated objective.
    #[error("lower bound violated")]
    LowerBoundViolation,
    /// A distance, cost or carry-over weight was set twice.
    #[error("duplicate data")]
    DuplicateData,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn duplicate_id(entity: &str, id: u32) -> Self {
        Self::new(
            ValidationErrorKind::DuplicateId,
            format!("{entity} with id {id} already exists"),
        )
    }

    pub(crate) fn unknown(entity: &str, id: u32) -> Self {
        Self::new(
            ValidationErrorKind::UnknownReference,
            format!("no {entity} with id {id}"),
        )
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MalformedConstraint, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = ValidationError::duplicate_id("team", 4);
        assert_eq!(err.kind, ValidationErrorKind::DuplicateId);
        assert_eq!(err.to_string(), "duplicate id: team with id 4 already exists");
    }

    #[test]
    fn test_unknown_reference() {
        let err = ValidationError::unknown("slot group", 7);
        assert_eq!(err.kind, ValidationErrorKind::UnknownReference);
        assert!(err.message.contains("slot group"));
        assert!(err.message.contains('7'));
    }

    #[test]
    fn test_malformed() {
        let err = ValidationError::malformed("bad mode 'X'");
        assert_eq!(err.kind, ValidationErrorKind::MalformedConstraint);
        assert!(err.to_string().starts_with("malformed constraint"));
    }
}
