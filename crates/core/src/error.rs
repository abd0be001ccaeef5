//! Error types shared across the scoring path.

use thiserror::Error;

/// Result alias for scoring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scoring errors
///
/// Both variants carry the accepted values so the HTTP layer can return an
/// actionable message without reaching back into the profile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("missing required field `{field}` (accepted values: {})", .accepted.join(", "))]
    MissingField {
        field: &'static str,
        accepted: Vec<String>,
    },

    #[error("unrecognized value `{value}` for `{field}` (accepted values: {})", .accepted.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        accepted: Vec<String>,
    },
}

impl Error {
    /// The name of the field the error is about
    pub fn field(&self) -> &'static str {
        match self {
            Error::MissingField { field, .. } => field,
            Error::UnknownCategory { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_lists_accepted_values() {
        let err = Error::MissingField {
            field: "engagement_readiness",
            accepted: vec!["ready to apply".to_string(), "exploring".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("engagement_readiness"));
        assert!(msg.contains("ready to apply"));
        assert!(msg.contains("exploring"));
    }

    #[test]
    fn test_unknown_category_message() {
        let err = Error::UnknownCategory {
            field: "enrollment_timeline",
            value: "whenever".to_string(),
            accepted: vec!["within 30 days".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("whenever"));
        assert!(msg.contains("within 30 days"));
        assert_eq!(err.field(), "enrollment_timeline");
    }
}
