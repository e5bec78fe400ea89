/// Service error types
///
/// Every service operation returns [`ServiceResult`]. The variants are the
/// domain error kinds; the HTTP layer decides how each maps to a status code.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A single rejected field in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field that failed validation (dotted for nested records, e.g. `user.display_name`)
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, oversized or malformed input
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldViolation>),

    /// A uniqueness rule or an immutable field was violated
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The operation is not allowed in the entity's current state
    #[error("{0}")]
    InvalidState(String),

    /// A batch exceeded its size cap
    #[error("{0}")]
    LimitExceeded(String),

    /// The board report could not be written or read back
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    /// Statement or commit failure reported by the database
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Maps a unique-constraint violation to `Conflict(message)`; any other
    /// database error is kept as-is.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ServiceError::Conflict(message.to_string())
            }
            _ => ServiceError::Database(err),
        }
    }

    /// Short machine-readable kind, used as the `code` of error responses
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InvalidState(_) => "invalid_state",
            ServiceError::LimitExceeded(_) => "limit_exceeded",
            ServiceError::Export(_) => "not_found",
            ServiceError::Database(_) => "database_error",
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(flatten_violations(None, &errors))
    }
}

/// Flattens `validator` output into a sorted list of field violations
///
/// `prefix` is prepended to every field name, for records validated as a
/// nested part of a larger request.
pub fn flatten_violations(prefix: Option<&str>, errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field),
                None => field.to_string(),
            };
            errors.iter().map(move |error| FieldViolation {
                field: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(required(message = "name is required"))]
        name: Option<String>,

        #[validate(length(max = 3, message = "code must be at most 3 characters"))]
        code: Option<String>,
    }

    #[test]
    fn test_flatten_collects_every_violation() {
        let probe = Probe {
            name: None,
            code: Some("ABCD".to_string()),
        };

        let err = ServiceError::from(probe.validate().unwrap_err());
        match err {
            ServiceError::Validation(violations) => {
                assert_eq!(
                    violations,
                    vec![
                        FieldViolation::new("code", "code must be at most 3 characters"),
                        FieldViolation::new("name", "name is required"),
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_with_prefix() {
        let probe = Probe {
            name: None,
            code: None,
        };

        let violations = flatten_violations(Some("team"), &probe.validate().unwrap_err());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "team.name");
    }

    #[test]
    fn test_error_display() {
        let err = ServiceError::NotFound("Board not found".to_string());
        assert_eq!(err.to_string(), "Board not found");

        let err = ServiceError::Validation(vec![FieldViolation::new("id", "id is required")]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_conflict_on_unique_keeps_other_errors() {
        let err = ServiceError::conflict_on_unique(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(err, ServiceError::Database(sqlx::Error::RowNotFound)));
    }
}
