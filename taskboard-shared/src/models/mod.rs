/// Database models for Taskboard
///
/// Each module holds a row type, the request records that create or change
/// it, and the SQL that reads and writes it.
///
/// # Models
///
/// - `user`: Users (immutable user name, editable display name)
/// - `team`: Teams with a designated admin
/// - `membership`: User-team association (`user_team` table)
/// - `board`: Project boards, OPEN or CLOSED
/// - `task`: Tasks on a board with a lifecycle status
///
/// Request records keep every field optional so that a missing field is
/// reported as a validation violation rather than a deserialization error.

pub mod board;
pub mod membership;
pub mod task;
pub mod team;
pub mod user;

use serde::{Deserialize, Serialize};

use crate::error::{FieldViolation, ServiceError, ServiceResult};

/// Body of every endpoint that addresses a single entity: `{"id": ...}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: Option<i64>,
}

impl IdRequest {
    pub fn new(id: i64) -> Self {
        Self { id: Some(id) }
    }

    /// Returns the id or a validation error naming the missing field
    pub fn into_id(self) -> ServiceResult<i64> {
        required(self.id, "id")
    }
}

/// Unwraps a field that validation has already declared required
pub(crate) fn required<T>(value: Option<T>, field: &str) -> ServiceResult<T> {
    value.ok_or_else(|| {
        ServiceError::Validation(vec![FieldViolation::new(
            field,
            format!("{} is required", field),
        )])
    })
}
