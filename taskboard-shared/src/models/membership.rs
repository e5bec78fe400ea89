/// Membership model: the `user_team` association
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_team (
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     team_id INTEGER NOT NULL REFERENCES teams(id),
///     PRIMARY KEY (user_id, team_id)
/// );
/// ```
///
/// Membership changes are batched per request. Ids that do not resolve to a
/// user are skipped, and adding an existing member is a no-op.

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use validator::Validate;

use crate::error::ServiceResult;
use crate::models::required;

/// Maximum number of user ids a single add request may carry
pub const MAX_USERS_PER_REQUEST: usize = 50;

/// Membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub user_id: i64,
    pub team_id: i64,
}

/// Body of `PATCH /add_user_to_team` and `POST /remove_user_from_team`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TeamMembers {
    /// Team id
    #[validate(required(message = "id is required"))]
    pub id: Option<i64>,

    #[validate(required(message = "users is required"))]
    pub users: Option<Vec<i64>>,
}

/// Validated membership batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBatch {
    pub team_id: i64,
    pub user_ids: Vec<i64>,
}

impl TeamMembers {
    pub fn new(team_id: i64, user_ids: Vec<i64>) -> Self {
        Self {
            id: Some(team_id),
            users: Some(user_ids),
        }
    }

    pub fn into_valid(self) -> ServiceResult<MemberBatch> {
        self.validate()?;
        Ok(MemberBatch {
            team_id: required(self.id, "id")?,
            user_ids: required(self.users, "users")?,
        })
    }
}

impl Membership {
    /// Adds `user_id` to the team if that user exists
    ///
    /// Returns true if a new membership row was written.
    pub async fn add(
        conn: &mut SqliteConnection,
        team_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_team (user_id, team_id)
            SELECT id, ? FROM users WHERE id = ?
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes `user_id` from the team
    ///
    /// Returns true if a membership row was deleted.
    pub async fn remove(
        conn: &mut SqliteConnection,
        team_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_team WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_by_team(
        conn: &mut SqliteConnection,
        team_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, team_id
            FROM user_team
            WHERE team_id = ?
            ORDER BY user_id
            "#,
        )
        .bind(team_id)
        .fetch_all(conn)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn test_team_members_valid() {
        let batch = TeamMembers::new(2, vec![1, 3]).into_valid().unwrap();
        assert_eq!(batch.team_id, 2);
        assert_eq!(batch.user_ids, vec![1, 3]);
    }

    #[test]
    fn test_team_members_requires_both_fields() {
        match TeamMembers::default().into_valid() {
            Err(ServiceError::Validation(violations)) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["id", "users"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
