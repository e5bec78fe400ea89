/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_name VARCHAR(64) NOT NULL,
///     display_name VARCHAR(128) NOT NULL,
///     creation_time TEXT NOT NULL,
///     CONSTRAINT unique_user_name UNIQUE (user_name)
/// );
/// ```
///
/// The user name is fixed at creation; only the display name can change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use validator::Validate;

use crate::error::{flatten_violations, ServiceError, ServiceResult};
use crate::models::required;

/// User row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Server-assigned id
    pub id: i64,

    /// Unique login-style name, immutable after creation
    pub user_name: String,

    /// Free-form name shown in listings
    pub display_name: String,

    /// When the user was created (UTC)
    pub creation_time: DateTime<Utc>,
}

/// Body of `POST /create_user`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        required(message = "user_name is required"),
        length(min = 1, max = 64, message = "user_name must be 1 to 64 characters")
    )]
    pub user_name: Option<String>,

    #[validate(
        required(message = "display_name is required"),
        length(max = 64, message = "display_name must be at most 64 characters")
    )]
    pub display_name: Option<String>,
}

/// Validated input for a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_name: String,
    pub display_name: String,
}

impl CreateUser {
    pub fn new(user_name: &str, display_name: &str) -> Self {
        Self {
            user_name: Some(user_name.to_string()),
            display_name: Some(display_name.to_string()),
        }
    }

    /// Validates every field and returns the checked input
    pub fn into_valid(self) -> ServiceResult<NewUser> {
        self.validate()?;
        Ok(NewUser {
            user_name: required(self.user_name, "user_name")?,
            display_name: required(self.display_name, "display_name")?,
        })
    }
}

/// The `user` object nested in `POST /update_user`
///
/// Display names may be longer on update than on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserFields {
    #[validate(
        required(message = "user_name is required"),
        length(max = 64, message = "user_name must be at most 64 characters")
    )]
    pub user_name: Option<String>,

    #[validate(
        required(message = "display_name is required"),
        length(max = 128, message = "display_name must be at most 128 characters")
    )]
    pub display_name: Option<String>,
}

/// Body of `POST /update_user`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(required(message = "id is required"))]
    pub id: Option<i64>,

    #[validate(required(message = "user is required"))]
    pub user: Option<UserFields>,
}

/// Validated input for a user update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChange {
    pub id: i64,
    pub user_name: String,
    pub display_name: String,
}

impl UpdateUser {
    pub fn new(id: i64, user_name: &str, display_name: &str) -> Self {
        Self {
            id: Some(id),
            user: Some(UserFields {
                user_name: Some(user_name.to_string()),
                display_name: Some(display_name.to_string()),
            }),
        }
    }

    /// Validates the envelope and the nested `user` record together,
    /// reporting all violations at once
    pub fn into_valid(self) -> ServiceResult<UserChange> {
        let mut violations = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_violations(None, &errors),
        };
        if let Some(Err(errors)) = self.user.as_ref().map(Validate::validate) {
            violations.extend(flatten_violations(Some("user"), &errors));
        }
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        let user = required(self.user, "user")?;
        Ok(UserChange {
            id: required(self.id, "id")?,
            user_name: required(user.user_name, "user.user_name")?,
            display_name: required(user.display_name, "user.display_name")?,
        })
    }
}

impl User {
    /// Inserts a new user stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the user name is taken.
    pub async fn create(
        conn: &mut SqliteConnection,
        user_name: &str,
        display_name: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, display_name, creation_time)
            VALUES (?, ?, ?)
            RETURNING id, user_name, display_name, creation_time
            "#,
        )
        .bind(user_name)
        .bind(display_name)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, display_name, creation_time
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Lists all users, oldest first
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, display_name, creation_time
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// Lists the members of a team, oldest first
    pub async fn list_by_team(
        conn: &mut SqliteConnection,
        team_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.user_name, u.display_name, u.creation_time
            FROM users u
            INNER JOIN user_team ut ON ut.user_id = u.id
            WHERE ut.team_id = ?
            ORDER BY u.id
            "#,
        )
        .bind(team_id)
        .fetch_all(conn)
        .await
    }

    /// Replaces the display name
    ///
    /// Returns None if the user doesn't exist.
    pub async fn update_display_name(
        conn: &mut SqliteConnection,
        id: i64,
        display_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = ?
            WHERE id = ?
            RETURNING id, user_name, display_name, creation_time
            "#,
        )
        .bind(display_name)
        .bind(id)
        .fetch_optional(conn)
        .await
    }
}
