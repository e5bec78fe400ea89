/// Team model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(64) NOT NULL,
///     description VARCHAR(128),
///     admin INTEGER NOT NULL REFERENCES users(id),
///     creation_time TEXT NOT NULL,
///     CONSTRAINT unique_team_name UNIQUE (name)
/// );
/// ```
///
/// Team names are globally unique and cannot be changed; the description and
/// admin can.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use validator::Validate;

use crate::error::{flatten_violations, ServiceError, ServiceResult};
use crate::models::required;

/// Team row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,

    /// Globally unique name
    pub name: String,

    pub description: Option<String>,

    /// Id of the administering user
    pub admin: i64,

    pub creation_time: DateTime<Utc>,
}

/// Body of `POST /create_team`, also nested as `team` in `POST /update_team`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTeam {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 64, message = "name must be 1 to 64 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "description is required"),
        length(max = 128, message = "description must be at most 128 characters")
    )]
    pub description: Option<String>,

    #[validate(required(message = "admin is required"))]
    pub admin: Option<i64>,
}

/// Validated team fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
    pub admin: i64,
}

impl CreateTeam {
    pub fn new(name: &str, description: &str, admin: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            admin: Some(admin),
        }
    }

    pub fn into_valid(self) -> ServiceResult<NewTeam> {
        self.validate()?;
        self.into_fields()
    }

    fn into_fields(self) -> ServiceResult<NewTeam> {
        Ok(NewTeam {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            admin: required(self.admin, "admin")?,
        })
    }
}

/// Body of `POST /update_team`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTeam {
    #[validate(required(message = "id is required"))]
    pub id: Option<i64>,

    #[validate(required(message = "team is required"))]
    pub team: Option<CreateTeam>,
}

/// Validated input for a team update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamChange {
    pub id: i64,
    pub team: NewTeam,
}

impl UpdateTeam {
    pub fn new(id: i64, team: CreateTeam) -> Self {
        Self {
            id: Some(id),
            team: Some(team),
        }
    }

    pub fn into_valid(self) -> ServiceResult<TeamChange> {
        let mut violations = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_violations(None, &errors),
        };
        if let Some(Err(errors)) = self.team.as_ref().map(Validate::validate) {
            violations.extend(flatten_violations(Some("team"), &errors));
        }
        if !violations.is_empty() {
            return Err(ServiceError::Validation(violations));
        }

        Ok(TeamChange {
            id: required(self.id, "id")?,
            team: required(self.team, "team")?.into_fields()?,
        })
    }
}

impl Team {
    /// Inserts a new team
    ///
    /// # Errors
    ///
    /// - unique violation if the name is taken
    /// - foreign key violation if `admin` is not a user
    pub async fn create(conn: &mut SqliteConnection, data: &NewTeam) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, admin, creation_time)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, description, admin, creation_time
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.admin)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, admin, creation_time
            FROM teams
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, admin, creation_time
            FROM teams
            ORDER BY id
            "#,
        )
        .fetch_all(conn)
        .await
    }

    /// Sets description and admin; the name is left untouched
    ///
    /// Returns None if the team doesn't exist.
    pub async fn update_details(
        conn: &mut SqliteConnection,
        id: i64,
        description: &str,
        admin: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET description = ?, admin = ?
            WHERE id = ?
            RETURNING id, name, description, admin, creation_time
            "#,
        )
        .bind(description)
        .bind(admin)
        .bind(id)
        .fetch_optional(conn)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_valid() {
        let team = CreateTeam::new("T1", "first team", 1).into_valid().unwrap();
        assert_eq!(
            team,
            NewTeam {
                name: "T1".to_string(),
                description: "first team".to_string(),
                admin: 1,
            }
        );
    }

    #[test]
    fn test_create_team_limits() {
        assert!(CreateTeam::new(&"n".repeat(65), "d", 1).into_valid().is_err());
        assert!(CreateTeam::new("T1", &"d".repeat(129), 1).into_valid().is_err());
        assert!(CreateTeam::new(&"n".repeat(64), &"d".repeat(128), 1)
            .into_valid()
            .is_ok());
    }

    #[test]
    fn test_create_team_missing_admin() {
        let req = CreateTeam {
            admin: None,
            ..CreateTeam::new("T1", "d", 1)
        };

        match req.into_valid() {
            Err(ServiceError::Validation(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "admin");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_team_prefixes_nested_fields() {
        let req = UpdateTeam::new(
            3,
            CreateTeam {
                description: None,
                ..CreateTeam::new("T1", "d", 1)
            },
        );

        match req.into_valid() {
            Err(ServiceError::Validation(violations)) => {
                assert_eq!(violations[0].field, "team.description");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
