/// Board model and database operations
///
/// A board belongs to exactly one team and gates task creation through its
/// status: only OPEN boards accept new tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(64) NOT NULL,
///     description VARCHAR(128),
///     team_id INTEGER NOT NULL REFERENCES teams(id),
///     status TEXT NOT NULL DEFAULT 'OPEN' CHECK (status IN ('OPEN', 'CLOSED')),
///     creation_time TEXT NOT NULL,
///     CONSTRAINT unique_board_name_for_team UNIQUE (name, team_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ServiceResult;
use crate::models::required;

/// Error returned when a stored or submitted status string is unknown
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status: {0}")]
pub struct ParseStatusError(pub String);

/// Board status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStatus {
    /// Accepts new tasks
    Open,

    /// Read-only; adding tasks is rejected
    Closed,
}

impl BoardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardStatus::Open => "OPEN",
            BoardStatus::Closed => "CLOSED",
        }
    }

    pub fn accepts_tasks(&self) -> bool {
        matches!(self, BoardStatus::Open)
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(BoardStatus::Open),
            "CLOSED" => Ok(BoardStatus::Closed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for BoardStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Board row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: i64,

    /// Unique within the owning team
    pub name: String,

    pub description: Option<String>,

    pub team_id: i64,

    #[sqlx(try_from = "String")]
    pub status: BoardStatus,

    pub creation_time: DateTime<Utc>,
}

/// Body of `POST /create_board`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateBoard {
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

    #[validate(required(message = "team_id is required"))]
    pub team_id: Option<i64>,
}

/// Validated input for a new board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoard {
    pub name: String,
    pub description: String,
    pub team_id: i64,
}

impl CreateBoard {
    pub fn new(name: &str, description: &str, team_id: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            team_id: Some(team_id),
        }
    }

    pub fn into_valid(self) -> ServiceResult<NewBoard> {
        self.validate()?;
        Ok(NewBoard {
            name: required(self.name, "name")?,
            description: required(self.description, "description")?,
            team_id: required(self.team_id, "team_id")?,
        })
    }
}

/// Body of `POST /list_boards`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListBoards {
    #[validate(required(message = "team_id is required"))]
    pub team_id: Option<i64>,
}

impl ListBoards {
    pub fn new(team_id: i64) -> Self {
        Self {
            team_id: Some(team_id),
        }
    }

    pub fn into_team_id(self) -> ServiceResult<i64> {
        self.validate()?;
        required(self.team_id, "team_id")
    }
}

impl Board {
    /// Inserts a new OPEN board
    ///
    /// # Errors
    ///
    /// - unique violation if the team already has a board with this name
    /// - foreign key violation if the team doesn't exist
    pub async fn create(conn: &mut SqliteConnection, data: &NewBoard) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (name, description, team_id, status, creation_time)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, description, team_id, status, creation_time
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.team_id)
        .bind(BoardStatus::Open.as_str())
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, team_id, status, creation_time
            FROM boards
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    pub async fn list_by_team(
        conn: &mut SqliteConnection,
        team_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, team_id, status, creation_time
            FROM boards
            WHERE team_id = ?
            ORDER BY id
            "#,
        )
        .bind(team_id)
        .fetch_all(conn)
        .await
    }

    /// Returns None if the board doesn't exist
    pub async fn update_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: BoardStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET status = ?
            WHERE id = ?
            RETURNING id, name, description, team_id, status, creation_time
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(conn)
        .await
    }
}
