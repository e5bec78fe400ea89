/// Task model and database operations
///
/// # Lifecycle
///
/// ```text
/// OPEN ⇄ IN_PROGRESS ⇄ COMPLETE
/// ```
///
/// Every status is reachable from every other; there is no terminal state.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title VARCHAR(64) NOT NULL,
///     description VARCHAR(128),
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     status TEXT NOT NULL DEFAULT 'OPEN'
///         CHECK (status IN ('OPEN', 'IN_PROGRESS', 'COMPLETE')),
///     board_id INTEGER NOT NULL REFERENCES boards(id),
///     creation_time TEXT NOT NULL,
///     CONSTRAINT unique_task_title_for_board UNIQUE (title, board_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::{FieldViolation, ServiceError, ServiceResult};
use crate::models::board::ParseStatusError;
use crate::models::required;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Complete,
}

impl TaskStatus {
    /// All statuses in report column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Complete];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Complete => "COMPLETE",
        }
    }

    /// Position of this status in [`TaskStatus::ALL`]
    pub fn column(&self) -> usize {
        match self {
            TaskStatus::Open => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Complete => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(TaskStatus::Open),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETE" => Ok(TaskStatus::Complete),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,

    /// Unique within the board
    pub title: String,

    pub description: Option<String>,

    /// Assignee
    pub user_id: i64,

    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    pub board_id: i64,

    pub creation_time: DateTime<Utc>,
}

/// A task joined with its assignee's user name, as read for board exports
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AssignedTask {
    pub id: i64,
    pub title: String,
    pub user_name: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
}

/// Body of `POST /add_task`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 64, message = "title must be 1 to 64 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 128, message = "description must be at most 128 characters"))]
    pub description: Option<String>,

    #[validate(required(message = "user_id is required"))]
    pub user_id: Option<i64>,

    #[validate(required(message = "board_id is required"))]
    pub board_id: Option<i64>,
}

/// Validated input for a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub board_id: i64,
}

impl CreateTask {
    pub fn new(title: &str, description: Option<&str>, user_id: i64, board_id: i64) -> Self {
        Self {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
            user_id: Some(user_id),
            board_id: Some(board_id),
        }
    }

    pub fn into_valid(self) -> ServiceResult<NewTask> {
        self.validate()?;
        Ok(NewTask {
            title: required(self.title, "title")?,
            description: self.description,
            user_id: required(self.user_id, "user_id")?,
            board_id: required(self.board_id, "board_id")?,
        })
    }
}

/// Body of `POST /update_task`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskStatus {
    #[validate(required(message = "id is required"))]
    pub id: Option<i64>,

    #[validate(
        required(message = "status is required"),
        custom(function = "validate_task_status")
    )]
    pub status: Option<String>,
}

/// Validated status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: i64,
    pub status: TaskStatus,
}

impl UpdateTaskStatus {
    pub fn new(id: i64, status: &str) -> Self {
        Self {
            id: Some(id),
            status: Some(status.to_string()),
        }
    }

    pub fn into_valid(self) -> ServiceResult<StatusChange> {
        self.validate()?;
        let status = required(self.status, "status")?;
        Ok(StatusChange {
            id: required(self.id, "id")?,
            status: status.parse().map_err(|e: ParseStatusError| {
                ServiceError::Validation(vec![FieldViolation::new("status", e.to_string())])
            })?,
        })
    }
}

fn validate_task_status(status: &str) -> Result<(), ValidationError> {
    if status.parse::<TaskStatus>().is_ok() {
        return Ok(());
    }

    let mut error = ValidationError::new("task_status");
    error.message = Some("status must be one of OPEN, IN_PROGRESS, COMPLETE".into());
    Err(error)
}

impl Task {
    /// Inserts a new OPEN task
    ///
    /// # Errors
    ///
    /// - unique violation if the board already has a task with this title
    /// - foreign key violation if the board or assignee doesn't exist
    pub async fn create(conn: &mut SqliteConnection, data: &NewTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, user_id, status, board_id, creation_time)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, user_id, status, board_id, creation_time
            "#,
        )
        .bind(&data.title)
        .bind(data.description.as_deref())
        .bind(data.user_id)
        .bind(TaskStatus::Open.as_str())
        .bind(data.board_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, user_id, status, board_id, creation_time
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Returns None if the task doesn't exist
    pub async fn update_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = ?
            WHERE id = ?
            RETURNING id, title, description, user_id, status, board_id, creation_time
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Tasks of a board with their assignee names, ordered by id
    ///
    /// Tasks whose assignee no longer resolves are left out.
    pub async fn list_assigned(
        conn: &mut SqliteConnection,
        board_id: i64,
    ) -> Result<Vec<AssignedTask>, sqlx::Error> {
        sqlx::query_as::<_, AssignedTask>(
            r#"
            SELECT t.id, t.title, u.user_name, t.status
            FROM tasks t
            INNER JOIN users u ON u.id = t.user_id
            WHERE t.board_id = ?
            ORDER BY t.id
            "#,
        )
        .bind(board_id)
        .fetch_all(conn)
        .await
    }
}
