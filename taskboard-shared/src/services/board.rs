/// Board and task operations
///
/// Boards start OPEN and only OPEN boards accept new tasks. Task titles are
/// unique per board, board names per team.
///
/// Board reports are written to `<export_dir>/board_<id>.txt` and read back
/// from disk before being returned, so the returned contents always match
/// the file a client would download.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::export::{render_board, report_file_name};
use crate::models::board::{Board, BoardStatus, CreateBoard, ListBoards};
use crate::models::task::{CreateTask, Task, UpdateTaskStatus};
use crate::models::IdRequest;
use crate::repository::Repository;

/// A rendered board report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardExport {
    pub board_id: i64,

    /// File name without directory, e.g. `board_3.txt`
    pub file_name: String,

    pub path: PathBuf,

    pub contents: String,
}

#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn Repository>,
    export_dir: PathBuf,
}

impl BoardService {
    pub fn new(repo: Arc<dyn Repository>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            export_dir: export_dir.into(),
        }
    }

    /// Creates an OPEN board for a team
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the team already has a board with this name
    /// - `Database` if the team doesn't exist
    pub async fn create_board(&self, request: CreateBoard) -> ServiceResult<Board> {
        let input = request.into_valid()?;

        let board = self.repo.create_board(&input).await.map_err(|e| {
            ServiceError::conflict_on_unique(e, "Board name already exists for this team")
        })?;

        tracing::info!(board_id = board.id, team_id = board.team_id, name = %board.name, "Created board");
        Ok(board)
    }

    /// Adds an OPEN task to a board
    ///
    /// The board is checked before the rest of the request: a closed board
    /// rejects the task whatever else the request contains.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the board or the assignee doesn't exist
    /// - `InvalidState` if the board is closed
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the board already has a task with this title
    pub async fn add_task(&self, request: CreateTask) -> ServiceResult<Task> {
        let Some(board_id) = request.board_id else {
            // reports the missing board_id along with any other violation
            request.into_valid()?;
            return Err(ServiceError::NotFound("Board not found".to_string()));
        };

        let board = self
            .repo
            .find_board(board_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Board not found".to_string()))?;

        if !board.status.accepts_tasks() {
            tracing::warn!(board_id, status = %board.status, "Rejected task for closed board");
            return Err(ServiceError::InvalidState(
                "Cannot add task to closed board".to_string(),
            ));
        }

        let input = request.into_valid()?;

        if self.repo.find_user(input.user_id).await?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let task = self.repo.create_task(&input).await.map_err(|e| {
            ServiceError::conflict_on_unique(e, "Task title already exists on this board")
        })?;

        tracing::info!(
            task_id = task.id,
            board_id = task.board_id,
            user_id = task.user_id,
            "Added task"
        );
        Ok(task)
    }

    /// Moves a task to another status
    ///
    /// Any status can follow any other.
    ///
    /// # Errors
    ///
    /// - `Validation` if the status is not one of OPEN, IN_PROGRESS, COMPLETE
    /// - `NotFound` if the task doesn't exist
    pub async fn update_task_status(&self, request: UpdateTaskStatus) -> ServiceResult<Task> {
        let change = request.into_valid()?;

        let task = self
            .repo
            .find_task(change.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        let updated = self
            .repo
            .set_task_status(change.id, change.status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        tracing::info!(task_id = updated.id, from = %task.status, to = %updated.status, "Updated task status");
        Ok(updated)
    }

    /// Lists a team's boards
    ///
    /// # Errors
    ///
    /// `NotFound` if the team has no boards, which includes a missing team.
    pub async fn list_boards(&self, request: ListBoards) -> ServiceResult<Vec<Board>> {
        let team_id = request.into_team_id()?;

        let boards = self.repo.list_boards(team_id).await?;
        if boards.is_empty() {
            return Err(ServiceError::NotFound("No boards found for the team".to_string()));
        }

        tracing::debug!(team_id, count = boards.len(), "Listed boards");
        Ok(boards)
    }

    /// Closes a board so it no longer accepts tasks
    ///
    /// Closing a closed board is a no-op.
    pub async fn close_board(&self, request: IdRequest) -> ServiceResult<Board> {
        let id = request.into_id()?;

        let board = self
            .repo
            .set_board_status(id, BoardStatus::Closed)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Board not found".to_string()))?;

        tracing::info!(board_id = board.id, "Closed board");
        Ok(board)
    }

    /// Renders a board report, writes it to the export directory and
    /// returns it as read back from disk
    ///
    /// # Errors
    ///
    /// - `NotFound` if the board doesn't exist
    /// - `Export` if the report can't be written or read
    pub async fn export_board(&self, request: IdRequest) -> ServiceResult<BoardExport> {
        let board_id = request.into_id()?;

        if self.repo.find_board(board_id).await?.is_none() {
            return Err(ServiceError::NotFound("Board not found".to_string()));
        }

        let tasks = self.repo.list_assigned_tasks(board_id).await?;
        let report = render_board(&tasks);

        let file_name = report_file_name(board_id);
        let path = self.export_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.export_dir).await?;
        tokio::fs::write(&path, report.as_bytes()).await?;
        let contents = tokio::fs::read_to_string(&path).await?;

        tracing::info!(board_id, tasks = tasks.len(), path = %path.display(), "Exported board");
        Ok(BoardExport {
            board_id,
            file_name,
            path,
            contents,
        })
    }
}
