/// Board and task endpoints
///
/// # Endpoints
///
/// - `POST /create_board` - Create a board for a team
/// - `POST /add_task` - Add a task to an open board
/// - `POST /update_task` - Move a task to another status
/// - `POST /list_boards` - List a team's boards
/// - `POST /close_board` - Close a board
/// - `POST /export_board` - Download a board report

use crate::{
    app::AppState,
    error::ApiResult,
    extract::JsonBody,
    routes::{CreatedResponse, StatusResponse},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::board::{Board, CreateBoard, ListBoards};
use taskboard_shared::models::task::{CreateTask, UpdateTaskStatus};
use taskboard_shared::models::IdRequest;

/// Board as listed for a team
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: i64,
    pub name: String,
}

impl From<Board> for BoardSummary {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            name: board.name,
        }
    }
}

/// Create a board
///
/// # Endpoint
///
/// ```text
/// POST /create_board
///
/// { "name": "B1", "description": "Sprint 1", "team_id": 1 }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 1 }`
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, name taken within the team, or unknown team
pub async fn create_board(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateBoard>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let board = state.boards.create_board(req).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: board.id })))
}

/// Add a task to a board
///
/// # Endpoint
///
/// ```text
/// POST /add_task
///
/// { "title": "X", "description": "optional", "user_id": 1, "board_id": 1 }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 1 }`
///
/// # Errors
///
/// - `400 Bad Request`: Board closed, validation failed or title taken on the board
/// - `404 Not Found`: Board or assignee not found
pub async fn add_task(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTask>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let task = state.boards.add_task(req).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: task.id })))
}

/// Move a task to another status
///
/// # Endpoint
///
/// ```text
/// POST /update_task
///
/// { "id": 1, "status": "IN_PROGRESS" }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "success" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Status is not OPEN, IN_PROGRESS or COMPLETE
/// - `404 Not Found`: Task not found
pub async fn update_task(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateTaskStatus>,
) -> ApiResult<Json<StatusResponse>> {
    state.boards.update_task_status(req).await?;

    Ok(Json(StatusResponse {
        status: "success".to_string(),
    }))
}

/// List a team's boards
///
/// # Errors
///
/// - `404 Not Found`: The team has no boards
pub async fn list_boards(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ListBoards>,
) -> ApiResult<Json<Vec<BoardSummary>>> {
    let boards = state.boards.list_boards(req).await?;
    Ok(Json(boards.into_iter().map(BoardSummary::from).collect()))
}

/// Close a board so it no longer accepts tasks
///
/// # Response
///
/// ```json
/// { "status": "CLOSED" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Board not found
pub async fn close_board(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let board = state.boards.close_board(req).await?;

    Ok(Json(StatusResponse {
        status: board.status.to_string(),
    }))
}

/// Download a board report
///
/// The report is also kept on the server as `<EXPORT_DIR>/board_<id>.txt`.
///
/// # Endpoint
///
/// ```text
/// POST /export_board
///
/// { "id": 1 }
/// ```
///
/// # Response
///
/// `200 OK`, `text/plain` attachment:
///
/// ```text
/// +--------+---------------+--------------+
/// | OPEN   | IN_PROGRESS   | COMPLETE     |
/// |--------+---------------+--------------|
/// |        |               | 1-->X(alice) |
/// +--------+---------------+--------------+
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Board not found or the report could not be produced
pub async fn export_board(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> ApiResult<impl IntoResponse> {
    let export = state.boards.export_board(req).await?;

    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.contents,
    ))
}
