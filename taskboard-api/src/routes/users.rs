/// User endpoints
///
/// # Endpoints
///
/// - `POST /create_user` - Create a user
/// - `GET /userlist` - List all users
/// - `POST /get_user` - Describe one user
/// - `POST /update_user` - Change a user's display name
/// - `POST /teams_user_list` - List the members of a team

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    routes::CreatedResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use taskboard_shared::models::IdRequest;

/// User as listed and described
#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub user_name: String,
    pub display_name: String,
    pub creation_time: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_name: user.user_name,
            display_name: user.display_name,
            creation_time: user.creation_time,
        }
    }
}

/// Team member entry
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMemberView {
    pub id: i64,
    pub user_name: String,
    pub display_name: String,
}

impl From<User> for TeamMemberView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            display_name: user.display_name,
        }
    }
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /create_user
/// Content-Type: application/json
///
/// { "user_name": "alice", "display_name": "Alice" }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 1 }`
///
/// # Errors
///
/// - `400 Bad Request`: User name already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUser>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let user = state
        .users
        .create(req)
        .await
        .map_err(ApiError::unprocessable)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: user.id })))
}

/// List all users
///
/// # Endpoint
///
/// ```text
/// GET /userlist
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Describe one user
///
/// # Endpoint
///
/// ```text
/// POST /get_user
///
/// { "id": 1 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: User not found
pub async fn get_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> ApiResult<Json<UserView>> {
    let user = state.users.describe(req).await?;
    Ok(Json(user.into()))
}

/// Change a user's display name
///
/// The user name must be sent unchanged.
///
/// # Endpoint
///
/// ```text
/// POST /update_user
///
/// { "id": 1, "user": { "user_name": "alice", "display_name": "Alice L." } }
/// ```
///
/// # Response
///
/// `200 OK` with the text `User updated successfully`
///
/// # Errors
///
/// - `400 Bad Request`: Unknown user or user name changed
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateUser>,
) -> ApiResult<&'static str> {
    state
        .users
        .update(req)
        .await
        .map_err(ApiError::unprocessable)?;

    Ok("User updated successfully")
}

/// List the members of a team
///
/// # Endpoint
///
/// ```text
/// POST /teams_user_list
///
/// { "id": 1 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Team not found
pub async fn teams_user_list(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> ApiResult<Json<Vec<TeamMemberView>>> {
    let users = state.users.list_team_users(req).await?;
    Ok(Json(users.into_iter().map(TeamMemberView::from).collect()))
}
