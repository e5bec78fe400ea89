/// Team endpoints
///
/// # Endpoints
///
/// - `POST /create_team` - Create a team
/// - `GET /team_list` - List all teams
/// - `POST /update_team` - Change a team's description and admin
/// - `PATCH /add_user_to_team` - Add up to 50 users to a team
/// - `POST /remove_user_from_team` - Remove users from a team

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    routes::{CreatedResponse, MessageResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_shared::models::membership::TeamMembers;
use taskboard_shared::models::team::{CreateTeam, Team, UpdateTeam};

/// Team as listed
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamView {
    pub name: String,
    pub description: Option<String>,
    pub admin: i64,
    pub creation_time: DateTime<Utc>,
}

impl From<Team> for TeamView {
    fn from(team: Team) -> Self {
        Self {
            name: team.name,
            description: team.description,
            admin: team.admin,
            creation_time: team.creation_time,
        }
    }
}

/// Create a team
///
/// # Endpoint
///
/// ```text
/// POST /create_team
///
/// { "name": "T1", "description": "Platform team", "admin": 1 }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 1 }`
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, name taken or unknown admin
pub async fn create_team(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTeam>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let team = state.teams.create(req).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: team.id })))
}

/// List all teams
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<TeamView>>> {
    let teams = state.teams.list().await?;
    Ok(Json(teams.into_iter().map(TeamView::from).collect()))
}

/// Change a team's description and admin
///
/// # Endpoint
///
/// ```text
/// POST /update_team
///
/// { "id": 1, "team": { "name": "T1", "description": "...", "admin": 2 } }
/// ```
///
/// # Response
///
/// `200 OK` with the text `Team updated successfully`
///
/// # Errors
///
/// - `400 Bad Request`: Unknown team or name changed
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_team(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateTeam>,
) -> ApiResult<&'static str> {
    state
        .teams
        .update(req)
        .await
        .map_err(ApiError::unprocessable)?;

    Ok("Team updated successfully")
}

/// Add users to a team
///
/// Ids that are not users, or are already members, are skipped.
///
/// # Endpoint
///
/// ```text
/// PATCH /add_user_to_team
///
/// { "id": 1, "users": [2, 3] }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: More than 50 users, or team not found
pub async fn add_users(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TeamMembers>,
) -> ApiResult<Json<MessageResponse>> {
    state.teams.add_users(req).await?;

    Ok(Json(MessageResponse {
        message: "Team updated successfully".to_string(),
    }))
}

/// Remove users from a team
///
/// # Endpoint
///
/// ```text
/// POST /remove_user_from_team
///
/// { "id": 1, "users": [2] }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Team not found
pub async fn remove_users(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TeamMembers>,
) -> ApiResult<Json<MessageResponse>> {
    state.teams.remove_users(req).await?;

    Ok(Json(MessageResponse {
        message: "Users removed from team successfully".to_string(),
    }))
}
