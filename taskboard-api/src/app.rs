/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskboard_shared::repository::{Repository, SqliteRepository};
use taskboard_shared::services::{BoardService, TeamService, UserService};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    pub users: UserService,

    pub teams: TeamService,

    pub boards: BoardService,
}

impl AppState {
    /// Creates new application state, wiring every service to one repository
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let repo: Arc<dyn Repository> = Arc::new(SqliteRepository::new(db.clone()));

        Self {
            users: UserService::new(repo.clone()),
            teams: TeamService::new(repo.clone()),
            boards: BoardService::new(repo, config.export.dir.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET   /health
/// ├── POST  /create_user
/// ├── GET   /userlist
/// ├── POST  /get_user
/// ├── POST  /update_user
/// ├── POST  /teams_user_list
/// ├── POST  /create_team
/// ├── GET   /team_list
/// ├── POST  /update_team
/// ├── PATCH /add_user_to_team
/// ├── POST  /remove_user_from_team
/// ├── POST  /create_board
/// ├── POST  /add_task
/// ├── POST  /update_task
/// ├── POST  /list_boards
/// ├── POST  /close_board
/// └── POST  /export_board
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/create_user", post(routes::users::create_user))
        .route("/userlist", get(routes::users::list_users))
        .route("/get_user", post(routes::users::get_user))
        .route("/update_user", post(routes::users::update_user))
        .route("/teams_user_list", post(routes::users::teams_user_list));

    let team_routes = Router::new()
        .route("/create_team", post(routes::teams::create_team))
        .route("/team_list", get(routes::teams::list_teams))
        .route("/update_team", post(routes::teams::update_team))
        .route("/add_user_to_team", patch(routes::teams::add_users))
        .route("/remove_user_from_team", post(routes::teams::remove_users));

    let board_routes = Router::new()
        .route("/create_board", post(routes::boards::create_board))
        .route("/add_task", post(routes::boards::add_task))
        .route("/update_task", post(routes::boards::update_task))
        .route("/list_boards", post(routes::boards::list_boards))
        .route("/close_board", post(routes::boards::close_board))
        .route("/export_board", post(routes::boards::export_board));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(team_routes)
        .merge(board_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
