//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A private in-memory database with migrations applied
//! - A temporary export directory
//! - Request helpers that drive the router without a listener
//! - Fixture helpers for users, teams and boards

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::db::migrations::run_migrations;
use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
use tempfile::TempDir;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
    pub export_dir: TempDir,
}

/// Status, headers and raw body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let export_dir = tempfile::tempdir()?;

        let mut config = Config::from_vars(|_| None)?;
        config.database.url = "sqlite::memory:".to_string();
        config.export.dir = export_dir.path().to_path_buf();

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            export_dir,
        })
    }

    /// Sends a request through the router
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    /// Creates a user and returns its id
    pub async fn create_user(&self, user_name: &str) -> i64 {
        let response = self
            .post(
                "/create_user",
                json!({ "user_name": user_name, "display_name": user_name.to_uppercase() }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_i64().unwrap()
    }

    /// Creates a team and returns its id
    pub async fn create_team(&self, name: &str, admin: i64) -> i64 {
        let response = self
            .post(
                "/create_team",
                json!({ "name": name, "description": "a team", "admin": admin }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_i64().unwrap()
    }

    /// Creates a board and returns its id
    pub async fn create_board(&self, name: &str, team_id: i64) -> i64 {
        let response = self
            .post(
                "/create_board",
                json!({ "name": name, "description": "a board", "team_id": team_id }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_i64().unwrap()
    }

    /// Adds a task and returns its id
    pub async fn add_task(&self, title: &str, user_id: i64, board_id: i64) -> i64 {
        let response = self
            .post(
                "/add_task",
                json!({ "title": title, "user_id": user_id, "board_id": board_id }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_i64().unwrap()
    }
}
