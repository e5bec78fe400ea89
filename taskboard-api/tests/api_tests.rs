/// End-to-end tests for the Taskboard API
///
/// These tests drive the full router (routing, extractors, services, SQLite
/// and the export directory) with in-process requests:
/// - User, team, board and task endpoints
/// - Status codes and error bodies
/// - Board report download

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["schema_version"], 20240601000000i64);
    assert_eq!(body["pool"]["total_connections"], 1);
}

#[tokio::test]
async fn test_create_user_then_get_user() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post("/create_user", json!({ "user_name": "alice", "display_name": "Alice" }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.json()["id"].as_i64().unwrap();

    let response = ctx.post("/get_user", json!({ "id": id })).await;
    assert_eq!(response.status, StatusCode::OK);
    let user = response.json();
    assert_eq!(user["user_name"], "alice");
    assert_eq!(user["display_name"], "Alice");
    assert!(user["creation_time"].is_string());

    let listed = ctx.get("/userlist").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], user);
}

#[tokio::test]
async fn test_duplicate_user_name_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();
    ctx.create_user("alice").await;

    let response = ctx
        .post("/create_user", json!({ "user_name": "alice", "display_name": "Again" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "User name already exists");
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn test_create_user_validation_is_unprocessable() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post("/create_user", json!({ "user_name": "a".repeat(65) }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json();
    assert_eq!(body["code"], "validation_error");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["display_name", "user_name"]);
}

#[tokio::test]
async fn test_get_missing_user() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.post("/get_user", json!({ "id": 12 })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "User not found");
}

#[tokio::test]
async fn test_update_user_round_trip() {
    let ctx = TestContext::new().await.unwrap();
    let id = ctx.create_user("alice").await;

    let response = ctx
        .post(
            "/update_user",
            json!({ "id": id, "user": { "user_name": "alicia", "display_name": "Alicia" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Username cannot be updated");

    let user = ctx.post("/get_user", json!({ "id": id })).await.json();
    assert_eq!(user["display_name"], "ALICE");

    let response = ctx
        .post(
            "/update_user",
            json!({ "id": id, "user": { "user_name": "alice", "display_name": "Alice L." } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "User updated successfully");

    let user = ctx.post("/get_user", json!({ "id": id })).await.json();
    assert_eq!(user["display_name"], "Alice L.");
}

#[tokio::test]
async fn test_update_user_validation_is_unprocessable() {
    let ctx = TestContext::new().await.unwrap();
    let id = ctx.create_user("alice").await;

    let response = ctx
        .post(
            "/update_user",
            json!({ "id": id, "user": { "user_name": "alice", "display_name": "a".repeat(129) } }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["details"][0]["field"], "user.display_name");
}

#[tokio::test]
async fn test_team_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let bob = ctx.create_user("bob").await;
    let team_id = ctx.create_team("T1", alice).await;

    let duplicate = ctx
        .post("/create_team", json!({ "name": "T1", "description": "x", "admin": alice }))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.json()["error"], "Team name already exists");

    let response = ctx
        .post(
            "/update_team",
            json!({ "id": team_id, "team": { "name": "T1", "description": "new", "admin": bob } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "Team updated successfully");

    let renamed = ctx
        .post(
            "/update_team",
            json!({ "id": team_id, "team": { "name": "T9", "description": "new", "admin": bob } }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::BAD_REQUEST);
    assert_eq!(renamed.json()["error"], "Team name cannot be updated");

    let teams = ctx.get("/team_list").await.json();
    assert_eq!(teams[0]["name"], "T1");
    assert_eq!(teams[0]["description"], "new");
    assert_eq!(teams[0]["admin"], bob);
    assert!(teams[0]["creation_time"].is_string());
}

#[tokio::test]
async fn test_create_team_validation_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.post("/create_team", json!({ "name": "T1" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "validation_error");
}

#[tokio::test]
async fn test_update_team_validation_is_unprocessable() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;

    let response = ctx
        .post("/update_team", json!({ "id": team_id, "team": { "name": "T1" } }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_team_with_unknown_admin_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .post("/create_team", json!({ "name": "T1", "description": "d", "admin": 99 }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "bad_request");
}

#[tokio::test]
async fn test_team_membership() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let bob = ctx.create_user("bob").await;
    let team_id = ctx.create_team("T1", alice).await;

    let response = ctx
        .patch("/add_user_to_team", json!({ "id": team_id, "users": [alice, bob, 500] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Team updated successfully");

    let members = ctx.post("/teams_user_list", json!({ "id": team_id })).await.json();
    assert_eq!(
        members,
        json!([
            { "id": alice, "user_name": "alice", "display_name": "ALICE" },
            { "id": bob, "user_name": "bob", "display_name": "BOB" }
        ])
    );

    let response = ctx
        .post("/remove_user_from_team", json!({ "id": team_id, "users": [bob] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Users removed from team successfully");

    let members = ctx.post("/teams_user_list", json!({ "id": team_id })).await.json();
    assert_eq!(members.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_more_than_fifty_users_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;

    let users: Vec<i64> = (1..=51).collect();
    let response = ctx
        .patch("/add_user_to_team", json!({ "id": team_id, "users": users }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "more than 50 users not allowed");

    let members = ctx.post("/teams_user_list", json!({ "id": team_id })).await.json();
    assert!(members.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_fifty_users_is_accepted() {
    let ctx = TestContext::new().await.unwrap();
    let mut users = Vec::with_capacity(50);
    for n in 0..50 {
        users.push(ctx.create_user(&format!("user{}", n)).await);
    }
    let team_id = ctx.create_team("T1", users[0]).await;

    let response = ctx
        .patch("/add_user_to_team", json!({ "id": team_id, "users": users }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());

    let members = ctx.post("/teams_user_list", json!({ "id": team_id })).await.json();
    assert_eq!(members.as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_membership_of_missing_team() {
    let ctx = TestContext::new().await.unwrap();

    let add = ctx
        .patch("/add_user_to_team", json!({ "id": 5, "users": [1] }))
        .await;
    let remove = ctx
        .post("/remove_user_from_team", json!({ "id": 5, "users": [1] }))
        .await;
    let list = ctx.post("/teams_user_list", json!({ "id": 5 })).await;

    for response in [add, remove, list] {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json()["error"], "Team not found");
    }
}

#[tokio::test]
async fn test_duplicate_board_and_task_names() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;
    let board_id = ctx.create_board("B1", team_id).await;

    let response = ctx
        .post(
            "/create_board",
            json!({ "name": "B1", "description": "again", "team_id": team_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "conflict");

    ctx.add_task("X", alice, board_id).await;
    let response = ctx
        .post(
            "/add_task",
            json!({ "title": "X", "user_id": alice, "board_id": board_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "conflict");
}

#[tokio::test]
async fn test_closed_board_rejects_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;
    let board_id = ctx.create_board("B1", team_id).await;

    let response = ctx.post("/close_board", json!({ "id": board_id })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "CLOSED" }));

    let response = ctx
        .post(
            "/add_task",
            json!({ "title": "X", "user_id": alice, "board_id": board_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "Cannot add task to closed board");
    assert_eq!(body["code"], "invalid_state");
}

#[tokio::test]
async fn test_add_task_to_missing_board() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;

    let response = ctx
        .post("/add_task", json!({ "title": "X", "user_id": alice, "board_id": 3 }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Board not found");
}

#[tokio::test]
async fn test_update_task_status() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;
    let board_id = ctx.create_board("B1", team_id).await;
    let task_id = ctx.add_task("X", alice, board_id).await;

    let response = ctx
        .post("/update_task", json!({ "id": task_id, "status": "DONE" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"][0]["field"], "status");

    let response = ctx
        .post("/update_task", json!({ "id": task_id, "status": "IN_PROGRESS" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "success" }));

    let response = ctx
        .post("/update_task", json!({ "id": task_id + 1, "status": "OPEN" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Task not found");
}

#[tokio::test]
async fn test_list_boards() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;

    let response = ctx.post("/list_boards", json!({ "team_id": team_id })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "No boards found for the team");

    let b1 = ctx.create_board("B1", team_id).await;
    let b2 = ctx.create_board("B2", team_id).await;

    let response = ctx.post("/list_boards", json!({ "team_id": team_id })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{ "id": b1, "name": "B1" }, { "id": b2, "name": "B2" }])
    );
}

#[tokio::test]
async fn test_export_board_scenario() {
    let ctx = TestContext::new().await.unwrap();
    let alice = ctx.create_user("alice").await;
    let team_id = ctx.create_team("T1", alice).await;
    let board_id = ctx.create_board("B1", team_id).await;
    let task_id = ctx.add_task("X", alice, board_id).await;
    assert_eq!(task_id, 1);

    let response = ctx
        .post("/update_task", json!({ "id": task_id, "status": "COMPLETE" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.post("/export_board", json!({ "id": board_id })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&format!("board_{}.txt", board_id)));

    let expected = [
        "+--------+---------------+--------------+",
        "| OPEN   | IN_PROGRESS   | COMPLETE     |",
        "|--------+---------------+--------------|",
        "|        |               | 1-->X(alice) |",
        "+--------+---------------+--------------+",
    ]
    .join("\n");
    assert_eq!(response.text(), expected);

    let saved = ctx
        .export_dir
        .path()
        .join(format!("board_{}.txt", board_id));
    assert_eq!(std::fs::read_to_string(saved).unwrap(), expected);
}

#[tokio::test]
async fn test_export_missing_board() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.post("/export_board", json!({ "id": 8 })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["code"], "not_found");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/create_user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = ctx.send_request(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "bad_request");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/get_user")
        .body(Body::from(r#"{"id": 1}"#))
        .unwrap();
    let response = ctx.send_request(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = ctx.post("/get_user", json!({ "id": "one" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_id_is_validation_error() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.post("/get_user", json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"][0]["field"], "id");
}
