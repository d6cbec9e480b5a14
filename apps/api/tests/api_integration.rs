//! End-to-end API integration tests
//!
//! These tests drive the full router over an in-memory store:
//! - Pull request creation with automatic reviewer assignment
//! - Reassignment and merge flows, including error envelopes
//! - Review queues and statistics

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use review_assigner_api::api::{self, AppState};
use review_assigner_api::domain::services::ReviewerAssignmentService;
use review_assigner_api::domain::team::{Team, TeamId};
use review_assigner_api::domain::user::{User, UserId};
use review_assigner_api::infrastructure::repositories::InMemoryStore;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

/// Setup test application over a store seeded with one team
///
/// Team 1 "backend": u1 (author), u2, u3 active; u4 inactive.
async fn setup_app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    store
        .add_team(Team::new(TeamId::new(1), "backend").unwrap())
        .await;
    for (id, active) in [("u1", true), ("u2", true), ("u3", true), ("u4", false)] {
        let user = User::new(UserId::from(id), format!("user-{}", id), active, Some(TeamId::new(1)))
            .unwrap();
        store.add_user(user).await;
    }
    let loner = User::new(UserId::from("solo"), "solo", true, None).unwrap();
    store.add_user(loner).await;

    let service = ReviewerAssignmentService::new(store.clone(), store.clone(), store);
    api::router(AppState::new(service))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_pr(app: &Router, id: &str, author: &str) -> (StatusCode, Value) {
    send(
        app,
        post(
            "/pullRequest/create",
            json!({
                "pull_request_id": id,
                "pull_request_name": format!("Change {}", id),
                "author_id": author,
            }),
        ),
    )
    .await
}

fn reviewers(pr: &Value) -> Vec<String> {
    pr["assigned_reviewers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_create_assigns_two_active_teammates() {
    let app = setup_app().await;

    let (status, body) = create_pr(&app, "pr-1", "u1").await;

    assert_eq!(status, StatusCode::CREATED);
    let pr = &body["pr"];
    assert_eq!(pr["pull_request_id"], "pr-1");
    assert_eq!(pr["author_id"], "u1");
    assert_eq!(pr["status"], "OPEN");
    assert!(pr.get("mergedAt").is_none());

    let mut assigned = reviewers(pr);
    assigned.sort();
    assert_eq!(assigned, vec!["u2", "u3"]);
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let app = setup_app().await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, body) = create_pr(&app, "pr-1", "u2").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PR_EXISTS");
}

#[tokio::test]
async fn test_create_with_unknown_author_or_no_team() {
    let app = setup_app().await;

    let (status, body) = create_pr(&app, "pr-1", "missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = create_pr(&app, "pr-2", "solo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_rejects_invalid_body() {
    let app = setup_app().await;

    let (status, body) = send(&app, post("/pullRequest/create", json!({"author_id": "u1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");

    let (status, body) = send(
        &app,
        post(
            "/pullRequest/create",
            json!({"pull_request_id": "pr-1", "pull_request_name": "", "author_id": "u1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_reassign_then_merge_flow() {
    let app = setup_app().await;
    let (_, created) = create_pr(&app, "pr-1", "u1").await;
    let before = reviewers(&created["pr"]);

    // Both teammates are already assigned, so there is no replacement
    let (status, body) = send(
        &app,
        post(
            "/pullRequest/reassign",
            json!({"pull_request_id": "pr-1", "old_user_id": before[0]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NO_CANDIDATE");

    let (status, body) = send(
        &app,
        post(
            "/pullRequest/reassign",
            json!({"pull_request_id": "pr-1", "old_user_id": "u4"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NOT_ASSIGNED");

    let (status, body) = send(&app, post("/pullRequest/merge", json!({"pull_request_id": "pr-1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["status"], "MERGED");
    let merged_at = body["pr"]["mergedAt"].clone();
    assert!(merged_at.is_string());

    // Merge is idempotent
    let (status, body) = send(&app, post("/pullRequest/merge", json!({"pull_request_id": "pr-1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["mergedAt"], merged_at);

    let (status, body) = send(
        &app,
        post(
            "/pullRequest/reassign",
            json!({"pull_request_id": "pr-1", "old_user_id": before[0]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PR_MERGED");
}

#[tokio::test]
async fn test_merge_unknown_pull_request() {
    let app = setup_app().await;

    let (status, body) = send(&app, post("/pullRequest/merge", json!({"pull_request_id": "nope"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_pull_request() {
    let app = setup_app().await;
    create_pr(&app, "pr-1", "u1").await;

    let (status, body) = send(&app, get("/pullRequest/pr-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["pull_request_name"], "Change pr-1");

    let (status, _) = send(&app, get("/pullRequest/pr-404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_queue() {
    let app = setup_app().await;
    create_pr(&app, "pr-1", "u1").await;
    create_pr(&app, "pr-2", "u1").await;

    let (status, body) = send(&app, get("/users/getReview?user_id=u2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "u2");
    let ids: Vec<&str> = body["pull_requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pr| pr["pull_request_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["pr-1", "pr-2"]);

    let (status, body) = send(&app, get("/users/getReview")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "user_id is required");

    let (status, _) = send(&app, get("/users/getReview?user_id=missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_statistics() {
    let app = setup_app().await;
    create_pr(&app, "pr-1", "u1").await;
    create_pr(&app, "pr-2", "u1").await;
    send(&app, post("/pullRequest/merge", json!({"pull_request_id": "pr-1"}))).await;

    let (status, body) = send(&app, get("/stats/pullRequests")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pull_requests"], 2);
    assert_eq!(body["open_pull_requests"], 1);
    assert_eq!(body["merged_pull_requests"], 1);
    assert_eq!(body["total_reviewers"], 4);
    assert_eq!(body["avg_reviewers_per_pr"], 2.0);

    let (status, body) = send(&app, get("/stats/reviewers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pull_requests"], 2);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["user_id"], "u2");
    assert_eq!(users[0]["username"], "user-u2");
    assert_eq!(users[0]["total_assignments"], 2);
    assert_eq!(users[0]["merged_assignments"], 1);

    let (status, body) = send(&app, get("/stats/reviewers?user_id=u3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["open_assignments"], 1);

    let (status, _) = send(&app, get("/stats/reviewers?user_id=missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
