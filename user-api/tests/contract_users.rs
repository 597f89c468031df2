use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use user_api::{
    application::user_service::UserService, build_router,
    infrastructure::in_memory_user_gateway::InMemoryUserGateway, state::AppState,
};

fn app() -> Router {
    let gateway = Arc::new(InMemoryUserGateway::new());
    let service = Arc::new(UserService::new(gateway.clone()));
    build_router(AppState::new(service, gateway))
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = request_json(
        app(),
        Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .expect("valid health request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("ok"));
}

#[tokio::test]
async fn create_user_persists_and_serializes_id_as_string() {
    let app = app();

    let (status, created) = post_user(app.clone(), "Alice", "alice@x.com").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.get("id").and_then(Value::as_str), Some("1"));
    assert_eq!(created.get("name").and_then(Value::as_str), Some("Alice"));
    assert_eq!(
        created.get("email").and_then(Value::as_str),
        Some("alice@x.com")
    );

    let (status, found) = request_json(
        app,
        Request::builder()
            .method("GET")
            .uri("/api/v1/users?email=alice@x.com")
            .body(Body::empty())
            .expect("valid search request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let users = found
        .get("users")
        .and_then(Value::as_array)
        .expect("search must return a users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].get("id").and_then(Value::as_str), Some("1"));
}

#[tokio::test]
async fn create_user_rejects_blank_name() {
    let (status, problem) = post_user(app(), "", "a@x.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed", Some("user_name_empty"));
}

#[tokio::test]
async fn create_user_rejects_blank_email() {
    let (status, problem) = post_user(app(), "Alice", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed", Some("user_email_empty"));
}

#[tokio::test]
async fn create_user_rejects_duplicate_email() {
    let app = app();

    let (status, _) = post_user(app.clone(), "Bob", "dup@x.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, problem) = post_user(app, "Bob Again", "dup@x.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Already exists", Some("user_already_exists"));
}

#[tokio::test]
async fn search_without_filter_lists_users_in_storage_order() {
    let app = app();

    for (name, email) in [("Zoe", "zoe@x.com"), ("Alice", "alice@x.com")] {
        let (status, _) = post_user(app.clone(), name, email).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, found) = request_json(
        app,
        Request::builder()
            .method("GET")
            .uri("/api/v1/users")
            .body(Body::empty())
            .expect("valid list request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let users = found
        .get("users")
        .and_then(Value::as_array)
        .expect("search must return a users array");
    let emails: Vec<_> = users
        .iter()
        .map(|user| user.get("email").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(emails, ["zoe@x.com", "alice@x.com"]);
}

#[tokio::test]
async fn search_miss_returns_empty_list_not_error() {
    let (status, found) = request_json(
        app(),
        Request::builder()
            .method("GET")
            .uri("/api/v1/users?email=missing@x.com")
            .body(Body::empty())
            .expect("valid search request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        found.get("users").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

#[tokio::test]
async fn search_with_empty_filter_lists_everything() {
    let app = app();

    let (status, _) = post_user(app.clone(), "Alice", "alice@x.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, found) = request_json(
        app,
        Request::builder()
            .method("GET")
            .uri("/api/v1/users?email=")
            .body(Body::empty())
            .expect("valid search request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        found.get("users").and_then(Value::as_array).map(Vec::len),
        Some(1)
    );
}

async fn post_user(app: Router, name: &str, email: &str) -> (StatusCode, Value) {
    request_json(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/users")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "name": name,
                    "email": email
                })
                .to_string(),
            ))
            .expect("valid create request"),
    )
    .await
}

fn assert_problem(
    problem: &Value,
    expected_status: u16,
    expected_title: &str,
    expected_code: Option<&str>,
) {
    assert_eq!(
        problem.get("status").and_then(Value::as_u64),
        Some(u64::from(expected_status))
    );
    assert_eq!(
        problem.get("title").and_then(Value::as_str),
        Some(expected_title)
    );
    assert_eq!(
        problem.get("code").and_then(Value::as_str),
        expected_code
    );
    assert!(problem.get("detail").and_then(Value::as_str).is_some());
    assert!(problem.get("type").and_then(Value::as_str).is_some());
    assert!(
        problem
            .get("correlation_id")
            .and_then(Value::as_str)
            .is_some()
    );
}

async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(request)
        .await
        .expect("router should serve request");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    if body.is_empty() {
        return (status, Value::Null);
    }

    let value = serde_json::from_slice(&body).expect("body should be valid json");
    (status, value)
}
