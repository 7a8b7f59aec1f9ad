// HTTP tests for the wellness session endpoints
// Run with: cargo test -p wellness-control-plane --test sessions_api_test
// Uses in-memory stores; no database required.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wellness_control_plane::{build_app, config::ServerConfig, storage::StorageBackend};
use wellness_core::{AuthService, AuthSettings};

fn test_app() -> Router {
    let backend = StorageBackend::in_memory();
    let service = AuthService::new(
        backend.credential_store(),
        backend.token_store(),
        AuthSettings {
            secret: "sessions-api-test-secret".to_string(),
            token_lifetime: Duration::from_secs(3600),
            min_password_length: 6,
        },
    )
    .unwrap();
    build_app(&backend, Arc::new(service), &ServerConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn login_as(app: &Router, email: &str) -> String {
    let credentials = json!({"email": email, "password": "hunter2"});
    let (status, _) = send(
        app,
        request("POST", "/api/auth/register", None, Some(credentials.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(app, request("POST", "/api/auth/login", None, Some(credentials))).await;
    body["token"].as_str().unwrap().to_string()
}

fn session_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Guided breathing",
        "duration": 10,
        "tags": ["breath", "calm"],
        "content": {"steps": ["inhale", "hold", "exhale"]}
    })
}

#[tokio::test]
async fn test_draft_then_publish_flow() {
    let app = test_app();
    let token = login_as(&app, "alice@example.com").await;

    let (status, draft) = send(
        &app,
        request(
            "POST",
            "/api/my-sessions/save-draft",
            Some(&token),
            Some(session_body("Evening wind-down")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["tags"], json!(["breath", "calm"]));
    let id = draft["id"].as_str().unwrap().to_string();

    // Drafts are not public
    let (status, body) = send(&app, request("GET", "/api/sessions", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let mut publish = session_body("Evening wind-down");
    publish["id"] = json!(id);
    let (status, published) = send(
        &app,
        request("POST", "/api/my-sessions/publish", Some(&token), Some(publish)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["id"], json!(id));
    assert_eq!(published["status"], "published");

    let (_, body) = send(&app, request("GET", "/api/sessions", None, None)).await;
    let public = body["data"].as_array().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["title"], "Evening wind-down");

    let (status, body) = send(&app, request("GET", "/api/my-sessions", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_owner_scoping() {
    let app = test_app();
    let alice = login_as(&app, "alice@example.com").await;
    let bob = login_as(&app, "bob@example.com").await;

    let (_, session) = send(
        &app,
        request(
            "POST",
            "/api/my-sessions/save-draft",
            Some(&alice),
            Some(session_body("Alice only")),
        ),
    )
    .await;
    let uri = format!("/api/my-sessions/{}", session["id"].as_str().unwrap());

    let (status, body) = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Session not found");

    let (status, _) = send(&app, request("DELETE", &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, request("GET", "/api/my-sessions", Some(&bob), None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Alice only");

    let (status, body) = send(&app, request("DELETE", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_routes_are_gated() {
    let app = test_app();

    let (status, _) = send(&app, request("GET", "/api/my-sessions", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/my-sessions/publish",
            Some("not-a-token"),
            Some(session_body("Nope")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_validation() {
    let app = test_app();
    let token = login_as(&app, "carol@example.com").await;

    let mut body = session_body("Too short");
    body["duration"] = json!(0);
    let (status, response) = send(
        &app,
        request("POST", "/api/my-sessions/save-draft", Some(&token), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Session must be at least 1 minutes");

    let (status, response) = send(
        &app,
        request(
            "POST",
            "/api/my-sessions/save-draft",
            Some(&token),
            Some(json!({"title": "No content", "description": "x", "duration": 5})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Session content is required");

    let (_, body) = send(&app, request("GET", "/api/my-sessions", Some(&token), None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_session_id() {
    let app = test_app();
    let token = login_as(&app, "dana@example.com").await;

    for method in ["GET", "DELETE"] {
        let (status, body) = send(
            &app,
            request(method, "/api/my-sessions/not-a-uuid", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "{method}");
    }

    // The gate still runs first
    let (status, _) = send(&app, request("GET", "/api/my-sessions/not-a-uuid", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
