// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use fitlife_tracker::config::Config;
use fitlife_tracker::db::Database;
use fitlife_tracker::routes::create_router;
use fitlife_tracker::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default()).await
}

/// Same as [`create_test_app`] with a caller-tweaked config.
#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let state = Arc::new(AppState::new(config, db).expect("Failed to build state"));
    (create_router(state.clone()), state)
}

/// Registration body that passes validation.
#[allow(dead_code)]
pub fn registration_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "secret123",
        "firstName": "Test",
        "lastName": "User",
        "dateOfBirth": "1990-05-20",
        "height": 175,
        "weight": 72.5,
        "gender": "other"
    })
}

/// Build a JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through a clone of the router.
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Send and decode in one step.
#[allow(dead_code)]
pub async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(app, json_request(method, uri, token, body)).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Register a user and return `(access_token, refresh_token, user_id)`.
#[allow(dead_code)]
pub async fn register(app: &axum::Router, username: &str) -> (String, String, String) {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(registration_body(username)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["refreshToken"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}
