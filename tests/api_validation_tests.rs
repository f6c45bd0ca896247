// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests: every bad body is a JSON 400.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};

mod common;
use common::{body_json, call, create_test_app, register, registration_body, send};

fn fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_register_reports_all_missing_fields() {
    let (app, _) = create_test_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "ok_name"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let fields = fields(&body);
    for expected in [
        "email",
        "password",
        "firstName",
        "lastName",
        "dateOfBirth",
        "height",
        "weight",
        "gender",
    ] {
        assert!(fields.iter().any(|f| f == expected), "missing {}", expected);
    }
    assert!(!fields.iter().any(|f| f == "username"));
}

#[tokio::test]
async fn test_register_bounds() {
    let (app, _) = create_test_app().await;

    let cases = [
        ("username", json!("a b"), "username"),
        ("email", json!("not-an-email"), "email"),
        ("password", json!("12345"), "password"),
        ("height", json!(99), "height"),
        ("weight", json!(301), "weight"),
        ("dateOfBirth", json!("2020-01-01"), "dateOfBirth"),
        ("dateOfBirth", json!("1900-01-01"), "dateOfBirth"),
    ];

    for (key, value, field) in cases {
        let mut body = registration_body("bounds_user");
        body[key] = value.clone();
        let (status, response) = call(&app, "POST", "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} = {}", key, value);
        assert_eq!(fields(&response), vec![field.to_string()], "{} = {}", key, value);
    }
}

#[tokio::test]
async fn test_unknown_enum_value_is_bad_request() {
    let (app, _) = create_test_app().await;

    let mut body = registration_body("enum_user");
    body["gender"] = json!("robot");
    let (status, response) = call(&app, "POST", "/api/auth/register", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "bad_request");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_requires_valid_email() {
    let (app, _) = create_test_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nope", "password": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&body), vec!["email".to_string(), "password".to_string()]);
}

#[tokio::test]
async fn test_resource_bodies_validated() {
    let (app, _) = create_test_app().await;
    let (token, _, _) = register(&app, "resource_validation").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/workouts",
        Some(&token),
        Some(json!({"workoutType": "cardio", "activityName": "Run", "duration": 0, "caloriesBurned": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        fields(&body),
        vec!["caloriesBurned".to_string(), "duration".to_string()]
    );

    let (status, body) = call(
        &app,
        "POST",
        "/api/progress",
        Some(&token),
        Some(json!({"weight": 80, "bodyFatPercentage": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fields(&body), vec!["bodyFatPercentage".to_string()]);

    let (status, body) = call(
        &app,
        "PUT",
        "/api/users/preferences",
        Some(&token),
        Some(json!({"timezone": "", "dailyProteinGoal": 501})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        fields(&body),
        vec!["dailyProteinGoal".to_string(), "timezone".to_string()]
    );
}

#[tokio::test]
async fn test_bad_query_parameters() {
    let (app, _) = create_test_app().await;
    let (token, _, _) = register(&app, "query_validation").await;

    for uri in [
        "/api/nutrition?page=0",
        "/api/nutrition?limit=abc",
        "/api/nutrition?mealType=brunch",
        "/api/workouts?date=yesterday",
        "/api/workouts/stats?days=0",
        "/api/analytics/nutrition?days=366",
        "/api/progress?startDate=2025-03-05&endDate=2025-03-01",
    ] {
        let (status, body) = call(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "bad_request", "{}", uri);
    }
}
