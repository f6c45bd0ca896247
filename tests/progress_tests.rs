// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body progress tests.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use fitlife_tracker::time_utils::start_of_week;
use serde_json::json;

mod common;
use common::{call, create_test_app, register};

#[tokio::test]
async fn test_create_list_and_range() {
    let (app, _) = create_test_app().await;
    let (token, _, _) = register(&app, "weigher").await;

    for (weight, date) in [
        (82.0, "2025-01-05T07:00:00Z"),
        (81.0, "2025-01-12T07:00:00Z"),
        (80.0, "2025-01-19T07:00:00Z"),
    ] {
        let (status, body) = call(
            &app,
            "POST",
            "/api/progress",
            Some(&token),
            Some(json!({"weight": weight, "progressDate": date, "mood": "good"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["message"], "Progress entry added successfully");
    }

    let (status, body) = call(&app, "GET", "/api/progress", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["entries"][0]["weight"], 80.0);
    assert_eq!(body["entries"][0]["mood"], "good");

    let (_, body) = call(
        &app,
        "GET",
        "/api/progress?startDate=2025-01-10&endDate=2025-01-12",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["entries"][0]["weight"], 81.0);
}

#[tokio::test]
async fn test_weekly_comparison_averages() {
    let (app, _) = create_test_app().await;
    let (token, _, _) = register(&app, "averager").await;

    let (status, body) = call(&app, "GET", "/api/progress/weekly-comparison", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentWeek"]["avgWeight"], 0.0);
    assert_eq!(body["previousWeek"]["avgBodyFat"], 0.0);

    let this_week = start_of_week(Utc::now());
    let entries = [
        (this_week + Duration::hours(1), 80.0, Some(20.0)),
        (this_week + Duration::hours(2), 79.0, None),
        (this_week - Duration::days(3), 82.0, Some(22.0)),
        (this_week - Duration::days(10), 90.0, Some(30.0)),
    ];
    for (date, weight, body_fat) in entries {
        let (status, _) = call(
            &app,
            "POST",
            "/api/progress",
            Some(&token),
            Some(json!({
                "weight": weight,
                "bodyFatPercentage": body_fat,
                "progressDate": date.to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/api/progress/weekly-comparison", Some(&token), None).await;
    assert_eq!(body["currentWeek"]["avgWeight"], 79.5);
    // Only entries that recorded body fat count toward its average
    assert_eq!(body["currentWeek"]["avgBodyFat"], 20.0);
    assert_eq!(body["previousWeek"]["avgWeight"], 82.0);
    assert_eq!(body["previousWeek"]["avgBodyFat"], 22.0);
}

#[tokio::test]
async fn test_update_delete_and_scoping() {
    let (app, _) = create_test_app().await;
    let (owner, _, _) = register(&app, "measurer").await;
    let (other, _, _) = register(&app, "peeker").await;

    let (_, created) = call(
        &app,
        "POST",
        "/api/progress",
        Some(&owner),
        Some(json!({"weight": 75, "waistCircumference": 85})),
    )
    .await;
    let uri = format!("/api/progress/{}", created["entry"]["id"].as_str().unwrap());

    let (status, _) = call(&app, "PUT", &uri, Some(&other), Some(json!({"weight": 74}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        "PUT",
        &uri,
        Some(&owner),
        Some(json!({"weight": 74.2, "energyLevel": "very_high"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["weight"], 74.2);
    assert_eq!(body["entry"]["waistCircumference"], 85.0);
    assert_eq!(body["entry"]["energyLevel"], "very_high");

    let (status, _) = call(&app, "PUT", &uri, Some(&owner), Some(json!({"weight": 20}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Progress entry deleted successfully");
}
