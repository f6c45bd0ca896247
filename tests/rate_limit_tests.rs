// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-client rate limiting on /api routes.

use axum::http::StatusCode;
use fitlife_tracker::config::Config;
use serde_json::json;

mod common;
use common::{body_json, create_test_app_with, json_request, send};

fn limited_config() -> Config {
    let mut config = Config::test_default();
    config.rate_limit_max_requests = 2;
    config
}

fn from_client(uri: &str, ip: &str) -> axum::http::Request<axum::body::Body> {
    let mut request = json_request("GET", uri, None, None);
    request
        .headers_mut()
        .insert("x-forwarded-for", ip.parse().unwrap());
    request
}

#[tokio::test]
async fn test_third_request_in_window_is_rejected() {
    let (app, _) = create_test_app_with(limited_config()).await;

    let first = send(&app, from_client("/api", "198.51.100.1")).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers().get("RateLimit-Limit").unwrap(), "2");
    assert_eq!(first.headers().get("RateLimit-Remaining").unwrap(), "1");

    let second = send(&app, from_client("/api", "198.51.100.1")).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get("RateLimit-Remaining").unwrap(), "0");

    let third = send(&app, from_client("/api", "198.51.100.1")).await;
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = third
        .headers()
        .get("Retry-After")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);
    let body = body_json(third).await;
    assert_eq!(body["error"], "rate_limited");
    assert_eq!(
        body["message"],
        "Too many requests from this IP, please try again later."
    );
}

#[tokio::test]
async fn test_clients_are_counted_separately() {
    let (app, _) = create_test_app_with(limited_config()).await;

    for _ in 0..2 {
        send(&app, from_client("/api", "198.51.100.2")).await;
    }
    let blocked = send(&app, from_client("/api", "198.51.100.2")).await;
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = send(&app, from_client("/api", "198.51.100.3")).await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rejected_logins_still_count() {
    let (app, _) = create_test_app_with(limited_config()).await;

    for _ in 0..2 {
        let mut request = json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "guess"})),
        );
        request
            .headers_mut()
            .insert("x-forwarded-for", "198.51.100.4".parse().unwrap());
        assert_eq!(send(&app, request).await.status(), StatusCode::UNAUTHORIZED);
    }

    let blocked = send(&app, from_client("/api", "198.51.100.4")).await;
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_is_not_limited() {
    let (app, _) = create_test_app_with(limited_config()).await;

    for _ in 0..5 {
        let response = send(&app, from_client("/health", "198.51.100.5")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("RateLimit-Limit").is_none());
    }
}
