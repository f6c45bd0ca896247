// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod analytics;
pub mod auth;
pub mod notifications;
pub mod nutrition;
pub mod params;
pub mod progress;
pub mod users;
pub mod workouts;

use crate::error::AppError;
use crate::middleware::{rate_limit, require_auth};
use crate::AppState;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method};
use axum::response::Redirect;
use axum::{middleware, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// ─── Shared Response Bodies ──────────────────────────────────

/// `{message, entry}` returned by create and update handlers.
#[derive(Serialize)]
pub struct EntryResponse<T> {
    pub message: String,
    pub entry: T,
}

impl<T> EntryResponse<T> {
    pub fn new(message: &str, entry: T) -> Self {
        Self {
            message: message.to_string(),
            entry,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ─── Service Routes ──────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub database: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    let database = if state.db.ping().await {
        "connected"
    } else {
        "unavailable"
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        database: database.to_string(),
        environment: state.config.environment.as_str().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "FitLifeTracker API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "/api/auth",
            "/api/nutrition",
            "/api/workouts",
            "/api/progress",
            "/api/analytics",
            "/api/notifications",
            "/api/users",
        ],
    })
}

async fn not_found() -> AppError {
    AppError::NotFound("Route".to_string())
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS: configured frontend, extra configured origins and local dev servers
    let frontend_url = state.config.frontend_url.clone();
    let extra_origins = state.config.cors_allowed_origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || extra_origins.iter().any(|o| o == origin_str)
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(nutrition::routes())
        .merge(workouts::routes())
        .merge(progress::routes())
        .merge(analytics::routes())
        .merge(notifications::routes())
        .merge(users::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Everything under /api shares the per-client rate limit
    let api_routes = Router::new()
        .route("/api", get(api_info))
        .merge(auth::routes())
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/", get(|| async { Redirect::permanent("/api") }))
        .route("/health", get(health_check))
        .merge(api_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
