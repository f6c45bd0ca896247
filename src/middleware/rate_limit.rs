// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-IP rate limiting middleware.

use crate::error::AppError;
use crate::services::RateDecision;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

const UNKNOWN_CLIENT: &str = "unknown";

/// Client key for rate limiting: the peer address when the server was
/// started with connect-info, otherwise the last `X-Forwarded-For` hop.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').last())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    let limit = state.rate_limiter.max_requests();

    match state.rate_limiter.check(&key) {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("RateLimit-Limit", HeaderValue::from(limit));
            headers.insert("RateLimit-Remaining", HeaderValue::from(remaining));
            response
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, "Rate limit exceeded");
            let mut response = AppError::RateLimited.into_response();
            let headers = response.headers_mut();
            headers.insert("RateLimit-Limit", HeaderValue::from(limit));
            headers.insert("RateLimit-Remaining", HeaderValue::from(0u32));
            headers.insert(
                "Retry-After",
                HeaderValue::from(retry_after.as_secs().max(1)),
            );
            response
        }
    }
}
