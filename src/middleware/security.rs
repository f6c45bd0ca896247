// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Headers stamped on every response. The API only serves JSON, so the CSP
/// forbids everything.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    (
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains",
    ),
    (
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
    ("Cross-Origin-Resource-Policy", "same-site"),
];

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(*name, HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use tower::ServiceExt; // for oneshot

    #[tokio::test]
    async fn test_security_headers_on_success_and_error() {
        let app = Router::new()
            .route("/", get(|| async { "Hello" }))
            .route("/fail", get(|| async { StatusCode::BAD_REQUEST }))
            .layer(axum::middleware::from_fn(add_security_headers));

        for uri in ["/", "/fail"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            let headers = response.headers();
            assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
            assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
            assert_eq!(
                headers.get("Strict-Transport-Security").unwrap(),
                "max-age=31536000; includeSubDomains"
            );
            assert_eq!(
                headers.get("Referrer-Policy").unwrap(),
                "strict-origin-when-cross-origin"
            );
            assert!(headers.get("Content-Security-Policy").is_some());
        }
    }
}
