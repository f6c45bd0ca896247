// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON body extractor that validates before the handler runs.

use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// `Json<T>` followed by `T::validate()`.
///
/// Malformed bodies become [`AppError::BadRequest`] and rule violations
/// become [`AppError::Validation`], so every failure is a JSON 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            "Request body too large".to_string()
        }
        other => other.body_text(),
    };
    AppError::BadRequest(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Greeting {
        #[validate(length(min = 2, message = "Name is too short"))]
        name: String,
    }

    async fn extract(body: &str, content_type: &str) -> Result<Greeting, AppError> {
        let req = Request::builder()
            .method("POST")
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        ValidatedJson::<Greeting>::from_request(req, &())
            .await
            .map(|v| v.0)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let greeting = extract(r#"{"name":"Ada"}"#, "application/json")
            .await
            .unwrap();
        assert_eq!(greeting.name, "Ada");
    }

    #[tokio::test]
    async fn test_validation_failure_lists_fields() {
        match extract(r#"{"name":"A"}"#, "application/json").await {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[0].message, "Name is too short");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        assert!(matches!(
            extract("{not json", "application/json").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            extract(r#"{"name":5}"#, "application/json").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            extract(r#"{"name":"Ada"}"#, "text/plain").await,
            Err(AppError::BadRequest(_))
        ));
    }
}
