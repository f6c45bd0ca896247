// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, token refresh and profile routes.

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityLevel, FitnessGoal, Gender, ProfileChanges, UserResponse};
use crate::serde_utils::{de_nullable, de_opt_f64};
use crate::services::Registration;
use crate::time_utils::{age_on, de_opt_date};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh-token", post(refresh_token))
}

/// Profile routes; the auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/profile", get(get_profile).put(update_profile))
}

// ─── Field Rules ─────────────────────────────────────────────

const MIN_AGE: i32 = 13;
const MAX_AGE: i32 = 100;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub(crate) fn validate_username(username: &str) -> std::result::Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        Ok(())
    } else {
        Err(invalid(
            "username_chars",
            "Username can only contain letters, numbers, underscores, dots, and hyphens",
        ))
    }
}

pub(crate) fn validate_birth_date(dob: &NaiveDate) -> std::result::Result<(), ValidationError> {
    let age = age_on(*dob, Utc::now().date_naive());
    if age < MIN_AGE {
        Err(invalid("age", "Must be at least 13 years old"))
    } else if age > MAX_AGE {
        Err(invalid("age", "Invalid age"))
    } else {
        Ok(())
    }
}

// ─── Request / Response Types ────────────────────────────────

/// Registration body. Fields are `Option` at the serde level; a missing field
/// is a validation error like any other.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        required(message = "Username is required"),
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Email is required"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters long")
    )]
    pub password: Option<String>,
    #[validate(
        required(message = "First name is required"),
        length(min = 2, max = 50, message = "First name must be between 2 and 50 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "Last name is required"),
        length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters")
    )]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    #[validate(
        required(message = "Date of birth is required"),
        custom(function = "validate_birth_date")
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Height is required"),
        range(min = 100.0, max = 250.0, message = "Height must be between 100 and 250 cm")
    )]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Weight is required"),
        range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg")
    )]
    pub weight: Option<f64>,
    #[validate(required(message = "Gender must be male, female, or other"))]
    pub gender: Option<Gender>,
    pub fitness_goal: Option<FitnessGoal>,
    pub activity_level: Option<ActivityLevel>,
}

impl RegisterRequest {
    /// Convert a validated request. Fails only if called without validating.
    fn into_registration(self) -> Result<Registration> {
        let missing = || AppError::BadRequest("Incomplete registration".to_string());
        Ok(Registration {
            username: self.username.ok_or_else(missing)?,
            email: self.email.ok_or_else(missing)?,
            password: self.password.ok_or_else(missing)?,
            first_name: self.first_name.ok_or_else(missing)?,
            last_name: self.last_name.ok_or_else(missing)?,
            date_of_birth: self.date_of_birth.ok_or_else(missing)?,
            height: self.height.ok_or_else(missing)?,
            weight: self.weight.ok_or_else(missing)?,
            gender: self.gender.ok_or_else(missing)?,
            fitness_goal: self.fitness_goal.unwrap_or_default(),
            activity_level: self.activity_level.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Valid email is required"),
        email(message = "Valid email is required")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Partial profile update; absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50, message = "First name must be between 2 and 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    #[validate(custom(function = "validate_birth_date"))]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 100.0, max = 250.0, message = "Height must be between 100 and 250 cm"))]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg"))]
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub fitness_goal: Option<FitnessGoal>,
    pub activity_level: Option<ActivityLevel>,
    /// `null` removes the image.
    #[serde(default, deserialize_with = "de_nullable")]
    #[validate(length(max = 500, message = "Profile image URL is too long"))]
    pub profile_image: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name.map(|s| s.trim().to_string()),
            last_name: req.last_name.map(|s| s.trim().to_string()),
            date_of_birth: req.date_of_birth,
            height: req.height,
            weight: req.weight,
            gender: req.gender,
            fitness_goal: req.fitness_goal,
            activity_level: req.activity_level,
            profile_image: req.profile_image,
        }
    }
}

/// Body returned by register and login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserResponse,
}

// ─── Handlers ────────────────────────────────────────────────

async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = state.credentials.create(body.into_registration()?).await?;
    let tokens = state.tokens.issue_pair(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user: user.into(),
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let Some(mut user) = state.credentials.authenticate(&email, &password).await? else {
        tracing::info!("Login rejected");
        return Err(AppError::InvalidCredentials);
    };

    let now = Utc::now();
    state.db.record_login(user.id, now).await?;
    user.last_login = Some(now);
    user.updated_at = now;

    let tokens = state.tokens.issue_pair(user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: user.into(),
    }))
}

/// Exchange a refresh token for a new pair. Every failure is a 403.
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>> {
    let raw = body
        .refresh_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::InvalidRefreshToken)?;

    let claims = state
        .tokens
        .verify_refresh(raw.trim())
        .map_err(|_| AppError::InvalidRefreshToken)?;

    if state.db.get_user(claims.user_id).await?.is_none() {
        tracing::info!(user_id = %claims.user_id, "Refresh for deleted user");
        return Err(AppError::InvalidRefreshToken);
    }

    let tokens = state.tokens.issue_pair(claims.user_id)?;
    Ok(Json(TokenResponse {
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(Json(ProfileResponse {
        message: None,
        user: user.into(),
    }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let changes = ProfileChanges::from(body);
    let user = state
        .db
        .update_profile(auth.user_id, &changes, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(ProfileResponse {
        message: Some("Profile updated successfully".to_string()),
        user: user.into(),
    }))
}
