// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account management: preferences, password change, data export and
//! account deletion.

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{
    MeasurementSystem, NotificationView, NutritionEntry, ProgressEntry, Theme, UserPreferences,
    UserResponse, Workout,
};
use crate::serde_utils::{de_nullable_i64, de_opt_i64};
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Phrase the client must send to delete an account.
pub const DELETE_CONFIRMATION: &str = "DELETE MY ACCOUNT";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/users/preferences",
            get(get_preferences).put(update_preferences),
        )
        .route("/api/users/change-password", post(change_password))
        .route("/api/users/export", get(export_data))
        .route("/api/users/account", delete(delete_account))
}

// ─── Preferences ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub weekly_reports: Option<bool>,
    pub goal_reminders: Option<bool>,
    #[validate(length(min = 2, max = 5, message = "Language must be between 2 and 5 characters"))]
    pub language: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Timezone must be between 1 and 50 characters"))]
    pub timezone: Option<String>,
    pub measurement_system: Option<MeasurementSystem>,
    #[serde(default, deserialize_with = "de_nullable_i64")]
    #[validate(range(min = 500, max = 10000, message = "Daily calorie goal must be between 500 and 10000"))]
    pub daily_calorie_goal: Option<Option<i64>>,
    #[serde(default, deserialize_with = "de_nullable_i64")]
    #[validate(range(min = 0, max = 500, message = "Daily protein goal must be between 0 and 500"))]
    pub daily_protein_goal: Option<Option<i64>>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 0, max = 20, message = "Weekly workout goal must be between 0 and 20"))]
    pub weekly_workout_goal: Option<i64>,
}

impl UpdatePreferencesRequest {
    fn apply(self, prefs: &mut UserPreferences, now: DateTime<Utc>) {
        if let Some(v) = self.theme {
            prefs.theme = v;
        }
        if let Some(v) = self.weekly_reports {
            prefs.weekly_reports = v;
        }
        if let Some(v) = self.goal_reminders {
            prefs.goal_reminders = v;
        }
        if let Some(v) = self.language {
            prefs.language = v;
        }
        if let Some(v) = self.timezone {
            prefs.timezone = v;
        }
        if let Some(v) = self.measurement_system {
            prefs.measurement_system = v;
        }
        // An explicit null clears a goal
        if let Some(v) = self.daily_calorie_goal {
            prefs.daily_calorie_goal = v;
        }
        if let Some(v) = self.daily_protein_goal {
            prefs.daily_protein_goal = v;
        }
        if let Some(v) = self.weekly_workout_goal {
            prefs.weekly_workout_goal = v;
        }
        prefs.updated_at = now;
    }
}

#[derive(Serialize)]
pub struct PreferencesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub preferences: UserPreferences,
}

async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<PreferencesResponse>> {
    let preferences = state.db.get_or_create_preferences(auth.user_id).await?;
    Ok(Json(PreferencesResponse {
        message: None,
        preferences,
    }))
}

async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>> {
    let mut preferences = state.db.get_or_create_preferences(auth.user_id).await?;
    body.apply(&mut preferences, Utc::now());
    state.db.update_preferences(&preferences).await?;

    Ok(Json(PreferencesResponse {
        message: Some("Preferences updated successfully".to_string()),
        preferences,
    }))
}

// ─── Password ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(
        required(message = "Current password is required"),
        length(min = 1, message = "Current password is required")
    )]
    pub current_password: Option<String>,
    #[validate(
        required(message = "New password is required"),
        length(min = 6, message = "New password must be at least 6 characters long")
    )]
    pub new_password: Option<String>,
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(current), Some(new)) = (body.current_password, body.new_password) else {
        return Err(AppError::BadRequest(
            "Current password and new password are required".to_string(),
        ));
    };

    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if !state.credentials.verify_password(&user, &current).await? {
        tracing::info!(user_id = %user.id, "Password change rejected: wrong current password");
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    state.credentials.update_password(&user, &new).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ─── Export ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ExportSection<T> {
    pub count: usize,
    pub entries: Vec<T>,
}

impl<T> From<Vec<T>> for ExportSection<T> {
    fn from(entries: Vec<T>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }
}

#[derive(Serialize)]
pub struct ExportedUser {
    #[serde(flatten)]
    pub user: UserResponse,
    pub preferences: Option<UserPreferences>,
}

#[derive(Serialize)]
pub struct ExportedData {
    pub nutrition: ExportSection<NutritionEntry>,
    pub workouts: ExportSection<Workout>,
    pub progress: ExportSection<ProgressEntry>,
    pub notifications: ExportSection<NotificationView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// Nutrition, workout and progress rows; notifications are not counted
    pub total_entries: usize,
    pub account_created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub export_date: DateTime<Utc>,
    pub user: ExportedUser,
    pub data: ExportedData,
    pub summary: ExportSummary,
}

async fn export_data(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let user_id = auth.user_id;
    let (user, preferences, nutrition, workouts, progress, notifications) = tokio::try_join!(
        state.db.get_user(user_id),
        state.db.get_preferences(user_id),
        state.db.all_nutrition(user_id),
        state.db.all_workouts(user_id),
        state.db.all_progress(user_id),
        state.db.all_notifications(user_id),
    )?;
    let user = user.ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let now = Utc::now();
    let summary = ExportSummary {
        total_entries: nutrition.len() + workouts.len() + progress.len(),
        account_created: user.created_at,
        last_login: user.last_login,
    };
    let export = DataExport {
        export_date: now,
        user: ExportedUser {
            user: user.into(),
            preferences,
        },
        data: ExportedData {
            nutrition: nutrition.into(),
            workouts: workouts.into(),
            progress: progress.into(),
            notifications: notifications
                .into_iter()
                .map(NotificationView::from)
                .collect::<Vec<_>>()
                .into(),
        },
        summary,
    };

    let disposition = format!(
        "attachment; filename=\"fitlifetracker-data-{}-{}.json\"",
        user_id,
        now.timestamp_millis()
    );
    tracing::info!(user_id = %user_id, total = export.summary.total_entries, "Exported user data");

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(export)))
}

// ─── Deletion ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    pub confirmation: Option<String>,
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>> {
    if body.confirmation.as_deref() != Some(DELETE_CONFIRMATION) {
        return Err(AppError::BadRequest(format!(
            "Confirmation phrase is required to delete account. Please type \"{}\" to confirm.",
            DELETE_CONFIRMATION
        )));
    }

    if !state.db.delete_account(auth.user_id).await? {
        return Err(AppError::NotFound("User".to_string()));
    }

    Ok(Json(MessageResponse::new(
        "Account and all associated data have been permanently deleted.",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_preference_bounds() {
        let ok: UpdatePreferencesRequest =
            serde_json::from_str(r#"{"language":"en","dailyCalorieGoal":2000,"weeklyWorkoutGoal":3}"#)
                .unwrap();
        assert!(ok.validate().is_ok());

        let bad: UpdatePreferencesRequest = serde_json::from_str(
            r#"{"language":"english","dailyCalorieGoal":100,"weeklyWorkoutGoal":21}"#,
        )
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("language"));
        assert!(fields.contains_key("daily_calorie_goal"));
        assert!(fields.contains_key("weekly_workout_goal"));
    }

    #[test]
    fn test_apply_preferences() {
        let now = Utc::now();
        let mut prefs = UserPreferences::defaults(Uuid::new_v4(), now);
        let update: UpdatePreferencesRequest =
            serde_json::from_str(r#"{"theme":"dark","goalReminders":false,"dailyProteinGoal":120}"#)
                .unwrap();
        update.apply(&mut prefs, now);

        assert_eq!(prefs.theme, Theme::Dark);
        assert!(!prefs.goal_reminders);
        assert_eq!(prefs.daily_protein_goal, Some(120));
        assert_eq!(prefs.language, "en");
        assert_eq!(prefs.weekly_workout_goal, 5);
    }

    #[test]
    fn test_null_clears_goals() {
        let now = Utc::now();
        let mut prefs = UserPreferences::defaults(Uuid::new_v4(), now);
        prefs.daily_calorie_goal = Some(2200);
        prefs.daily_protein_goal = Some(120);

        let update: UpdatePreferencesRequest =
            serde_json::from_str(r#"{"dailyCalorieGoal":null}"#).unwrap();
        assert!(update.validate().is_ok());
        update.apply(&mut prefs, now);

        assert_eq!(prefs.daily_calorie_goal, None);
        assert_eq!(prefs.daily_protein_goal, Some(120));
    }

    #[test]
    fn test_export_section_counts() {
        let section: ExportSection<u8> = vec![1, 2, 3].into();
        assert_eq!(section.count, 3);
    }
}
