// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body measurement routes.

use super::params::{parse_id, resolve_range, Pagination};
use super::{EntryResponse, MessageResponse};
use crate::db::DateRange;
use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::stats::BodyAverages;
use crate::models::{EnergyLevel, Mood, NewProgressEntry, ProgressEntry};
use crate::serde_utils::de_opt_f64;
use crate::services::analytics;
use crate::time_utils::{de_opt_datetime, start_of_week};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const NOT_FOUND: &str = "Progress entry";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/progress", get(list_progress).post(create_progress))
        .route("/api/progress/weekly-comparison", get(weekly_comparison))
        .route("/api/progress/{id}", put(update_progress).delete(delete_progress))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Weight is required"),
        range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg")
    )]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 5.0, max = 50.0, message = "Body fat percentage must be between 5 and 50"))]
    pub body_fat_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Muscle mass must be a positive number"))]
    pub muscle_mass: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Waist circumference must be a positive number"))]
    pub waist_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Chest circumference must be a positive number"))]
    pub chest_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Arm circumference must be a positive number"))]
    pub arm_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Thigh circumference must be a positive number"))]
    pub thigh_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub progress_date: Option<DateTime<Utc>>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy_level: Option<EnergyLevel>,
}

impl CreateProgressRequest {
    fn into_new_entry(self, now: DateTime<Utc>) -> Result<NewProgressEntry> {
        Ok(NewProgressEntry {
            weight: self
                .weight
                .ok_or_else(|| AppError::BadRequest("Weight is required".to_string()))?,
            body_fat_percentage: self.body_fat_percentage,
            muscle_mass: self.muscle_mass,
            waist_circumference: self.waist_circumference,
            chest_circumference: self.chest_circumference,
            arm_circumference: self.arm_circumference,
            thigh_circumference: self.thigh_circumference,
            progress_date: self.progress_date.unwrap_or(now),
            notes: self.notes,
            mood: self.mood,
            energy_level: self.energy_level,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 30.0, max = 300.0, message = "Weight must be between 30 and 300 kg"))]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 5.0, max = 50.0, message = "Body fat percentage must be between 5 and 50"))]
    pub body_fat_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Muscle mass must be a positive number"))]
    pub muscle_mass: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Waist circumference must be a positive number"))]
    pub waist_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Chest circumference must be a positive number"))]
    pub chest_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Arm circumference must be a positive number"))]
    pub arm_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Thigh circumference must be a positive number"))]
    pub thigh_circumference: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub progress_date: Option<DateTime<Utc>>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy_level: Option<EnergyLevel>,
}

impl UpdateProgressRequest {
    fn apply(self, entry: &mut ProgressEntry, now: DateTime<Utc>) {
        if let Some(v) = self.weight {
            entry.weight = v;
        }
        if let Some(v) = self.progress_date {
            entry.progress_date = v;
        }
        entry.body_fat_percentage = self.body_fat_percentage.or(entry.body_fat_percentage);
        entry.muscle_mass = self.muscle_mass.or(entry.muscle_mass);
        entry.waist_circumference = self.waist_circumference.or(entry.waist_circumference);
        entry.chest_circumference = self.chest_circumference.or(entry.chest_circumference);
        entry.arm_circumference = self.arm_circumference.or(entry.arm_circumference);
        entry.thigh_circumference = self.thigh_circumference.or(entry.thigh_circumference);
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
        entry.mood = self.mood.or(entry.mood);
        entry.energy_level = self.energy_level.or(entry.energy_level);
        entry.updated_at = now;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressListResponse {
    pub entries: Vec<ProgressEntry>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressWeeklyComparison {
    pub previous_week: BodyAverages,
    pub current_week: BodyAverages,
}

async fn create_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateProgressRequest>,
) -> Result<(StatusCode, Json<EntryResponse<ProgressEntry>>)> {
    let now = Utc::now();
    let entry = ProgressEntry::create(auth.user_id, body.into_new_entry(now)?, now);
    state.db.insert_progress(&entry).await?;

    tracing::debug!(user_id = %auth.user_id, entry_id = %entry.id, "Progress entry added");

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse::new("Progress entry added successfully", entry)),
    ))
}

async fn list_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ProgressListResponse>> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref())?;
    let range = resolve_range(None, params.start_date.as_deref(), params.end_date.as_deref())?;

    let (entries, total_count) = state
        .db
        .list_progress(auth.user_id, range, pagination.request()?)
        .await?;

    Ok(Json(ProgressListResponse {
        entries,
        total_count,
        total_pages: pagination.total_pages(total_count),
        current_page: pagination.page,
    }))
}

/// Averages for the previous and current Sunday-based weeks.
async fn weekly_comparison(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProgressWeeklyComparison>> {
    let this_week = start_of_week(Utc::now());
    let last_week = this_week - Duration::days(7);

    let entries = state
        .db
        .progress_in_range(auth.user_id, DateRange::since(last_week))
        .await?;
    let (current, previous): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.progress_date >= this_week);

    Ok(Json(ProgressWeeklyComparison {
        previous_week: analytics::body_averages(&previous),
        current_week: analytics::body_averages(&current),
    }))
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateProgressRequest>,
) -> Result<Json<EntryResponse<ProgressEntry>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let mut entry = state
        .db
        .get_progress(auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    body.apply(&mut entry, Utc::now());
    state.db.update_progress(&entry).await?;

    Ok(Json(EntryResponse::new(
        "Progress entry updated successfully",
        entry,
    )))
}

async fn delete_progress(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    if !state.db.delete_progress(auth.user_id, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Progress entry deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds() {
        for (weight, ok) in [(29.9, false), (30.0, true), (300.0, true), (300.5, false)] {
            let req = CreateProgressRequest {
                weight: Some(weight),
                ..serde_json::from_str("{}").unwrap()
            };
            assert_eq!(req.validate().is_ok(), ok, "weight {}", weight);
        }
    }

    #[test]
    fn test_missing_weight_is_field_error() {
        let req: CreateProgressRequest = serde_json::from_str(r#"{"bodyFatPercentage":20}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("weight"));
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let now = Utc::now();
        let mut entry = ProgressEntry::create(
            uuid::Uuid::new_v4(),
            NewProgressEntry {
                weight: 80.0,
                body_fat_percentage: Some(20.0),
                muscle_mass: None,
                waist_circumference: Some(90.0),
                chest_circumference: None,
                arm_circumference: None,
                thigh_circumference: None,
                progress_date: now,
                notes: Some("start".into()),
                mood: Some(Mood::Good),
                energy_level: None,
            },
            now,
        );

        let update: UpdateProgressRequest =
            serde_json::from_str(r#"{"weight":79.5,"energyLevel":"high"}"#).unwrap();
        update.apply(&mut entry, now);

        assert_eq!(entry.weight, 79.5);
        assert_eq!(entry.body_fat_percentage, Some(20.0));
        assert_eq!(entry.waist_circumference, Some(90.0));
        assert_eq!(entry.notes.as_deref(), Some("start"));
        assert_eq!(entry.mood, Some(Mood::Good));
        assert_eq!(entry.energy_level, Some(EnergyLevel::High));
    }
}
