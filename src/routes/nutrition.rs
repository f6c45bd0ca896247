// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition log routes.

use super::params::{
    parse_days, parse_enum, parse_id, period_label, resolve_range, trailing_days, Pagination,
};
use super::{EntryResponse, MessageResponse};
use crate::db::{DateRange, NutritionFilter};
use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::stats::{DailyNutrition, MacroTotals, MealTypeStats};
use crate::models::{MealType, NewNutritionEntry, NutritionEntry};
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

const NOT_FOUND: &str = "Nutrition entry";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/nutrition", get(list_entries).post(create_entry))
        .route("/api/nutrition/stats", get(get_stats))
        .route("/api/nutrition/weekly-comparison", get(weekly_comparison))
        .route("/api/nutrition/{id}", put(update_entry).delete(delete_entry))
}

// ─── Request Bodies ──────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNutritionRequest {
    #[validate(
        required(message = "Food name is required"),
        length(min = 1, max = 100, message = "Food name must be between 1 and 100 characters")
    )]
    pub food_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Calories are required"),
        range(min = 0.0, message = "Calories must be a positive number")
    )]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Protein is required"),
        range(min = 0.0, message = "Protein must be a positive number")
    )]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Carbohydrates are required"),
        range(min = 0.0, message = "Carbohydrates must be a positive number")
    )]
    pub carbohydrates: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Fats are required"),
        range(min = 0.0, message = "Fats must be a positive number")
    )]
    pub fats: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Fiber must be a positive number"))]
    pub fiber: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Sugar must be a positive number"))]
    pub sugar: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Sodium must be a positive number"))]
    pub sodium: Option<f64>,
    #[validate(required(message = "Meal type must be breakfast, lunch, dinner, or snack"))]
    pub meal_type: Option<MealType>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub date_consumed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(exclusive_min = 0.0, message = "Portion size must be greater than 0"))]
    pub portion_size: Option<f64>,
    #[validate(length(min = 1, max = 20, message = "Portion unit must be between 1 and 20 characters"))]
    pub portion_unit: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl CreateNutritionRequest {
    fn into_new_entry(self, now: DateTime<Utc>) -> Result<NewNutritionEntry> {
        let missing = || AppError::BadRequest("Incomplete nutrition entry".to_string());
        Ok(NewNutritionEntry {
            food_name: self.food_name.ok_or_else(missing)?.trim().to_string(),
            calories: self.calories.ok_or_else(missing)?,
            protein: self.protein.ok_or_else(missing)?,
            carbohydrates: self.carbohydrates.ok_or_else(missing)?,
            fats: self.fats.ok_or_else(missing)?,
            fiber: self.fiber.unwrap_or(0.0),
            sugar: self.sugar.unwrap_or(0.0),
            sodium: self.sodium.unwrap_or(0.0),
            meal_type: self.meal_type.ok_or_else(missing)?,
            date_consumed: self.date_consumed.unwrap_or(now),
            portion_size: self.portion_size.unwrap_or(1.0),
            portion_unit: self.portion_unit.unwrap_or_else(|| "serving".to_string()),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNutritionRequest {
    #[validate(length(min = 1, max = 100, message = "Food name must be between 1 and 100 characters"))]
    pub food_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Calories must be a positive number"))]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Protein must be a positive number"))]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Carbohydrates must be a positive number"))]
    pub carbohydrates: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Fats must be a positive number"))]
    pub fats: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Fiber must be a positive number"))]
    pub fiber: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Sugar must be a positive number"))]
    pub sugar: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Sodium must be a positive number"))]
    pub sodium: Option<f64>,
    pub meal_type: Option<MealType>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub date_consumed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(exclusive_min = 0.0, message = "Portion size must be greater than 0"))]
    pub portion_size: Option<f64>,
    #[validate(length(min = 1, max = 20, message = "Portion unit must be between 1 and 20 characters"))]
    pub portion_unit: Option<String>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl UpdateNutritionRequest {
    fn apply(self, entry: &mut NutritionEntry, now: DateTime<Utc>) {
        if let Some(v) = self.food_name {
            entry.food_name = v.trim().to_string();
        }
        if let Some(v) = self.calories {
            entry.calories = v;
        }
        if let Some(v) = self.protein {
            entry.protein = v;
        }
        if let Some(v) = self.carbohydrates {
            entry.carbohydrates = v;
        }
        if let Some(v) = self.fats {
            entry.fats = v;
        }
        if let Some(v) = self.fiber {
            entry.fiber = v;
        }
        if let Some(v) = self.sugar {
            entry.sugar = v;
        }
        if let Some(v) = self.sodium {
            entry.sodium = v;
        }
        if let Some(v) = self.meal_type {
            entry.meal_type = v;
        }
        if let Some(v) = self.date_consumed {
            entry.date_consumed = v;
        }
        if let Some(v) = self.portion_size {
            entry.portion_size = v;
        }
        if let Some(v) = self.portion_unit {
            entry.portion_unit = v;
        }
        if self.notes.is_some() {
            entry.notes = self.notes;
        }
        entry.updated_at = now;
    }
}

// ─── Queries / Responses ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    date: Option<String>,
    meal_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    days: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionListResponse {
    pub entries: Vec<NutritionEntry>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    /// Sum over every entry matching the filters, not just this page
    pub total_calories: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionStatsResponse {
    pub daily_stats: Vec<DailyNutrition>,
    pub meal_type_stats: Vec<MealTypeStats>,
    pub period: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionWeeklyComparison {
    pub current_week: MacroTotals,
    pub last_week: MacroTotals,
}

// ─── Handlers ────────────────────────────────────────────────

async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateNutritionRequest>,
) -> Result<(StatusCode, Json<EntryResponse<NutritionEntry>>)> {
    let now = Utc::now();
    let entry = NutritionEntry::create(auth.user_id, body.into_new_entry(now)?, now);
    state.db.insert_nutrition(&entry).await?;

    tracing::debug!(user_id = %auth.user_id, entry_id = %entry.id, "Nutrition entry added");

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse::new("Nutrition entry added successfully", entry)),
    ))
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<NutritionListResponse>> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref())?;
    let filter = NutritionFilter {
        range: resolve_range(
            params.date.as_deref(),
            params.start_date.as_deref(),
            params.end_date.as_deref(),
        )?,
        meal_type: parse_enum("mealType", params.meal_type.as_deref())?,
    };

    let (entries, total_count, total_calories) = state
        .db
        .list_nutrition(auth.user_id, &filter, pagination.request()?)
        .await?;

    Ok(Json(NutritionListResponse {
        entries,
        total_count,
        total_pages: pagination.total_pages(total_count),
        current_page: pagination.page,
        total_calories,
    }))
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<NutritionStatsResponse>> {
    let days = parse_days(params.days.as_deref())?;
    let entries = state
        .db
        .nutrition_in_range(auth.user_id, trailing_days(days, Utc::now()))
        .await?;

    Ok(Json(NutritionStatsResponse {
        daily_stats: analytics::daily_nutrition(&entries),
        meal_type_stats: analytics::meal_type_stats(&entries),
        period: period_label(days),
    }))
}

/// Macro totals for this calendar week and the one before.
async fn weekly_comparison(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<NutritionWeeklyComparison>> {
    let this_week = start_of_week(Utc::now());
    let last_week = this_week - Duration::days(7);

    let entries = state
        .db
        .nutrition_in_range(auth.user_id, DateRange::since(last_week))
        .await?;
    let (current, previous): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.date_consumed >= this_week);

    Ok(Json(NutritionWeeklyComparison {
        current_week: analytics::macro_totals(&current),
        last_week: analytics::macro_totals(&previous),
    }))
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateNutritionRequest>,
) -> Result<Json<EntryResponse<NutritionEntry>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let mut entry = state
        .db
        .get_nutrition(auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    body.apply(&mut entry, Utc::now());
    state.db.update_nutrition(&entry).await?;

    Ok(Json(EntryResponse::new(
        "Nutrition entry updated successfully",
        entry,
    )))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    if !state.db.delete_nutrition(auth.user_id, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new(
        "Nutrition entry deleted successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateNutritionRequest = serde_json::from_str(
            r#"{"foodName":" Oats ","calories":"150","protein":5,"carbohydrates":27,
                "fats":3,"mealType":"breakfast","sodium":""}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let now = Utc::now();
        let new = req.into_new_entry(now).unwrap();
        assert_eq!(new.food_name, "Oats");
        assert_eq!(new.calories, 150.0);
        assert_eq!(new.sodium, 0.0);
        assert_eq!(new.portion_size, 1.0);
        assert_eq!(new.portion_unit, "serving");
        assert_eq!(new.date_consumed, now);
    }

    #[test]
    fn test_negative_macros_rejected() {
        let req: CreateNutritionRequest = serde_json::from_str(
            r#"{"foodName":"Oats","calories":-1,"protein":5,"carbohydrates":27,
                "fats":3,"mealType":"breakfast"}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("calories"));
    }

    #[test]
    fn test_update_only_touches_given_fields() {
        let now = Utc::now();
        let mut entry = NutritionEntry::create(
            uuid::Uuid::nil(),
            CreateNutritionRequest {
                food_name: Some("Rice".into()),
                calories: Some(200.0),
                protein: Some(4.0),
                carbohydrates: Some(45.0),
                fats: Some(0.5),
                fiber: None,
                sugar: None,
                sodium: None,
                meal_type: Some(MealType::Dinner),
                date_consumed: None,
                portion_size: None,
                portion_unit: None,
                notes: Some("plain".into()),
            }
            .into_new_entry(now)
            .unwrap(),
            now,
        );

        let later = now + Duration::minutes(5);
        UpdateNutritionRequest {
            calories: Some(250.0),
            ..Default::default()
        }
        .apply(&mut entry, later);

        assert_eq!(entry.calories, 250.0);
        assert_eq!(entry.food_name, "Rice");
        assert_eq!(entry.notes.as_deref(), Some("plain"));
        assert_eq!(entry.updated_at, later);
        assert_eq!(entry.created_at, now);
    }
}
