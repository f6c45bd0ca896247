// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification feed routes.

use super::params::parse_id;
use super::MessageResponse;
use crate::db::DateRange;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::NotificationView;
use crate::services::notifications::{self, ReminderContext};
use crate::time_utils::{start_of_day, start_of_week};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const NOT_FOUND: &str = "Notification";
/// Stored rows included in the feed.
const FEED_LIMIT: i64 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/read-all", put(mark_all_read))
        .route("/api/notifications/{id}/read", put(mark_read))
        .route("/api/notifications/{id}", delete(delete_notification))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NotificationFeed {
    pub notifications: Vec<NotificationView>,
    pub unread_count: usize,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub notification: NotificationView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub message: String,
    pub marked_count: u64,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<NotificationFeed>> {
    let user_id = auth.user_id;
    let now = Utc::now();

    let (stored, preferences, workouts, nutrition, latest_progress) = tokio::try_join!(
        state.db.active_notifications(user_id, now, FEED_LIMIT),
        state.db.get_or_create_preferences(user_id),
        state
            .db
            .workouts_in_range(user_id, DateRange::since(start_of_week(now))),
        state
            .db
            .nutrition_in_range(user_id, DateRange::since(start_of_day(now))),
        state.db.recent_progress(user_id, 1),
    )?;

    let generated = notifications::generate(&ReminderContext {
        now,
        preferences: &preferences,
        workouts: &workouts,
        nutrition: &nutrition,
        latest_progress: latest_progress.first(),
    });
    let feed = notifications::merge(stored, generated);

    Ok(Json(NotificationFeed {
        unread_count: notifications::unread_count(&feed),
        notifications: feed,
    }))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MarkReadResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let notification = state
        .db
        .mark_notification_read(auth.user_id, id, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(MarkReadResponse {
        message: "Notification marked as read".to_string(),
        notification: notification.into(),
    }))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MarkAllReadResponse>> {
    let marked_count = state
        .db
        .mark_all_notifications_read(auth.user_id, Utc::now())
        .await?;

    Ok(Json(MarkAllReadResponse {
        message: format!("{} notifications marked as read", marked_count),
        marked_count,
    }))
}

async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    if !state.db.delete_notification(auth.user_id, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Notification deleted successfully")))
}
