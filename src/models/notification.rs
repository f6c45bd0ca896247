// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored and generated user notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum NotificationKind {
    Reminder,
    Nutrition,
    Progress,
    Achievement,
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// Row in the `notifications` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub is_read: bool,
    pub metadata: Option<Json<Value>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Set when the row was stored for a rule that may fire again
    pub dedupe_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            priority,
            is_read: false,
            metadata: None,
            expires_at: None,
            dedupe_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Greeting stored for every new account.
    pub fn welcome(user_id: Uuid, first_name: &str, now: DateTime<Utc>) -> Self {
        let mut notification = Self::new(
            user_id,
            NotificationKind::System,
            "Welcome to FitLifeTracker!",
            format!(
                "Hi {}, your account is ready. Start by logging a workout or a meal.",
                first_name
            ),
            Priority::Medium,
            now,
        );
        notification.metadata = Some(Json(serde_json::json!({ "event": "registration" })));
        notification.dedupe_key = Some("welcome".to_string());
        notification
    }

    /// Key used to merge stored rows with generated reminders.
    pub fn key(&self) -> String {
        self.dedupe_key
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Notification as returned by the API.
///
/// Generated reminders have no `id` and cannot be marked read or deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NotificationView {
    pub id: Option<Uuid>,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub is_read: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub metadata: Option<Value>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub generated: bool,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        Self {
            key: n.key(),
            id: Some(n.id),
            kind: n.kind,
            title: n.title,
            message: n.message,
            priority: n.priority,
            is_read: n.is_read,
            metadata: n.metadata.map(|m| m.0),
            expires_at: n.expires_at,
            created_at: n.created_at,
            generated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_falls_back_to_id() {
        let now = Utc::now();
        let mut n = Notification::new(
            Uuid::new_v4(),
            NotificationKind::Reminder,
            "t",
            "m",
            Priority::High,
            now,
        );
        assert_eq!(n.key(), n.id.to_string());

        n.dedupe_key = Some("workout-reminder-2025-01-01".into());
        assert_eq!(n.key(), "workout-reminder-2025-01-01");
    }

    #[test]
    fn test_view_serializes_kind_as_type() {
        let n = Notification::welcome(Uuid::new_v4(), "Ada", Utc::now());
        let json = serde_json::to_value(NotificationView::from(n)).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["generated"], false);
        assert_eq!(json["metadata"]["event"], "registration");
        assert_eq!(json["key"], "welcome");
    }
}
