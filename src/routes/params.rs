// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query-string and path parameter parsing shared by the resource routes.
//!
//! Parameters arrive as raw strings; a bad value is an `AppError` with the
//! usual JSON body.

use crate::db::{DateRange, PageRequest};
use crate::error::{AppError, Result};
use crate::time_utils::{parse_flexible_datetime, start_of_day};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_STATS_DAYS: i64 = 7;
pub const MAX_STATS_DAYS: i64 = 365;

/// Validated `page`/`limit` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = match non_empty(page) {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| {
                    AppError::BadRequest("Page must be a positive integer".to_string())
                })?,
        };
        let limit = match non_empty(limit) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|l| *l >= 1)
                .ok_or_else(|| {
                    AppError::BadRequest("Limit must be a positive integer".to_string())
                })?
                .min(MAX_PAGE_SIZE),
        };
        Ok(Self { page, limit })
    }

    pub fn request(&self) -> Result<PageRequest> {
        let offset = (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;
        Ok(PageRequest {
            limit: self.limit,
            offset,
        })
    }

    pub fn total_pages(&self, total_count: i64) -> i64 {
        (total_count + self.limit - 1) / self.limit
    }
}

/// Window in days for stats endpoints, default 7, allowed 1..=365.
pub fn parse_days(raw: Option<&str>) -> Result<i64> {
    match non_empty(raw) {
        None => Ok(DEFAULT_STATS_DAYS),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|d| (1..=MAX_STATS_DAYS).contains(d))
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "days must be an integer between 1 and {}",
                    MAX_STATS_DAYS
                ))
            }),
    }
}

/// Window covering the trailing `days` up to now.
pub fn trailing_days(days: i64, now: DateTime<Utc>) -> DateRange {
    DateRange::since(now - Duration::days(days))
}

/// `period` label echoed by the stats endpoints.
pub fn period_label(days: i64) -> String {
    format!("{} days", days)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn is_date_only(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_ok()
}

fn parse_datetime_param(name: &str, raw: &str) -> Result<DateTime<Utc>> {
    parse_flexible_datetime(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid '{}' parameter: expected YYYY-MM-DD or RFC3339 timestamp",
            name
        ))
    })
}

/// Resolve `date`, `startDate` and `endDate` query parameters.
///
/// `date` selects one UTC day. `startDate`/`endDate` take precedence; a
/// date-only `endDate` includes that whole day.
pub fn resolve_range(
    date: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DateRange> {
    let start_date = non_empty(start_date);
    let end_date = non_empty(end_date);

    if start_date.is_some() || end_date.is_some() {
        let start = start_date
            .map(|raw| parse_datetime_param("startDate", raw))
            .transpose()?;
        let end = end_date
            .map(|raw| {
                let at = parse_datetime_param("endDate", raw)?;
                Ok::<_, AppError>(if is_date_only(raw) {
                    at + Duration::days(1)
                } else {
                    at
                })
            })
            .transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(AppError::BadRequest(
                    "startDate must be before endDate".to_string(),
                ));
            }
        }
        return Ok(DateRange { start, end });
    }

    match non_empty(date) {
        Some(raw) => {
            let day = start_of_day(parse_datetime_param("date", raw)?);
            Ok(DateRange::between(day, day + Duration::days(1)))
        }
        None => Ok(DateRange::default()),
    }
}

/// Parse a snake_case enum value such as `mealType=breakfast`.
pub fn parse_enum<T: DeserializeOwned>(name: &str, raw: Option<&str>) -> Result<Option<T>> {
    non_empty(raw)
        .map(|raw| {
            serde_json::from_value(serde_json::Value::String(raw.to_string()))
                .map_err(|_| AppError::BadRequest(format!("Invalid '{}' value: {}", name, raw)))
        })
        .transpose()
}

/// A path id that is not a UUID cannot name an existing row.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;
    use chrono::TimeZone;

    #[test]
    fn test_pagination_defaults_and_cap() {
        let p = Pagination::parse(None, None).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: 20 });

        let p = Pagination::parse(Some("3"), Some("500")).unwrap();
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.request().unwrap().offset, 200);

        assert!(Pagination::parse(Some("0"), None).is_err());
        assert!(Pagination::parse(Some("abc"), None).is_err());
        assert!(Pagination::parse(None, Some("-1")).is_err());
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination { page: 1, limit: 20 };
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(20), 1);
        assert_eq!(p.total_pages(21), 2);
    }

    #[test]
    fn test_parse_days_bounds() {
        assert_eq!(parse_days(None).unwrap(), 7);
        assert_eq!(parse_days(Some("30")).unwrap(), 30);
        assert!(parse_days(Some("0")).is_err());
        assert!(parse_days(Some("366")).is_err());
        assert!(parse_days(Some("week")).is_err());
    }

    #[test]
    fn test_single_day_range() {
        let range = resolve_range(Some("2025-03-10"), None, None).unwrap();
        assert_eq!(
            range,
            DateRange::between(
                Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap(),
            )
        );
    }

    #[test]
    fn test_explicit_range_overrides_date() {
        let range = resolve_range(
            Some("2025-03-10"),
            Some("2025-03-01"),
            Some("2025-03-05"),
        )
        .unwrap();
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
        // Date-only end includes the whole day
        assert_eq!(
            range.end,
            Some(Utc.with_ymd_and_hms(2025, 3, 6, 0, 0, 0).unwrap())
        );

        let exact = resolve_range(None, None, Some("2025-03-05T12:00:00Z")).unwrap();
        assert_eq!(exact.start, None);
        assert_eq!(
            exact.end,
            Some(Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_bad_ranges_rejected() {
        assert!(resolve_range(Some("yesterday"), None, None).is_err());
        assert!(resolve_range(None, Some("2025-03-05"), Some("2025-03-01")).is_err());
        assert_eq!(resolve_range(None, None, None).unwrap(), DateRange::default());
    }

    #[test]
    fn test_parse_enum() {
        let meal: Option<MealType> = parse_enum("mealType", Some("dinner")).unwrap();
        assert_eq!(meal, Some(MealType::Dinner));
        let none: Option<MealType> = parse_enum("mealType", Some("")).unwrap();
        assert_eq!(none, None);
        assert!(parse_enum::<MealType>("mealType", Some("brunch")).is_err());
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("not-a-uuid", "Workout").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Workout").unwrap(), id);
    }
}
