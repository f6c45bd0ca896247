// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded once from the environment.
//!
//! The resulting [`Config`] is immutable and shared through `AppState`;
//! nothing else in the crate reads process environment variables.

use std::env;
use std::time::Duration;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    pub environment: Environment,
    /// Frontend URL, always allowed by CORS
    pub frontend_url: String,
    /// Additional CORS origins
    pub cors_allowed_origins: Vec<String>,
    /// sqlx connection string
    pub database_url: String,

    // --- Secrets ---
    /// Signing key for access tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Signing key for refresh tokens, must differ from `jwt_secret`
    pub jwt_refresh_secret: Vec<u8>,

    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
}

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_DATABASE_URL: &str = "sqlite://fitlife.db?mode=rwc";
const DEFAULT_ACCESS_TTL: &str = "24h";
const DEFAULT_REFRESH_TTL: &str = "7d";
const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 15 * 60 * 1000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;

impl Config {
    /// Default config for testing only.
    ///
    /// Uses an in-memory database, the minimum bcrypt cost and a rate limit
    /// high enough that integration tests never trip it.
    pub fn test_default() -> Self {
        Self {
            port: 0,
            environment: Environment::Test,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            cors_allowed_origins: Vec::new(),
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: b"test_access_key_32_bytes_minimum!".to_vec(),
            jwt_refresh_secret: b"test_refresh_key_32_bytes_minimum".to_vec(),
            access_token_ttl: Duration::from_secs(24 * 60 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            bcrypt_cost: 4,
            rate_limit_window: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
            rate_limit_max_requests: 10_000,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            None | Some("") | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some("test") => Environment::Test,
            Some(other) => return Err(ConfigError::invalid("APP_ENV", other)),
        };

        let jwt_secret = lookup("JWT_SECRET")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?
            .into_bytes();
        let jwt_refresh_secret = lookup("JWT_REFRESH_SECRET")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_REFRESH_SECRET"))?
            .into_bytes();
        if jwt_secret == jwt_refresh_secret {
            return Err(ConfigError::SharedJwtSecret);
        }

        let access_raw = lookup("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_ACCESS_TTL.into());
        let refresh_raw =
            lookup("JWT_REFRESH_EXPIRES_IN").unwrap_or_else(|| DEFAULT_REFRESH_TTL.into());

        let bcrypt_cost = parse_number("BCRYPT_COST", &lookup, DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::invalid("BCRYPT_COST", bcrypt_cost.to_string()));
        }

        let window_ms: u64 =
            parse_number("RATE_LIMIT_WINDOW_MS", &lookup, DEFAULT_RATE_LIMIT_WINDOW_MS)?;

        Ok(Self {
            port: parse_number("PORT", &lookup, DEFAULT_PORT)?,
            environment,
            frontend_url: lookup("FRONTEND_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().trim_end_matches('/').to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_refresh_secret,
            access_token_ttl: parse_duration(&access_raw)
                .ok_or_else(|| ConfigError::invalid("JWT_EXPIRES_IN", access_raw.clone()))?,
            refresh_token_ttl: parse_duration(&refresh_raw).ok_or_else(|| {
                ConfigError::invalid("JWT_REFRESH_EXPIRES_IN", refresh_raw.clone())
            })?,
            bcrypt_cost,
            rate_limit_window: Duration::from_millis(window_ms),
            rate_limit_max_requests: parse_number(
                "RATE_LIMIT_MAX_REQUESTS",
                &lookup,
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            )?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_number<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(key, raw)),
        _ => Ok(default),
    }
}

/// Parse a token lifetime such as `90`, `45s`, `30m`, `24h` or `7d`.
///
/// A bare number is seconds. Zero is rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().ok()?;
    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return None,
    };
    let secs = value.checked_mul(multiplier)?;
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must be different")]
    SharedJwtSecret,
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
        ]))
        .expect("Config should load");

        assert_eq!(config.port, 10000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.access_token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(7 * 86_400));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "access"),
            ("JWT_REFRESH_SECRET", "refresh"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("JWT_EXPIRES_IN", "15m"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com/, https://b.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.is_production());
        assert_eq!(config.access_token_ttl, Duration::from_secs(900));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_config_requires_secrets() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "access")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_REFRESH_SECRET")));
    }

    #[test]
    fn test_config_rejects_shared_secret() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "same"),
            ("JWT_REFRESH_SECRET", "same"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::SharedJwtSecret));
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "a"),
            ("JWT_REFRESH_SECRET", "b"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("30m"), Some(Duration::from_secs(1800)));
        assert_eq!(parse_duration("24h"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_duration("0h"), None);
        assert_eq!(parse_duration("1w"), None);
        assert_eq!(parse_duration("h"), None);
    }
}
