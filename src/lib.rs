// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitLifeTracker: personal fitness tracking backend
//!
//! This crate provides the REST API for account management and for logging
//! nutrition, workouts and body measurements, along with the derived
//! analytics and reminder notifications.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod serde_utils;
pub mod services;
pub mod time_utils;

#[cfg(test)]
pub(crate) mod test_support;

use config::Config;
use db::Database;
use services::{CredentialStore, RateLimiter, TokenService};
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl AppState {
    /// Wire up services from a loaded config and an open database.
    pub fn new(config: Config, db: Database) -> Result<Self, services::TokenError> {
        let tokens = TokenService::from_config(&config)?;
        let credentials = CredentialStore::new(db.clone(), config.bcrypt_cost);
        let rate_limiter =
            RateLimiter::new(config.rate_limit_window, config.rate_limit_max_requests);
        Ok(Self {
            config,
            db,
            credentials,
            tokens,
            rate_limiter,
            started_at: Instant::now(),
        })
    }
}
