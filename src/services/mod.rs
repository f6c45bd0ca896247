// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod analytics;
pub mod credentials;
pub mod notifications;
pub mod password;
pub mod rate_limit;
pub mod tokens;

pub use credentials::{CredentialStore, Registration};
pub use rate_limit::{RateDecision, RateLimiter};
pub use tokens::{Claims, TokenError, TokenPair, TokenService};
