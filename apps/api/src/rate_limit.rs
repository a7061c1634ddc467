//! Request rate limiting for the generate endpoint.
//!
//! Consulted by the HTTP handler only; generation itself knows nothing about it.
//! Fixed window per candidate and minute, counted in Redis with INCR + EXPIRE.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;
use crate::models::candidate::CandidateData;

const WINDOW_SECS: u64 = 60;
const KEY_PREFIX: &str = "competence:rate";

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Denied { limit: u32, retry_after_secs: u64 },
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &str) -> Result<RateDecision, RateLimitError>;
}

/// Stable limiter key for a candidate: email, else full name, lowercased.
pub fn candidate_key(candidate: &CandidateData) -> String {
    candidate
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| {
            let name = candidate.full_name().to_lowercase();
            if name.is_empty() {
                "anonymous".to_string()
            } else {
                name
            }
        })
}

/// Allow/deny for the `count`-th request of a window.
pub fn decide(count: u64, limit: u32, window_elapsed_secs: u64) -> RateDecision {
    if count > u64::from(limit) {
        RateDecision::Denied {
            limit,
            retry_after_secs: WINDOW_SECS.saturating_sub(window_elapsed_secs).max(1),
        }
    } else {
        RateDecision::Allowed {
            remaining: limit.saturating_sub(count as u32),
        }
    }
}

/// Maps a limiter verdict onto the request. An unavailable limiter lets the request through.
pub async fn enforce(limiter: &dyn RateLimiter, key: &str) -> Result<(), AppError> {
    match limiter.check(key).await {
        Ok(RateDecision::Allowed { .. }) => Ok(()),
        Ok(RateDecision::Denied {
            limit,
            retry_after_secs,
        }) => Err(AppError::RateLimited(format!(
            "limit of {limit} per minute reached, retry after {retry_after_secs}s"
        ))),
        Err(e) => {
            warn!("{e}; allowing request");
            Ok(())
        }
    }
}

pub struct RedisRateLimiter {
    client: redis::Client,
    limit_per_minute: u32,
}

impl RedisRateLimiter {
    pub fn new(client: redis::Client, limit_per_minute: u32) -> Self {
        Self {
            client,
            limit_per_minute,
        }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateDecision, RateLimitError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| RateLimitError::Unavailable(e.to_string()))?
            .as_secs();
        let window = now / WINDOW_SECS;
        let redis_key = format!("{KEY_PREFIX}:{key}:{window}");

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RateLimitError::Unavailable(e.to_string()))?;

        let count: u64 = conn
            .incr(&redis_key, 1_u64)
            .await
            .map_err(|e: redis::RedisError| RateLimitError::Unavailable(e.to_string()))?;

        // First hit of the window owns the expiry.
        if count == 1 {
            conn.expire::<_, ()>(&redis_key, WINDOW_SECS as i64)
                .await
                .map_err(|e: redis::RedisError| RateLimitError::Unavailable(e.to_string()))?;
        }

        Ok(decide(count, self.limit_per_minute, now % WINDOW_SECS))
    }
}
