//! Rate limiting
//!
//! The request handler only sees the [`RateLimiter`] trait; the in-process
//! [`KeyedRateLimiter`] keeps one token bucket per client key.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::RateLimitConfig;

/// Rate limiter failure. Callers admit the request when this happens.
#[derive(Error, Debug)]
#[error("Rate limiter error: {0}")]
pub struct LimiterError(pub String);

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOutcome {
    pub success: bool,
}

/// Admission control keyed by client.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn limit(&self, key: &str) -> Result<LimitOutcome, LimiterError>;
}

/// Token bucket rate limiter
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum tokens (burst size)
    max_tokens: f64,
    /// Current tokens
    tokens: f64,
    /// Tokens added per second
    refill_rate: f64,
    /// Last refill time
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(max_tokens: u32, refill_per_minute: u32) -> Self {
        Self {
            max_tokens: max_tokens as f64,
            tokens: max_tokens as f64,
            refill_rate: refill_per_minute as f64 / 60.0,
            last_refill: Instant::now(),
        }
    }

    /// Try to consume a token
    pub fn try_consume(&mut self) -> bool {
        self.refill(Instant::now());

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Refill tokens based on elapsed time
    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }
}

/// Per-key token buckets
#[derive(Debug)]
pub struct KeyedRateLimiter {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimitConfig,
}

impl KeyedRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Check if a request for `key` is allowed
    pub fn is_allowed(&self, key: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        if let Some(mut bucket) = self.buckets.get_mut(key) {
            return bucket.try_consume();
        }

        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| {
                TokenBucket::new(self.config.burst_size, self.config.requests_per_minute)
            })
            .try_consume()
    }

    /// Drop buckets idle for longer than `max_age`. Returns how many were removed.
    pub fn cleanup(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_refill) < max_age);
        before.saturating_sub(self.buckets.len())
    }

    /// Number of tracked clients
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

#[async_trait]
impl RateLimiter for KeyedRateLimiter {
    async fn limit(&self, key: &str) -> Result<LimitOutcome, LimiterError> {
        Ok(LimitOutcome {
            success: self.is_allowed(key),
        })
    }
}
