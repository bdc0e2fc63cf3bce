//! Rate-limit bucket row model: `(ip, tokens, last_refill)` (§6).
//!
//! Capacity 60, refill 1 token/sec, per the external interface table. The
//! refill arithmetic itself lives in [`crate::ratelimit`] as a pure function
//! so it can be tested without a database.

use chrono::{DateTime, Utc};

/// Default bucket capacity (tokens).
pub const DEFAULT_CAPACITY: f64 = 60.0;
/// Default refill rate (tokens/sec).
pub const DEFAULT_REFILL_RATE: f64 = 1.0;

/// A persisted token-bucket row, keyed by client IP.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RateLimitBucket {
    /// Client IP address (bucket key).
    pub ip: String,
    /// Current token count.
    pub tokens: f64,
    /// Timestamp of the last refill.
    pub last_refill: DateTime<Utc>,
}

impl RateLimitBucket {
    /// Builds a fresh, full bucket for `ip`.
    pub fn new_full(ip: String, now: DateTime<Utc>) -> Self {
        Self {
            ip,
            tokens: DEFAULT_CAPACITY,
            last_refill: now,
        }
    }
}
