//! Empty-result web-search throttle (§4.12 step c, §5 "Shared mutable
//! state"): distinct from [`crate::websearch::WebSearchClient`]'s own
//! provider-failure backoff, which guards against a flaky backend. This one
//! tracks, per working query, how many consecutive web-search attempts
//! returned zero results, and skips the call entirely while the query is
//! still under backoff — a cheap way to stop re-asking a dead-end question
//! every verification loop pass.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Cap on the exponential backoff applied to a query after repeated
/// empty-result attempts.
const MAX_DELAY_MS: u64 = 60_000;

struct Entry {
    consecutive_empty: u32,
    retry_after: Instant,
}

/// Process-wide map from query key to `{count, lastAttempt}`, guarded by a
/// single mutex since the coordinator only touches it a few times per pass.
pub struct EmptyResultThrottle {
    base_delay: Duration,
    state: Mutex<HashMap<String, Entry>>,
}

impl EmptyResultThrottle {
    /// Builds a throttle with the given base backoff delay.
    pub fn new(base_delay_ms: u64) -> Self {
        Self {
            base_delay: Duration::from_millis(base_delay_ms),
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `query` is currently under backoff and should be skipped.
    pub fn is_throttled(&self, query: &str) -> bool {
        let state = self.state.lock();
        state.get(query).is_some_and(|e| Instant::now() < e.retry_after)
    }

    /// Records an empty-result attempt, incrementing and extending the
    /// backoff window.
    pub fn record_empty(&self, query: &str) {
        let mut state = self.state.lock();
        let entry = state.entry(query.to_string()).or_insert(Entry {
            consecutive_empty: 0,
            retry_after: Instant::now(),
        });
        entry.consecutive_empty += 1;
        let delay_ms = self
            .base_delay
            .as_millis()
            .saturating_mul(1u128 << entry.consecutive_empty.min(10))
            .min(MAX_DELAY_MS as u128) as u64;
        entry.retry_after = Instant::now() + Duration::from_millis(delay_ms);
    }

    /// Clears `query`'s record after a non-empty result.
    pub fn record_non_empty(&self, query: &str) {
        self.state.lock().remove(query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_query_is_not_throttled() {
        let throttle = EmptyResultThrottle::new(1000);
        assert!(!throttle.is_throttled("q"));
    }

    #[test]
    fn empty_result_throttles_subsequent_attempts() {
        let throttle = EmptyResultThrottle::new(60_000);
        throttle.record_empty("q");
        assert!(throttle.is_throttled("q"));
    }

    #[test]
    fn non_empty_result_clears_throttle() {
        let throttle = EmptyResultThrottle::new(60_000);
        throttle.record_empty("q");
        throttle.record_non_empty("q");
        assert!(!throttle.is_throttled("q"));
    }

    #[test]
    fn distinct_queries_are_tracked_independently() {
        let throttle = EmptyResultThrottle::new(60_000);
        throttle.record_empty("a");
        assert!(throttle.is_throttled("a"));
        assert!(!throttle.is_throttled("b"));
    }
}
