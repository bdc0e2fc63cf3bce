//! Token-bucket refill (pure function; §6, §9 Open Question #1).
//!
//! The surrounding rate-limit middleware (request interception, IP
//! extraction, HTTP 429 responses) is out of scope (spec.md §1 names it among
//! the external collaborators); this is the one named, testable boundary
//! behavior the spec calls out explicitly: refill applies
//! `floor(min(capacity, tokens + delta_secs * refill_rate))`, which can
//! briefly under-count after sub-second bursts. Per the Open Question
//! resolution in `SPEC_FULL.md`/`DESIGN.md`, this is implemented verbatim
//! rather than "corrected" to a higher-precision variant.

use crate::storage::rate_limit_bucket::{DEFAULT_CAPACITY, DEFAULT_REFILL_RATE};

/// Computes the refilled token count for a bucket that last had `tokens`
/// tokens, `delta_secs` seconds ago, refilling at `refill_rate` tokens/sec up
/// to `capacity`.
///
/// `floor` is applied to the post-refill value (not to `delta_secs *
/// refill_rate` individually), matching the source's arithmetic verbatim.
pub fn refill(tokens: f64, delta_secs: f64, capacity: f64, refill_rate: f64) -> f64 {
    let refilled = capacity.min(tokens + delta_secs * refill_rate);
    refilled.floor()
}

/// Refills using the default capacity (60) and refill rate (1 tok/sec).
pub fn refill_default(tokens: f64, delta_secs: f64) -> f64 {
    refill(tokens, delta_secs, DEFAULT_CAPACITY, DEFAULT_REFILL_RATE)
}

/// Attempts to consume one token from a bucket holding `tokens` tokens after
/// refilling for `delta_secs`. Returns `(allowed, tokens_after)`.
pub fn try_consume(tokens: f64, delta_secs: f64, capacity: f64, refill_rate: f64) -> (bool, f64) {
    let refilled = refill(tokens, delta_secs, capacity, refill_rate);
    if refilled >= 1.0 {
        (true, refilled - 1.0)
    } else {
        (false, refilled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refill_caps_at_capacity() {
        assert_eq!(refill(55.0, 100.0, 60.0, 1.0), 60.0);
    }

    #[test]
    fn refill_floors_sub_second_bursts() {
        // 0.5s at 1 tok/sec adds 0.5 tokens; floor(10.5) = 10, under-counting
        // by design per the Open Question resolution.
        assert_eq!(refill(10.0, 0.5, 60.0, 1.0), 10.0);
    }

    #[test]
    fn refill_accumulates_across_full_seconds() {
        assert_eq!(refill(10.0, 5.0, 60.0, 1.0), 15.0);
    }

    #[test]
    fn try_consume_succeeds_with_sufficient_tokens() {
        let (allowed, remaining) = try_consume(10.0, 1.0, 60.0, 1.0);
        assert!(allowed);
        assert_eq!(remaining, 10.0);
    }

    #[test]
    fn try_consume_fails_when_bucket_empty() {
        let (allowed, remaining) = try_consume(0.0, 0.0, 60.0, 1.0);
        assert!(!allowed);
        assert_eq!(remaining, 0.0);
    }

    #[test]
    fn default_refill_matches_explicit_defaults() {
        assert_eq!(refill_default(0.0, 10.0), refill(0.0, 10.0, 60.0, 1.0));
    }
}
