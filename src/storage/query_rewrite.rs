//! Query rewrite audit record: `(id, original, rewritten, created_at)` (§6).
//!
//! Immutable once written; exists purely for audit and analytics, never read
//! back by the coordinator.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One persisted rewrite event.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct QueryRewriteRecord {
    /// Stable identifier.
    pub id: Uuid,
    /// The query text as the caller submitted it.
    pub original: String,
    /// The rewritten query text.
    pub rewritten: String,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

impl QueryRewriteRecord {
    /// Builds a new record with a freshly-generated id and `created_at = now`.
    pub fn new(original: String, rewritten: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original,
            rewritten,
            created_at: now,
        }
    }
}
