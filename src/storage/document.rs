//! Document row model: `(id, title, source, created_at)` (§6).

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An identified logical unit ingested into the system. A document id is
/// unique and never reused; deleting a document cascades to all its chunks.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Document {
    /// Stable identifier.
    pub id: Uuid,
    /// Optional human-readable title.
    pub title: Option<String>,
    /// Optional source descriptor (e.g. a URL or filename).
    pub source: Option<String>,
    /// Ingestion timestamp.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Builds a new document row with a freshly-generated id and `created_at = now`.
    pub fn new(title: Option<String>, source: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            source,
            created_at: now,
        }
    }
}
