//! Chunk row model: `(id, document_id, chunk_index, content, embedding, grade?, created_at)` (§6).

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An ordered fragment of a document's text, embedded once at ingestion.
///
/// Invariants: `(document_id, chunk_index)` is unique; `embedding.len()`
/// equals the configured dimension D; `chunk_index` is contiguous starting
/// at 0 for a given document.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Stable identifier.
    pub id: Uuid,
    /// Owning document identifier.
    pub document_id: Uuid,
    /// Zero-based chunk index within the document.
    pub chunk_index: i32,
    /// Chunk text content.
    pub content: String,
    /// Fixed-dimension embedding.
    pub embedding: Vec<f32>,
    /// Optional grade label assigned by a prior grading pass.
    pub grade: Option<String>,
    /// Ingestion timestamp.
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Builds a new chunk row with a freshly-generated id and `created_at = now`.
    pub fn new(
        document_id: Uuid,
        chunk_index: i32,
        content: String,
        embedding: Vec<f32>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            content,
            embedding,
            grade: None,
            created_at: now,
        }
    }
}
