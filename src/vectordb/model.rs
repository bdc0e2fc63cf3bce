//! Shared result shapes for the primary and secondary vector-store adapters
//! (§4.3): both report the identical tuple shape so the hybrid retriever can
//! treat them uniformly.

use uuid::Uuid;

/// One hit from either `vectorSearch` call. `vector_sim` is always a
/// similarity in `[0, 1]` (primary converts `1 - cosine_distance`; secondary
/// reports its native similarity directly).
#[derive(Debug, Clone)]
pub struct VectorSearchHit {
    /// Chunk identifier.
    pub chunk_id: Uuid,
    /// Owning document identifier.
    pub document_id: Uuid,
    /// Zero-based chunk index within the document.
    pub chunk_index: i32,
    /// Chunk text content.
    pub content: String,
    /// Optional source descriptor, inherited from the owning document.
    pub source: Option<String>,
    /// Cosine similarity in `[0, 1]`.
    pub vector_sim: f32,
}
