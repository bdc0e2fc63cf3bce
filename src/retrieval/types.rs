//! Shared types for the hybrid retriever (C6).

use uuid::Uuid;

/// Which side of the fan-out a candidate originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Primary vector store.
    PrimaryVector,
    /// Secondary (mirrored) vector store.
    SecondaryVector,
    /// Trigram keyword side-channel.
    Keyword,
    /// Web-search client (never produced by the hybrid retriever itself —
    /// the coordinator attaches these on its own path, per §4.6 edge cases).
    Web,
}

/// A transient search result (§3 "Retrieved Candidate").
#[derive(Debug, Clone)]
pub struct RetrievedCandidate {
    /// Stable candidate identifier: the chunk id as a string, or
    /// `web:<hash-of-url>` for web-sourced candidates.
    pub id: String,
    /// Owning document id, when known (absent for some web candidates).
    pub document_id: Option<Uuid>,
    /// Chunk index within its document, when known.
    pub chunk_index: Option<i32>,
    /// Evidence text.
    pub content: String,
    /// Optional source descriptor (URL, filename, hostname, ...).
    pub source: Option<String>,
    /// Pre-rerank score, fused from the originating source's weight.
    pub prior_score: f32,
    /// Reranker score, set once the candidate has passed through C5.
    pub reranker_score: Option<f32>,
    /// Which side of the fan-out produced this candidate (the winning side,
    /// post-dedup).
    pub origin: CandidateSource,
}

impl RetrievedCandidate {
    /// `true` if this candidate's id carries the `web:` prefix.
    pub fn is_web_source(&self) -> bool {
        self.id.starts_with("web:")
    }
}
