use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors surfaced by the hybrid retriever. Secondary-store failures are
/// deliberately *not* representable here — they're demoted to an
/// observability event and never propagate (§4.6 step 3).
pub enum RetrievalError {
    /// Query embedding failed.
    #[error("failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The primary vector store failed (fatal — unlike the secondary store).
    #[error("primary vector search failed: {0}")]
    PrimarySearch(VectorDbError),

    /// The trigram keyword side-channel failed (fatal, when `useKeyword` is set).
    #[error("keyword search failed: {0}")]
    KeywordSearch(VectorDbError),
}
