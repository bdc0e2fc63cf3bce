use thiserror::Error;
use uuid::Uuid;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("embedding failed during ingestion: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("primary store write failed: {0}")]
    Primary(VectorDbError),

    /// The secondary insert for `chunk_index` failed after exhausting
    /// retries; the compensating rollback described in §4.10 step 3 has
    /// already run by the time this is returned.
    #[error("secondary store write failed for document {document_id} chunk {chunk_index}: {source}")]
    SecondaryWriteFailed {
        document_id: Uuid,
        chunk_index: i32,
        #[source]
        source: VectorDbError,
    },
}
