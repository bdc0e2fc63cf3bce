use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
/// Errors returned by the primary and secondary vector-store adapters.
pub enum VectorDbError {
    /// Could not connect to (or query) the primary Postgres store.
    #[error("primary store error: {message}")]
    PrimaryStore {
        /// Error message.
        message: String,
    },

    /// Could not connect to (or query) the secondary Qdrant store.
    #[error("secondary store error: {message}")]
    SecondaryStore {
        /// Error message.
        message: String,
    },

    /// A vector did not match the configured embedding dimension.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Referenced document does not exist.
    #[error("document not found: {id}")]
    DocumentNotFound {
        /// The missing document id.
        id: Uuid,
    },

    /// Referenced chunk does not exist.
    #[error("chunk not found: {id}")]
    ChunkNotFound {
        /// The missing chunk id.
        id: Uuid,
    },
}

impl From<sqlx::Error> for VectorDbError {
    fn from(err: sqlx::Error) -> Self {
        VectorDbError::PrimaryStore {
            message: err.to_string(),
        }
    }
}
