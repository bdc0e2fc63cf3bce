use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned by the grader and verifier.
pub enum ScoringError {
    /// A chunk-embedding call failed during semantic grading.
    #[error("embedding error while grading: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Caller passed malformed input (e.g. empty query with semantic grading forced).
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was invalid.
        reason: String,
    },
}
