//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. byte sizes) from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is a runtime invariant shared by [`crate::embedding`],
//! [`crate::vectordb`] and [`crate::ingestion`]. Use [`DimConfig`] to carry it through
//! initialization and [`validate_embedding_dim`] at module boundaries to catch mismatches
//! early rather than deep inside a search or insert call.

/// Default embedding vector width when `EMBEDDING_DIMENSIONS` is not configured.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Default hybrid fusion weight for vector-originated candidates (`W_VEC`).
pub const DEFAULT_HYBRID_VECTOR_WEIGHT: f32 = 0.7;
/// Default hybrid fusion weight for keyword-originated candidates (`W_KEY`).
pub const DEFAULT_HYBRID_KEYWORD_WEIGHT: f32 = 0.3;

/// Default number of candidates the hybrid retriever returns.
pub const DEFAULT_RAG_TOP_K: usize = 8;

/// Default chunking window size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default chunking overlap, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Default cap on coordinator verification loops (total passes = this + 1).
pub const DEFAULT_MAX_VERIFICATION_LOOPS: u32 = 2;

/// Default grader "high" threshold.
pub const DEFAULT_GRADE_HIGH_THRESHOLD: f32 = 0.5;
/// Default grader "medium" threshold.
pub const DEFAULT_GRADE_MEDIUM_THRESHOLD: f32 = 0.2;

/// Default verifier acceptance threshold.
pub const DEFAULT_VERIFICATION_THRESHOLD: f32 = 0.5;
/// Default minimum length (in characters) for a token to count toward verification,
/// unless it appears in the technical-abbreviation whitelist.
pub const DEFAULT_MIN_TECHNICAL_TERM_LENGTH: usize = 3;

/// Default concurrent web-search operations permitted process-wide.
pub const DEFAULT_WEB_SEARCH_CONCURRENT_REQUESTS: usize = 3;
/// Default base delay (ms) for the per-query web-search failure throttle.
pub const DEFAULT_WEB_SEARCH_FAILURE_THROTTLE_MS: u64 = 5_000;
/// Default cap on `allowedDomains` passed to the web-search provider.
pub const DEFAULT_MAX_ALLOWED_DOMAINS: usize = 20;
/// Default web-search result count when the caller doesn't specify one.
pub const DEFAULT_WEB_MAX_RESULTS: usize = 5;

/// Default smart-truncate target length for composed answers.
pub const DEFAULT_COMPOSE_TRUNCATE_LEN: usize = 500;
/// Token budget for a single streamed `tokens` event.
pub const DEFAULT_TOKEN_CHUNK_LEN: usize = 60;

/// `response` cache: time-to-live.
pub const RESPONSE_CACHE_TTL_SECS: u64 = 5 * 60;
/// `response` cache: max entries.
pub const RESPONSE_CACHE_CAPACITY: u64 = 200;
/// `retrieval` cache: time-to-live.
pub const RETRIEVAL_CACHE_TTL_SECS: u64 = 2 * 60;
/// `retrieval` cache: max entries.
pub const RETRIEVAL_CACHE_CAPACITY: u64 = 200;
/// `webSearch` cache: time-to-live.
pub const WEB_SEARCH_CACHE_TTL_SECS: u64 = 10 * 60;
/// `webSearch` cache: max entries.
pub const WEB_SEARCH_CACHE_CAPACITY: u64 = 100;

/// Runtime dimension configuration for modules that need to agree on vector width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Validates that this configuration is internally consistent.
    ///
    /// Returns an error if `embedding_dim` is zero.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Returns the number of bytes needed for an F32 representation of one vector.
    pub fn f32_bytes(&self) -> usize {
        self.embedding_dim * 4
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// Use this at module boundaries (ingestion, vector search) to catch dimension
/// mismatches early rather than encountering a silent misread downstream.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_config_default_matches_constant() {
        let config = DimConfig::default();
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn dim_config_validate_zero() {
        let config = DimConfig::new(0);
        assert_eq!(config.validate(), Err(DimValidationError::ZeroDimension));
    }

    #[test]
    fn dim_config_validate_success() {
        assert!(DimConfig::new(1536).validate().is_ok());
    }

    #[test]
    fn validate_embedding_dim_match() {
        assert!(validate_embedding_dim(1536, 1536).is_ok());
    }

    #[test]
    fn validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(768, 1536),
            Err(DimValidationError::DimensionMismatch {
                expected: 1536,
                actual: 768
            })
        );
    }
}
