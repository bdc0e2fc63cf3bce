//! Embedding + model utilities.
//!
//! - [`embedder`] provides the query/chunk embedding client (C2).
//! - [`reranker`] provides the candidate reranker (C5) used by
//!   [`crate::retrieval`].

/// BERT classifier wrapper used by the reranker's model backend.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Embedding client: deterministic mock mode + provider mode.
pub mod embedder;
mod error;
/// Reranker (C5): model-based scoring with a deterministic Jaccard fallback.
pub mod reranker;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use embedder::{Embedding, EmbeddingClient, EmbeddingClientConfig, cosine_similarity};
pub use error::EmbeddingError;
pub use reranker::{DEFAULT_THRESHOLD, Reranker, RerankerConfig, RerankerError};
