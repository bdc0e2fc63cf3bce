//! Tokenizer loading helpers shared by the reranker's model backend.

use std::path::Path;
use tokenizers::Tokenizer;

use super::error::EmbeddingError;

/// Loads a tokenizer from `<dir>/tokenizer.json`.
pub fn load_tokenizer<P: AsRef<Path>>(dir: P) -> Result<Tokenizer, EmbeddingError> {
    let path = dir.as_ref().join("tokenizer.json");
    Tokenizer::from_file(&path).map_err(|e| EmbeddingError::ModelLoadFailed {
        reason: format!("failed to load tokenizer at {}: {}", path.display(), e),
    })
}

/// Loads a tokenizer and configures fixed-length truncation at `max_seq_len`.
pub fn load_tokenizer_with_truncation<P: AsRef<Path>>(
    dir: P,
    max_seq_len: usize,
) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer = load_tokenizer(dir)?;
    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: max_seq_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to configure truncation: {e}"),
        })?;
    Ok(tokenizer)
}
