//! Embedding client (C2): text → fixed-dimension unit vector.
//!
//! Two backends, selected at construction the way [`super::sinter::SinterEmbedder`]
//! picks between a loaded model and its `testing_stub` mode:
//!
//! - [`EmbeddingBackend::Mock`]: derives a per-text seed from a BLAKE3 hash of the
//!   text ([`crate::hashing::embedding_seed`]), drives a reproducible xorshift64
//!   stream from that seed, and L2-normalizes the result. Deterministic across
//!   runs and processes.
//! - [`EmbeddingBackend::Provider`]: calls an external embedding endpoint over
//!   `reqwest`.
//!
//! A returned vector whose length disagrees with the configured dimension is a
//! fatal [`EmbeddingError::InvalidConfig`] — every ingestion and retrieval path
//! agrees on width through this one check.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::EmbeddingError;
use crate::hashing::embedding_seed;

/// A unit-normalized (mock mode) or provider-defined embedding vector.
pub type Embedding = Vec<f32>;

/// Embedding client configuration.
#[derive(Debug, Clone)]
pub struct EmbeddingClientConfig {
    /// Required output dimension; every returned vector must match this exactly.
    pub dimension: usize,
    /// Provider endpoint; `None` keeps the client in deterministic mock mode.
    pub provider_endpoint: Option<String>,
    /// Provider API key, sent as a bearer token.
    pub provider_api_key: Option<String>,
    /// Provider model identifier.
    pub provider_model: Option<String>,
}

impl EmbeddingClientConfig {
    /// Deterministic mock-mode configuration at the given dimension.
    pub fn mock(dimension: usize) -> Self {
        Self {
            dimension,
            provider_endpoint: None,
            provider_api_key: None,
            provider_model: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProviderRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    data: Vec<ProviderEmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct ProviderEmbeddingEntry {
    embedding: Vec<f32>,
}

/// Text → embedding client. One instance per process; cheap to clone (the HTTP
/// client is connection-pooled internally).
#[derive(Clone)]
pub struct EmbeddingClient {
    config: EmbeddingClientConfig,
    http: reqwest::Client,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("dimension", &self.config.dimension)
            .field("mode", &if self.is_mock() { "mock" } else { "provider" })
            .finish()
    }
}

impl EmbeddingClient {
    /// Builds a client from config. Provider mode requires both an endpoint
    /// and a model name; missing either falls back to mock mode with a warning.
    pub fn new(config: EmbeddingClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// `true` when operating in deterministic mock mode.
    pub fn is_mock(&self) -> bool {
        self.config.provider_endpoint.is_none()
    }

    /// Configured output dimension.
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Embeds a batch of texts, one vector per input, in the same order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = if let Some(endpoint) = self.config.provider_endpoint.clone() {
            self.embed_via_provider(&endpoint, texts).await?
        } else {
            texts.iter().map(|t| self.embed_mock(t)).collect()
        };

        for v in &vectors {
            if v.len() != self.config.dimension {
                return Err(EmbeddingError::InvalidConfig {
                    reason: format!(
                        "embedding dimension mismatch: expected {}, got {}",
                        self.config.dimension,
                        v.len()
                    ),
                });
            }
        }

        Ok(vectors)
    }

    /// Embeds a single text. Convenience wrapper over [`Self::embed`].
    pub async fn embed_one(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vectors = self.embed(std::slice::from_ref(&text.to_string())).await?;
        Ok(vectors.pop().expect("embed returns one vector per input"))
    }

    /// Deterministic xorshift64-derived unit vector for `text`.
    fn embed_mock(&self, text: &str) -> Embedding {
        let mut state = embedding_seed(text);
        if state == 0 {
            state = 0x9E3779B97F4A7C15;
        }

        let mut vector = Vec::with_capacity(self.config.dimension);
        for _ in 0..self.config.dimension {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            // Map the 64-bit stream into [-1, 1).
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            vector.push((unit * 2.0 - 1.0) as f32);
        }

        l2_normalize(&mut vector);
        vector
    }

    async fn embed_via_provider(
        &self,
        endpoint: &str,
        texts: &[String],
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        let model = self.config.provider_model.as_deref().unwrap_or("default");
        debug!(endpoint, model, batch = texts.len(), "calling embedding provider");

        let mut request = self.http.post(endpoint).json(&ProviderRequest {
            model,
            input: texts,
        });

        if let Some(key) = &self.config.provider_api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("embedding provider request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "embedding provider returned an error status");
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("embedding provider returned {status}: {body}"),
            });
        }

        let parsed: ProviderResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("failed to parse embedding provider response: {e}"),
                })?;

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine similarity between two equal-length vectors. Returns `0.0` if either
/// is zero-length or all-zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embed_is_deterministic_and_unit_length() {
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(16));
        let a = client.embed_one("hybrid retrieval").await.unwrap();
        let b = client.embed_one("hybrid retrieval").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
    }

    #[tokio::test]
    async fn mock_embed_differs_across_texts() {
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let a = client.embed_one("alpha").await.unwrap();
        let b = client.embed_one("beta").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn embed_preserves_order() {
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(4));
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let vectors = client.embed(&texts).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], client.embed_one("one").await.unwrap());
        assert_eq!(vectors[1], client.embed_one("two").await.unwrap());
    }

    #[test]
    fn cosine_similarity_identical_vectors_is_one() {
        let v = vec![0.5, 0.5, 0.5, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_similarity_orthogonal_is_zero() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
    }
}
