//! Reranker (C5).
//!
//! If a model backend is loaded, each candidate's score is replaced outright
//! with the model's cross-encoder score (higher is better). If no model is
//! available (or the model call errors), the reranker falls back to a
//! deterministic token-Jaccard score blended with the candidate's prior
//! fusion score: `0.7 * jaccard + 0.3 * prior_score`. Every fallback
//! occurrence increments [`Reranker::fallback_count`].

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_THRESHOLD, MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_tokenizer_with_truncation;

/// A candidate to be reranked: an opaque index the caller uses to map the
/// result back to its own data, the text compared against the query, and the
/// pre-rerank (fused) prior score.
#[derive(Debug, Clone)]
pub struct RerankCandidate {
    /// Caller-assigned index (typically the candidate's position in its slice).
    pub index: usize,
    /// Text compared against the query.
    pub text: String,
    /// Prior (pre-rerank) fusion score.
    pub prior_score: f32,
}

/// Outcome of reranking one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerankResult {
    /// The candidate's original index, unchanged.
    pub index: usize,
    /// The reranker's score (model score, or the Jaccard/prior blend).
    pub score: f32,
}

pub struct Reranker {
    device: candle_core::Device,
    config: RerankerConfig,
    model_loaded: bool,
    model: Option<BertClassifier>,
    tokenizer: Option<Tokenizer>,
    fallback_count: AtomicU64,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.model_loaded)
            .field("fallback_count", &self.fallback_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Reranker {
    /// Loads a reranker. With `config.model_path` set, loads a BERT
    /// cross-encoder; otherwise operates in stub (Jaccard-fallback-only) mode.
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        if let Some(ref model_path) = config.model_path {
            if !model_path.exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Reranker model path not found: {}", model_path.display()),
                });
            }

            let config_path = model_path.join("config.json");
            if !config_path.exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing config.json in {}", model_path.display()),
                });
            }

            let weights_path = model_path.join("model.safetensors");
            if !weights_path.exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing model.safetensors in {}", model_path.display()),
                });
            }

            info!(model_path = %model_path.display(), "Loading reranker model");

            let model = BertClassifier::load(model_path, &device).map_err(|e| {
                RerankerError::ModelLoadFailed {
                    reason: format!("Failed to load BERT model: {}", e),
                }
            })?;

            let tokenizer =
                load_tokenizer_with_truncation(model_path, MAX_SEQ_LEN).map_err(|e| {
                    RerankerError::ModelLoadFailed {
                        reason: format!("Failed to load tokenizer: {}", e),
                    }
                })?;

            info!("Reranker model loaded successfully");

            Ok(Self {
                device,
                config,
                model_loaded: true,
                model: Some(model),
                tokenizer: Some(tokenizer),
                fallback_count: AtomicU64::new(0),
            })
        } else {
            info!("No reranker model path configured, operating in Jaccard-fallback mode");
            Ok(Self::create_stub(device, config))
        }
    }

    /// Builds a reranker with no model loaded (always uses the Jaccard fallback).
    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    fn create_stub(device: candle_core::Device, config: RerankerConfig) -> Self {
        Self {
            device,
            config,
            model_loaded: false,
            model: None,
            tokenizer: None,
            fallback_count: AtomicU64::new(0),
        }
    }

    /// `true` if a cross-encoder model is loaded.
    pub fn is_model_loaded(&self) -> bool {
        self.model_loaded
    }

    /// Number of times the Jaccard fallback fired (model unavailable or errored).
    pub fn fallback_count(&self) -> u64 {
        self.fallback_count.load(Ordering::Relaxed)
    }

    /// Scores a single query/candidate pair via the model backend, if loaded.
    fn model_score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        let (model, tokenizer) = match (&self.model, &self.tokenizer) {
            (Some(m), Some(t)) => (m, t),
            _ => {
                return Err(RerankerError::NotAvailable {
                    reason: "no model loaded".to_string(),
                });
            }
        };

        let tokens = tokenizer
            .encode((query, candidate), true)
            .map_err(|e| RerankerError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let score = logits.flatten_all()?.to_vec1::<f32>()?[0];
        Ok(score)
    }

    /// Deterministic token-Jaccard similarity between `query` and `text`,
    /// tokenized as lowercased alphanumeric runs.
    pub fn token_jaccard(query: &str, text: &str) -> f32 {
        let q: HashSet<String> = tokenize_alnum(query);
        let c: HashSet<String> = tokenize_alnum(text);
        if q.is_empty() && c.is_empty() {
            return 0.0;
        }
        let intersection = q.intersection(&c).count();
        let union = q.union(&c).count();
        if union == 0 {
            0.0
        } else {
            intersection as f32 / union as f32
        }
    }

    /// Reranks `candidates` against `query`. Returns one [`RerankResult`] per
    /// input candidate, in the same order they were passed in (the caller
    /// sorts/truncates downstream, per spec §4.6 step 6-7).
    pub fn rerank(&self, query: &str, candidates: &[RerankCandidate]) -> Vec<RerankResult> {
        candidates
            .iter()
            .map(|c| {
                let score = if self.model_loaded {
                    match self.model_score(query, &c.text) {
                        Ok(score) => score,
                        Err(e) => {
                            warn!(error = %e, "reranker model call failed, falling back to Jaccard");
                            self.fallback_count.fetch_add(1, Ordering::Relaxed);
                            0.7 * Self::token_jaccard(query, &c.text) + 0.3 * c.prior_score
                        }
                    }
                } else {
                    self.fallback_count.fetch_add(1, Ordering::Relaxed);
                    0.7 * Self::token_jaccard(query, &c.text) + 0.3 * c.prior_score
                };
                RerankResult {
                    index: c.index,
                    score,
                }
            })
            .collect()
    }

    /// [`Self::rerank`] followed by a descending sort on score.
    pub fn rerank_sorted(&self, query: &str, candidates: &[RerankCandidate]) -> Vec<RerankResult> {
        let mut results = self.rerank(query, candidates);
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results
    }

    /// Configured acceptance threshold (used by callers wanting a hit/miss cut).
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    /// Returns the underlying reranker configuration.
    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }
}

fn tokenize_alnum(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod inline_tests {
    use super::*;

    #[test]
    fn jaccard_identical_text_is_one() {
        assert!((Reranker::token_jaccard("hybrid retrieval", "hybrid retrieval") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn jaccard_disjoint_text_is_zero() {
        assert_eq!(Reranker::token_jaccard("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn stub_rerank_uses_fallback_formula_and_counts() {
        let reranker = Reranker::stub().unwrap();
        let candidates = vec![RerankCandidate {
            index: 0,
            text: "hybrid retrieval fuses vector and keyword search".to_string(),
            prior_score: 0.4,
        }];
        let results = reranker.rerank("hybrid retrieval", &candidates);
        assert_eq!(results.len(), 1);
        let expected_jaccard = Reranker::token_jaccard(
            "hybrid retrieval",
            "hybrid retrieval fuses vector and keyword search",
        );
        let expected = 0.7 * expected_jaccard + 0.3 * 0.4;
        assert!((results[0].score - expected).abs() < 1e-6);
        assert_eq!(reranker.fallback_count(), 1);
    }

    #[test]
    fn rerank_sorted_orders_descending() {
        let reranker = Reranker::stub().unwrap();
        let candidates = vec![
            RerankCandidate { index: 0, text: "irrelevant text".to_string(), prior_score: 0.1 },
            RerankCandidate { index: 1, text: "hybrid retrieval query".to_string(), prior_score: 0.5 },
        ];
        let results = reranker.rerank_sorted("hybrid retrieval", &candidates);
        assert_eq!(results[0].index, 1);
    }
}
