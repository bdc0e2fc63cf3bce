//! Hybrid Retriever (C6): parallel vector search over two stores plus a
//! keyword side-channel, fused, deduplicated, and reranked.

pub mod error;
pub mod types;

pub use error::RetrievalError;
pub use types::{CandidateSource, RetrievedCandidate};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::embedding::reranker::RerankCandidate;
use crate::embedding::{EmbeddingClient, Reranker};
use crate::keyword::KeywordAdapter;
use crate::vectordb::{PrimaryStore, SecondaryStore};

/// Fusion weights (§4.6 step 4). Need not sum to 1; both must be non-negative.
#[derive(Debug, Clone, Copy)]
pub struct FusionWeights {
    /// `W_VEC`, applied to primary/secondary vector-originated candidates.
    pub vector: f32,
    /// `W_KEY`, applied to keyword-originated candidates.
    pub keyword: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: crate::constants::DEFAULT_HYBRID_VECTOR_WEIGHT,
            keyword: crate::constants::DEFAULT_HYBRID_KEYWORD_WEIGHT,
        }
    }
}

/// Output of one retrieval call: the fused, deduplicated, reranked top-k
/// candidates plus the query embedding (exposed for the grader, §4.6).
#[derive(Debug, Clone)]
pub struct RetrievalOutput {
    /// Up to `top_k` candidates, ordered by descending reranker score.
    pub candidates: Vec<RetrievedCandidate>,
    /// The query embedding computed for this call.
    pub query_embedding: Vec<f32>,
}

/// Fans out to the primary store, optional secondary store, and optional
/// trigram keyword side-channel; fuses, dedups, and reranks the results.
pub struct HybridRetriever {
    primary: Arc<PrimaryStore>,
    secondary: Option<Arc<SecondaryStore>>,
    keyword: Option<Arc<KeywordAdapter>>,
    embedding_client: Arc<EmbeddingClient>,
    reranker: Arc<Reranker>,
    weights: FusionWeights,
    top_k: usize,
}

impl HybridRetriever {
    /// Builds a retriever. `secondary`/`keyword` are `None` when dual-store
    /// mode is disabled / the caller never uses the keyword side-channel.
    pub fn new(
        primary: Arc<PrimaryStore>,
        secondary: Option<Arc<SecondaryStore>>,
        keyword: Option<Arc<KeywordAdapter>>,
        embedding_client: Arc<EmbeddingClient>,
        reranker: Arc<Reranker>,
        weights: FusionWeights,
        top_k: usize,
    ) -> Self {
        Self {
            primary,
            secondary,
            keyword,
            embedding_client,
            reranker,
            weights,
            top_k,
        }
    }

    /// Runs the retrieval algorithm described in §4.6.
    pub async fn retrieve(
        &self,
        query: &str,
        use_keyword: bool,
    ) -> Result<RetrievalOutput, RetrievalError> {
        let query_embedding = self.embedding_client.embed_one(query).await?;
        let fan_out_k = 2 * self.top_k;

        let primary_fut = self.primary.vector_search(&query_embedding, fan_out_k);
        let secondary_fut = async {
            match &self.secondary {
                Some(store) => store.search(&query_embedding, fan_out_k).await,
                None => Ok(Vec::new()),
            }
        };
        let keyword_fut = async {
            if use_keyword {
                if let Some(keyword) = &self.keyword {
                    keyword.trigram_title_search(query, fan_out_k).await
                } else {
                    Ok(Vec::new())
                }
            } else {
                Ok(Vec::new())
            }
        };

        let (primary_result, secondary_result, keyword_result) =
            tokio::join!(primary_fut, secondary_fut, keyword_fut);

        let primary_hits = primary_result.map_err(RetrievalError::PrimarySearch)?;

        let secondary_hits = match secondary_result {
            Ok(hits) => hits,
            Err(e) => {
                warn!(
                    event = "retrieval.qdrant_fallback",
                    error = %e,
                    "secondary vector store failed; proceeding with remaining sources"
                );
                Vec::new()
            }
        };

        let title_matches = keyword_result.map_err(RetrievalError::KeywordSearch)?;

        let mut fused: HashMap<String, RetrievedCandidate> = HashMap::new();

        for hit in primary_hits {
            let id = hit.chunk_id.to_string();
            let prior = self.weights.vector * hit.vector_sim;
            upsert_max(
                &mut fused,
                id,
                hit.document_id,
                hit.chunk_index,
                hit.content,
                hit.source,
                prior,
                CandidateSource::PrimaryVector,
            );
        }

        for hit in secondary_hits {
            let id = hit.chunk_id.to_string();
            let prior = self.weights.vector * hit.vector_sim;
            upsert_max(
                &mut fused,
                id,
                hit.document_id,
                hit.chunk_index,
                hit.content,
                hit.source,
                prior,
                CandidateSource::SecondaryVector,
            );
        }

        if use_keyword && !title_matches.is_empty() {
            if let Some(keyword) = &self.keyword {
                for doc in &title_matches {
                    let prior = self.weights.keyword * doc.trigram_sim;
                    match keyword.chunks_for_document(doc.document_id).await {
                        Ok(chunks) => {
                            for chunk in chunks {
                                let id = chunk.chunk_id.to_string();
                                upsert_max(
                                    &mut fused,
                                    id,
                                    Some(chunk.document_id),
                                    Some(chunk.chunk_index),
                                    chunk.content,
                                    chunk.source,
                                    prior,
                                    CandidateSource::Keyword,
                                );
                            }
                        }
                        Err(e) => {
                            warn!(document_id = %doc.document_id, error = %e, "keyword follow-on chunk lookup failed");
                        }
                    }
                }
            }
        }

        debug!(fused = fused.len(), "deduplicated candidate set before rerank");

        if fused.is_empty() {
            return Ok(RetrievalOutput {
                candidates: Vec::new(),
                query_embedding,
            });
        }

        let mut ordered: Vec<RetrievedCandidate> = fused.into_values().collect();
        let rerank_inputs: Vec<RerankCandidate> = ordered
            .iter()
            .enumerate()
            .map(|(index, c)| RerankCandidate {
                index,
                text: c.content.clone(),
                prior_score: c.prior_score,
            })
            .collect();

        let rerank_results = self.reranker.rerank(query, &rerank_inputs);
        for result in rerank_results {
            ordered[result.index].reranker_score = Some(result.score);
        }

        ordered.sort_by(|a, b| {
            let sa = a.reranker_score.unwrap_or(a.prior_score);
            let sb = b.reranker_score.unwrap_or(b.prior_score);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
        });
        ordered.truncate(self.top_k);

        info!(returned = ordered.len(), "hybrid retrieval complete");

        Ok(RetrievalOutput {
            candidates: ordered,
            query_embedding,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn upsert_max(
    fused: &mut HashMap<String, RetrievedCandidate>,
    id: String,
    document_id: Option<uuid::Uuid>,
    chunk_index: Option<i32>,
    content: String,
    source: Option<String>,
    prior_score: f32,
    origin: CandidateSource,
) {
    fused
        .entry(id.clone())
        .and_modify(|existing| {
            if prior_score > existing.prior_score {
                existing.prior_score = prior_score;
                existing.origin = origin;
                existing.source = source.clone();
                existing.content = content.clone();
            }
        })
        .or_insert_with(|| RetrievedCandidate {
            id,
            document_id,
            chunk_index,
            content,
            source,
            prior_score,
            reranker_score: None,
            origin,
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_max_keeps_higher_prior_score() {
        let mut fused = HashMap::new();
        upsert_max(
            &mut fused,
            "x".to_string(),
            None,
            None,
            "first".to_string(),
            None,
            0.6,
            CandidateSource::SecondaryVector,
        );
        upsert_max(
            &mut fused,
            "x".to_string(),
            None,
            None,
            "second".to_string(),
            None,
            0.8,
            CandidateSource::PrimaryVector,
        );
        let candidate = &fused["x"];
        assert_eq!(candidate.prior_score, 0.8);
        assert_eq!(candidate.content, "second");
        assert_eq!(candidate.origin, CandidateSource::PrimaryVector);
    }

    #[test]
    fn upsert_max_ignores_lower_subsequent_score() {
        let mut fused = HashMap::new();
        upsert_max(&mut fused, "x".to_string(), None, None, "first".to_string(), None, 0.8, CandidateSource::PrimaryVector);
        upsert_max(&mut fused, "x".to_string(), None, None, "second".to_string(), None, 0.2, CandidateSource::SecondaryVector);
        assert_eq!(fused["x"].prior_score, 0.8);
        assert_eq!(fused["x"].content, "first");
    }
}
