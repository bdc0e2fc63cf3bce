//! Grader: scores retrieved chunks against a query (§4.7).

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::constants::{DEFAULT_GRADE_HIGH_THRESHOLD, DEFAULT_GRADE_MEDIUM_THRESHOLD};
use crate::embedding::{EmbeddingClient, cosine_similarity};

use super::error::ScoringError;
use super::types::{GradeInput, GradeLabel, GradeMethod, GradeOutcome};

/// Grades chunks against a query using keyword, semantic, or hybrid scoring,
/// selected per §4.7's rule and this grader's configured thresholds.
#[derive(Debug, Clone)]
pub struct Grader {
    high_threshold: f32,
    medium_threshold: f32,
    use_semantic_grading: bool,
}

impl Default for Grader {
    fn default() -> Self {
        Self {
            high_threshold: DEFAULT_GRADE_HIGH_THRESHOLD,
            medium_threshold: DEFAULT_GRADE_MEDIUM_THRESHOLD,
            use_semantic_grading: false,
        }
    }
}

impl Grader {
    /// Builds a grader with explicit thresholds and the semantic-grading flag.
    pub fn new(high_threshold: f32, medium_threshold: f32, use_semantic_grading: bool) -> Self {
        Self {
            high_threshold,
            medium_threshold,
            use_semantic_grading,
        }
    }

    /// Grades `chunks` against `query`.
    ///
    /// Selection (§4.7): hybrid if semantic grading is enabled and a query
    /// embedding was supplied; semantic if only the embedding was supplied;
    /// keyword otherwise. A `None` embedding always falls back to keyword
    /// grading silently, even with semantic grading enabled (Open Question
    /// #2 in `SPEC_FULL.md`).
    pub async fn grade(
        &self,
        embedding_client: &EmbeddingClient,
        query: &str,
        chunks: &[GradeInput],
        query_embedding: Option<&[f32]>,
    ) -> Result<GradeOutcome, ScoringError> {
        let method = match (self.use_semantic_grading, query_embedding) {
            (true, Some(_)) => GradeMethod::Hybrid,
            (false, Some(_)) => GradeMethod::Semantic,
            (_, None) => GradeMethod::Keyword,
        };

        debug!(?method, chunks = chunks.len(), "grading retrieved chunks");

        let keyword_scores = self.keyword_scores(query, chunks);

        let scores_by_chunk: HashMap<String, f32> = match method {
            GradeMethod::Keyword => keyword_scores,
            GradeMethod::Semantic => {
                let query_embedding = query_embedding.expect("Semantic method implies Some");
                self.semantic_scores(embedding_client, query_embedding, chunks).await?
            }
            GradeMethod::Hybrid => {
                let query_embedding = query_embedding.expect("Hybrid method implies Some");
                let semantic = self.semantic_scores(embedding_client, query_embedding, chunks).await?;
                chunks
                    .iter()
                    .map(|c| {
                        let s = semantic.get(&c.id).copied().unwrap_or(0.0);
                        let k = keyword_scores.get(&c.id).copied().unwrap_or(0.0);
                        (c.id.clone(), 0.7 * s + 0.3 * k)
                    })
                    .collect()
            }
        };

        let grades = scores_by_chunk
            .iter()
            .map(|(id, score)| {
                let label = if *score > self.high_threshold {
                    GradeLabel::High
                } else if *score > self.medium_threshold {
                    GradeLabel::Medium
                } else {
                    GradeLabel::Low
                };
                (id.clone(), label)
            })
            .collect();

        Ok(GradeOutcome {
            grades,
            scores_by_chunk,
            method,
        })
    }

    fn keyword_scores(&self, query: &str, chunks: &[GradeInput]) -> HashMap<String, f32> {
        let query_tokens = tokenize(query);
        let denom = query_tokens.len().max(1) as f32;
        chunks
            .iter()
            .map(|c| {
                let chunk_tokens = tokenize(&c.content);
                let overlap = query_tokens.intersection(&chunk_tokens).count();
                (c.id.clone(), overlap as f32 / denom)
            })
            .collect()
    }

    async fn semantic_scores(
        &self,
        embedding_client: &EmbeddingClient,
        query_embedding: &[f32],
        chunks: &[GradeInput],
    ) -> Result<HashMap<String, f32>, ScoringError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedding_client.embed(&texts).await?;

        Ok(chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(c, emb)| (c.id.clone(), cosine_similarity(query_embedding, emb)))
            .collect())
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingClientConfig;

    fn input(id: &str, content: &str) -> GradeInput {
        GradeInput {
            id: id.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn keyword_grading_ratio_is_over_query_size_not_union() {
        let grader = Grader::default();
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let chunks = vec![input("a", "hybrid retrieval fuses vector and keyword search engines")];
        let outcome = grader
            .grade(&client, "hybrid retrieval query", &chunks, None)
            .await
            .unwrap();
        // query tokens: hybrid, retrieval, query (3); overlap: hybrid, retrieval (2)
        let score = outcome.scores_by_chunk["a"];
        assert!((score - (2.0 / 3.0)).abs() < 1e-6);
        assert_eq!(outcome.method, GradeMethod::Keyword);
    }

    #[tokio::test]
    async fn missing_embedding_falls_back_to_keyword_even_when_semantic_enabled() {
        let grader = Grader::new(0.5, 0.2, true);
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let chunks = vec![input("a", "hybrid retrieval")];
        let outcome = grader.grade(&client, "hybrid retrieval", &chunks, None).await.unwrap();
        assert_eq!(outcome.method, GradeMethod::Keyword);
    }

    #[tokio::test]
    async fn semantic_grading_used_when_embedding_present_and_flag_off() {
        let grader = Grader::new(0.5, 0.2, false);
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let query_embedding = client.embed_one("hybrid retrieval").await.unwrap();
        let chunks = vec![input("a", "hybrid retrieval")];
        let outcome = grader
            .grade(&client, "hybrid retrieval", &chunks, Some(&query_embedding))
            .await
            .unwrap();
        assert_eq!(outcome.method, GradeMethod::Semantic);
    }

    #[tokio::test]
    async fn hybrid_grading_used_when_both_present() {
        let grader = Grader::new(0.5, 0.2, true);
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let query_embedding = client.embed_one("hybrid retrieval").await.unwrap();
        let chunks = vec![input("a", "hybrid retrieval")];
        let outcome = grader
            .grade(&client, "hybrid retrieval", &chunks, Some(&query_embedding))
            .await
            .unwrap();
        assert_eq!(outcome.method, GradeMethod::Hybrid);
    }

    #[tokio::test]
    async fn labels_respect_thresholds() {
        let grader = Grader::new(0.5, 0.2, false);
        let client = EmbeddingClient::new(EmbeddingClientConfig::mock(8));
        let chunks = vec![
            input("high", "alpha beta gamma delta"),
            input("low", "completely unrelated text"),
        ];
        let outcome = grader.grade(&client, "alpha beta gamma delta", &chunks, None).await.unwrap();
        assert_eq!(outcome.grades[&"high".to_string()], GradeLabel::High);
        assert_eq!(outcome.grades[&"low".to_string()], GradeLabel::Low);
    }
}
