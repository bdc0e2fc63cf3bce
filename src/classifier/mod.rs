//! Classifier & Rewriter (C8): routes a query to a mode/complexity/target
//! decision, and optionally expands short queries before retrieval.

pub mod heuristic;
pub mod llm;
pub mod rewriter;
pub mod types;

pub use rewriter::{rewrite, rewrite_for_quality, RewriteOutcome};
pub use types::{ClassifierDecision, ClassifierOptions, Complexity, Mode, Target};

use genai::Client;

/// Ties the heuristic classifier, optional LLM classifier, and rewriter
/// together. Construction decides once whether the LLM path is active;
/// every call after that is infallible from the caller's point of view.
pub struct Classifier {
    llm_client: Option<Client>,
    llm_model: String,
    enable_rewriting: bool,
}

impl Classifier {
    /// Builds a classifier that always uses the heuristic path.
    pub fn heuristic_only(enable_rewriting: bool) -> Self {
        Self {
            llm_client: None,
            llm_model: String::new(),
            enable_rewriting,
        }
    }

    /// Builds a classifier that prefers the LLM path, falling back to the
    /// heuristic classifier on any error (§4.8).
    pub fn with_llm(client: Client, model: impl Into<String>, enable_rewriting: bool) -> Self {
        Self {
            llm_client: Some(client),
            llm_model: model.into(),
            enable_rewriting,
        }
    }

    /// Classifies `query` under `opts`, using the LLM path when configured.
    pub async fn classify(&self, query: &str, opts: ClassifierOptions) -> ClassifierDecision {
        match &self.llm_client {
            Some(client) => llm::classify(client, &self.llm_model, query, opts).await,
            None => heuristic::classify(query, opts),
        }
    }

    /// Applies the short-query rewriter when enabled. Returns `None` when
    /// rewriting is disabled or the query doesn't qualify.
    pub fn maybe_rewrite(&self, query: &str) -> Option<RewriteOutcome> {
        if !self.enable_rewriting {
            return None;
        }
        rewrite(query)
    }
}
