//! Shared types for the web-search client (C9).

use serde::{Deserialize, Serialize};

/// One search hit returned by a provider, before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Provider-native relevance, when it reports one.
    pub relevance: Option<f32>,
}

/// A scored hit, ready to feed into the hybrid retriever as a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchChunk {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f32,
}

/// Metadata describing how a search was served.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebSearchMetadata {
    pub query: String,
    pub result_count: usize,
    pub from_cache: bool,
}

/// The full result of [`super::client::WebSearchClient::search`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResponse {
    pub chunks: Vec<WebSearchChunk>,
    pub metadata: WebSearchMetadata,
}

/// Streaming progress events the coordinator translates into `agent_log` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum WebSearchProgress {
    InProgress,
    Searching,
    Completed { result_count: usize },
}

/// Builds the normalized composite cache key `websearch:<query>:<domains>:<max>`.
pub fn cache_key(query: &str, allowed_domains: &[String], max_results: usize) -> String {
    let normalized_query = crate::cache::normalize(query);
    let domains = if allowed_domains.is_empty() {
        "*".to_string()
    } else {
        let mut sorted = allowed_domains.to_vec();
        sorted.sort();
        sorted.join(",")
    };
    format!("websearch:{normalized_query}:{domains}:{max_results}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_normalizes_query_and_sorts_domains() {
        let a = cache_key("  Hello   World  ", &["b.com".into(), "a.com".into()], 5);
        let b = cache_key("hello world", &["a.com".into(), "b.com".into()], 5);
        assert_eq!(a, b);
    }

    #[test]
    fn cache_key_uses_wildcard_for_empty_domains() {
        assert_eq!(cache_key("q", &[], 5), "websearch:q:*:5");
    }
}
