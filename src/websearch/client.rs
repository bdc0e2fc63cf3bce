//! Web-Search Client (C9): cached, concurrency-bounded, failure-throttled
//! access to a pluggable search provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::cache::TtlLruCache;
use crate::constants::{
    DEFAULT_MAX_ALLOWED_DOMAINS, DEFAULT_WEB_MAX_RESULTS, WEB_SEARCH_CACHE_CAPACITY,
    WEB_SEARCH_CACHE_TTL_SECS,
};

use super::error::WebSearchError;
use super::provider::{ProviderRequest, WebSearchProvider};
use super::types::{cache_key, WebSearchChunk, WebSearchHit, WebSearchMetadata, WebSearchResponse};

/// Cap on the exponential backoff applied to a single query after repeated failures.
const MAX_THROTTLE_DELAY_MS: u64 = 60_000;

struct FailureState {
    consecutive_failures: u32,
    retry_after: Instant,
}

/// Cached, concurrency-bounded web-search client.
pub struct WebSearchClient {
    provider: Arc<dyn WebSearchProvider>,
    cache: TtlLruCache<WebSearchResponse>,
    semaphore: Arc<Semaphore>,
    failures: Mutex<HashMap<String, FailureState>>,
    failure_throttle_base_ms: u64,
    context_size: usize,
    location: Option<String>,
    default_allowlist: Vec<String>,
    hits: AtomicU64,
    errors: AtomicU64,
}

impl WebSearchClient {
    pub fn new(
        provider: Arc<dyn WebSearchProvider>,
        concurrent_requests: usize,
        failure_throttle_base_ms: u64,
        context_size: usize,
        location: Option<String>,
        default_allowlist: Vec<String>,
    ) -> Self {
        Self {
            provider,
            cache: TtlLruCache::new(
                "websearch",
                Duration::from_secs(WEB_SEARCH_CACHE_TTL_SECS),
                WEB_SEARCH_CACHE_CAPACITY,
            ),
            semaphore: Arc::new(Semaphore::new(concurrent_requests.max(1))),
            failures: Mutex::new(HashMap::new()),
            failure_throttle_base_ms,
            context_size,
            location,
            default_allowlist,
            hits: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Runs `performWebSearch` (§4.9). Empty (trimmed) queries return an
    /// empty result rather than an error.
    pub async fn search(
        &self,
        query: &str,
        max_results: Option<usize>,
        allowed_domains: Option<Vec<String>>,
    ) -> Result<WebSearchResponse, WebSearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(WebSearchResponse {
                chunks: Vec::new(),
                metadata: WebSearchMetadata {
                    query: query.to_string(),
                    result_count: 0,
                    from_cache: false,
                },
            });
        }

        let max_results = max_results.unwrap_or(DEFAULT_WEB_MAX_RESULTS);
        let mut domains = allowed_domains.unwrap_or_else(|| self.default_allowlist.clone());
        if domains.len() > DEFAULT_MAX_ALLOWED_DOMAINS {
            domains.truncate(DEFAULT_MAX_ALLOWED_DOMAINS);
        }

        let key = cache_key(trimmed, &domains, max_results);
        if let Some(cached) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            let mut response = cached;
            response.metadata.from_cache = true;
            return Ok(response);
        }

        self.check_throttle(trimmed)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("web search semaphore is never closed");

        let request = ProviderRequest {
            query: trimmed,
            context_size: self.context_size,
            location: self.location.as_deref(),
            allowed_domains: &domains,
        };

        match self.provider.search(request).await {
            Ok(hits) => {
                self.clear_throttle(trimmed);
                let response = Self::wrap_response(trimmed, hits);
                self.cache.set(key, response.clone());
                Ok(response)
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                self.record_failure(trimmed);
                warn!(event = "websearch.provider_error", query = trimmed, error = %e, "web search provider failed");
                Err(e)
            }
        }
    }

    fn wrap_response(query: &str, hits: Vec<WebSearchHit>) -> WebSearchResponse {
        let result_count = hits.len();
        let chunks = hits
            .into_iter()
            .enumerate()
            .map(|(rank, hit)| {
                let score = hit.relevance.unwrap_or(1.0 / (rank as f32 + 1.0));
                WebSearchChunk {
                    title: hit.title,
                    url: hit.url,
                    snippet: hit.snippet,
                    score,
                }
            })
            .collect();

        WebSearchResponse {
            chunks,
            metadata: WebSearchMetadata {
                query: query.to_string(),
                result_count,
                from_cache: false,
            },
        }
    }

    fn check_throttle(&self, query: &str) -> Result<(), WebSearchError> {
        let failures = self.failures.lock();
        if let Some(state) = failures.get(query) {
            if Instant::now() < state.retry_after {
                return Err(WebSearchError::Provider(
                    "query is throttled after repeated provider failures".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn record_failure(&self, query: &str) {
        let mut failures = self.failures.lock();
        let state = failures.entry(query.to_string()).or_insert(FailureState {
            consecutive_failures: 0,
            retry_after: Instant::now(),
        });
        state.consecutive_failures += 1;
        let delay_ms = self
            .failure_throttle_base_ms
            .saturating_mul(1u64 << state.consecutive_failures.min(10))
            .min(MAX_THROTTLE_DELAY_MS);
        state.retry_after = Instant::now() + Duration::from_millis(delay_ms);
    }

    fn clear_throttle(&self, query: &str) {
        self.failures.lock().remove(query);
    }

    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct FlakyProvider {
        calls: AtomicUsize,
        fail_first_n: usize,
    }

    #[async_trait]
    impl WebSearchProvider for FlakyProvider {
        async fn search(&self, request: ProviderRequest<'_>) -> Result<Vec<WebSearchHit>, WebSearchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first_n {
                return Err(WebSearchError::Provider("boom".to_string()));
            }
            Ok(vec![WebSearchHit {
                title: format!("result for {}", request.query),
                url: "https://example.com".to_string(),
                snippet: "snippet".to_string(),
                relevance: None,
            }])
        }
    }

    fn client_with(fail_first_n: usize) -> WebSearchClient {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
            fail_first_n,
        });
        WebSearchClient::new(provider, 3, 10, 5, None, Vec::new())
    }

    #[tokio::test]
    async fn empty_query_returns_empty_result_not_error() {
        let client = client_with(0);
        let response = client.search("   ", None, None).await.unwrap();
        assert!(response.chunks.is_empty());
    }

    #[tokio::test]
    async fn successful_search_scores_by_rank_when_no_relevance() {
        let client = client_with(0);
        let response = client.search("rust async", None, None).await.unwrap();
        assert_eq!(response.chunks.len(), 1);
        assert_eq!(response.chunks[0].score, 1.0);
    }

    #[tokio::test]
    async fn second_identical_search_is_served_from_cache() {
        let client = client_with(0);
        let _ = client.search("cache me", None, None).await.unwrap();
        let second = client.search("cache me", None, None).await.unwrap();
        assert!(second.metadata.from_cache);
        assert_eq!(client.cache_hits(), 1);
    }

    #[tokio::test]
    async fn provider_error_is_propagated_and_counted() {
        let client = client_with(1);
        let err = client.search("fails once", None, None).await;
        assert!(err.is_err());
        assert_eq!(client.error_count(), 1);
    }
}
