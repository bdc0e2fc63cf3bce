//! Streaming progress wrapper over [`super::client::WebSearchClient`], used
//! by the coordinator to translate provider progress into `agent_log` events.

use std::sync::Arc;

use futures_util::stream::{self, Stream};
use parking_lot::Mutex;

use super::client::WebSearchClient;
use super::error::WebSearchError;
use super::types::{WebSearchProgress, WebSearchResponse};

/// Holds the outcome of a streamed search once it completes, since the
/// progress stream itself only carries the lifecycle stages (§4.9).
pub type StreamedOutcome = Arc<Mutex<Option<Result<WebSearchResponse, WebSearchError>>>>;

/// Runs a search, yielding the three lifecycle stages a provider call always
/// passes through. The actual response is written into `outcome` once the
/// `completed` stage is reached, since provider calls aren't themselves
/// incrementally streamed (that's a provider-internals concern).
pub fn search_with_progress<'a>(
    client: &'a WebSearchClient,
    query: String,
    max_results: Option<usize>,
    allowed_domains: Option<Vec<String>>,
    outcome: StreamedOutcome,
) -> impl Stream<Item = WebSearchProgress> + 'a {
    stream::unfold(StreamState::NotStarted, move |state| {
        let query = query.clone();
        let max_results = max_results;
        let allowed_domains = allowed_domains.clone();
        let outcome = outcome.clone();
        async move {
            match state {
                StreamState::NotStarted => {
                    Some((WebSearchProgress::InProgress, StreamState::AboutToSearch))
                }
                StreamState::AboutToSearch => {
                    Some((WebSearchProgress::Searching, StreamState::Searching))
                }
                StreamState::Searching => {
                    let result = client.search(&query, max_results, allowed_domains).await;
                    let count = result.as_ref().map(|r| r.chunks.len()).unwrap_or(0);
                    *outcome.lock() = Some(result);
                    Some((WebSearchProgress::Completed { result_count: count }, StreamState::Done))
                }
                StreamState::Done => None,
            }
        }
    })
}

#[derive(Clone, Copy)]
enum StreamState {
    NotStarted,
    AboutToSearch,
    Searching,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::websearch::error::WebSearchError as WsError;
    use crate::websearch::provider::{ProviderRequest, WebSearchProvider};
    use crate::websearch::types::WebSearchHit;
    use async_trait::async_trait;
    use futures_util::StreamExt;

    struct StubProvider;

    #[async_trait]
    impl WebSearchProvider for StubProvider {
        async fn search(&self, _request: ProviderRequest<'_>) -> Result<Vec<WebSearchHit>, WsError> {
            Ok(vec![WebSearchHit {
                title: "t".to_string(),
                url: "u".to_string(),
                snippet: "s".to_string(),
                relevance: Some(0.9),
            }])
        }
    }

    #[tokio::test]
    async fn emits_in_progress_then_completed_and_records_outcome() {
        let client = WebSearchClient::new(Arc::new(StubProvider), 3, 10, 5, None, Vec::new());
        let outcome: StreamedOutcome = Arc::new(Mutex::new(None));
        let events: Vec<WebSearchProgress> =
            search_with_progress(&client, "q".to_string(), None, None, outcome.clone())
                .collect()
                .await;

        assert!(matches!(events[0], WebSearchProgress::InProgress));
        assert!(matches!(events[1], WebSearchProgress::Searching));
        assert!(matches!(events[2], WebSearchProgress::Completed { result_count: 1 }));
        assert!(outcome.lock().as_ref().unwrap().is_ok());
    }
}
