//! Provider seam: the actual web-search backend (out of scope per the
//! external interface) is reached through this trait, the same way the
//! embedding client and reranker isolate their model backends.

use async_trait::async_trait;

use super::error::WebSearchError;
use super::types::WebSearchHit;

/// Parameters passed through to the provider for one search.
#[derive(Debug, Clone)]
pub struct ProviderRequest<'a> {
    pub query: &'a str,
    pub context_size: usize,
    pub location: Option<&'a str>,
    pub allowed_domains: &'a [String],
}

#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, request: ProviderRequest<'_>) -> Result<Vec<WebSearchHit>, WebSearchError>;
}

/// HTTP-backed provider calling a configured search API endpoint.
pub struct HttpWebSearchProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpWebSearchProvider {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[derive(serde::Serialize)]
struct HttpSearchRequest<'a> {
    query: &'a str,
    context_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    allowed_domains: &'a [String],
}

#[async_trait]
impl WebSearchProvider for HttpWebSearchProvider {
    async fn search(&self, request: ProviderRequest<'_>) -> Result<Vec<WebSearchHit>, WebSearchError> {
        let body = HttpSearchRequest {
            query: request.query,
            context_size: request.context_size,
            location: request.location,
            allowed_domains: request.allowed_domains,
        };

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| WebSearchError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WebSearchError::Provider(format!(
                "provider responded with status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<WebSearchHit>>()
            .await
            .map_err(|e| WebSearchError::Provider(e.to_string()))
    }
}
