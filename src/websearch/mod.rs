//! Web-Search Client (C9): cached, bounded-concurrency access to an
//! external search provider, with a failure throttle and a streaming
//! progress variant for the coordinator's `agent_log`.

pub mod client;
pub mod error;
pub mod provider;
pub mod streaming;
pub mod types;

pub use client::WebSearchClient;
pub use error::WebSearchError;
pub use provider::{HttpWebSearchProvider, ProviderRequest, WebSearchProvider};
pub use streaming::{search_with_progress, StreamedOutcome};
pub use types::{WebSearchChunk, WebSearchHit, WebSearchMetadata, WebSearchProgress, WebSearchResponse};
