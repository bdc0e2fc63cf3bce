//! SQL sub-agent seam (§4.12, §6): a structured-data collaborator reachable
//! as one of the coordinator's retrieval targets, specified only at its
//! interface. The actual natural-language-to-SQL planner, cost cap, row cap,
//! and table allowlist enforcement live outside this crate; what's here is
//! the trait the coordinator calls against, mirroring the way
//! [`crate::websearch::WebSearchProvider`] isolates the web-search backend.

use async_trait::async_trait;
use thiserror::Error;

/// One row of structured evidence returned by the SQL sub-agent.
#[derive(Debug, Clone)]
pub struct SqlRow {
    /// Row content, rendered as evidence text for grading and citation.
    pub content: String,
    /// Optional source descriptor (e.g. the table or view queried).
    pub source: Option<String>,
}

/// Errors surfaced by the SQL sub-agent. A failure here is fatal to the
/// current coordinator pass (§4.12 step c): unlike the vector stores and web
/// search, there's no silent-degrade path for structured data the caller
/// explicitly asked to target.
#[derive(Debug, Error)]
pub enum SqlAgentError {
    /// The sub-agent rejected or failed to execute the query.
    #[error("sql sub-agent failed: {0}")]
    Failed(String),
    /// The sub-agent did not respond within its configured timeout.
    #[error("sql sub-agent timed out")]
    Timeout,
    /// The query would have exceeded the configured cost or row cap.
    #[error("sql sub-agent query exceeded its cap: {0}")]
    CapExceeded(String),
}

/// The SQL sub-agent's external interface.
#[async_trait]
pub trait SqlSubAgent: Send + Sync {
    /// Answers `natural_language_query` against whatever structured store the
    /// sub-agent is configured against, returning rows as evidence.
    async fn query(&self, natural_language_query: &str) -> Result<Vec<SqlRow>, SqlAgentError>;
}

/// Deterministic in-memory stub, for tests and the `mock` binary mode: always
/// returns a fixed row set, independent of its input.
#[cfg(any(test, feature = "mock"))]
pub struct MockSqlSubAgent {
    rows: Vec<SqlRow>,
}

#[cfg(any(test, feature = "mock"))]
impl MockSqlSubAgent {
    /// A mock agent that always returns `rows`.
    pub fn with_rows(rows: Vec<SqlRow>) -> Self {
        Self { rows }
    }

    /// A mock agent that always returns an empty result set.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl SqlSubAgent for MockSqlSubAgent {
    async fn query(&self, _natural_language_query: &str) -> Result<Vec<SqlRow>, SqlAgentError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_agent_returns_configured_rows_regardless_of_query() {
        let agent = MockSqlSubAgent::with_rows(vec![SqlRow {
            content: "42 orders".to_string(),
            source: Some("orders".to_string()),
        }]);
        let rows = agent.query("anything").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "42 orders");
    }

    #[tokio::test]
    async fn empty_mock_agent_returns_no_rows() {
        let agent = MockSqlSubAgent::empty();
        assert!(agent.query("q").await.unwrap().is_empty());
    }
}
