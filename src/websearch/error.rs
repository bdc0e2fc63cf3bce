use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebSearchError {
    #[error("web search provider failed: {0}")]
    Provider(String),

    #[error("web search provider timed out")]
    Timeout,

    #[error("too many allowed domains: {count} (max {max})")]
    TooManyDomains { count: usize, max: usize },
}
