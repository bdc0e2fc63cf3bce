//! Input/output types for the Coordinator (C12).

/// Caller-supplied options for one `run` invocation (§4.12, §6).
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub use_rag: bool,
    pub use_hybrid: bool,
    pub use_web: bool,
    pub allowed_domains: Option<Vec<String>>,
    pub web_max_results: Option<usize>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            use_rag: true,
            use_hybrid: true,
            use_web: false,
            allowed_domains: None,
            web_max_results: None,
        }
    }
}

/// Normalizes the response-cache key (§4.12 step 2). Includes `webMaxResults`
/// per the consolidated variant named in `SPEC_FULL.md`'s Open Questions.
pub fn response_cache_key(message: &str, opts: &CoordinatorOptions) -> String {
    let mut domains = opts.allowed_domains.clone().unwrap_or_default();
    domains.sort();
    let key = format!(
        "resp:{}:{}:{}:{}:{}:{}",
        opts.use_rag,
        opts.use_hybrid,
        opts.use_web,
        domains.join(","),
        opts.web_max_results.map(|n| n.to_string()).unwrap_or_default(),
        message
    );
    crate::cache::normalize(&key)
}

/// Normalizes the retrieval-cache key (§4.12 step b). Only consulted when
/// web is not in play for this pass.
pub fn retrieval_cache_key(targets: &[&str], working_query: &str) -> String {
    let mut sorted = targets.to_vec();
    sorted.sort();
    let key = format!("ret:{}:{}", sorted.join(","), working_query);
    crate::cache::normalize(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_cache_key_includes_web_max_results() {
        let mut opts = CoordinatorOptions::default();
        opts.web_max_results = Some(5);
        let with = response_cache_key("q", &opts);
        opts.web_max_results = Some(8);
        let different = response_cache_key("q", &opts);
        assert_ne!(with, different);
    }

    #[test]
    fn response_cache_key_sorts_allowed_domains() {
        let mut a = CoordinatorOptions::default();
        a.allowed_domains = Some(vec!["b.com".to_string(), "a.com".to_string()]);
        let mut b = CoordinatorOptions::default();
        b.allowed_domains = Some(vec!["a.com".to_string(), "b.com".to_string()]);
        assert_eq!(response_cache_key("q", &a), response_cache_key("q", &b));
    }

    #[test]
    fn retrieval_cache_key_sorts_targets() {
        assert_eq!(
            retrieval_cache_key(&["web", "vector"], "q"),
            retrieval_cache_key(&["vector", "web"], "q")
        );
    }
}
