//! Rewriter (§4.8): expands short/ambiguous queries before retrieval.

/// Outcome of a rewrite attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The rewritten query text.
    pub rewritten: String,
    /// Human-readable reason, surfaced in the `rewrite` event.
    pub reason: String,
}

/// Token-count threshold below which a query is considered short/ambiguous.
const SHORT_QUERY_TOKEN_THRESHOLD: usize = 6;

/// Rewrites `query` if it has fewer than six tokens. Returns `None` when no
/// rewrite is warranted (the coordinator keeps the original working query).
pub fn rewrite(query: &str) -> Option<RewriteOutcome> {
    let token_count = query.split_whitespace().count();
    if token_count >= SHORT_QUERY_TOKEN_THRESHOLD {
        return None;
    }

    Some(RewriteOutcome {
        rewritten: format!(
            "{query} (context: RAG chat app, hybrid retrieval, citations)"
        ),
        reason: "Short/ambiguous query expanded".to_string(),
    })
}

/// Quality-agent rewrite used by the coordinator's refinement step (§4.12
/// step l): re-rewrites the *current* working query, regardless of length,
/// when verification confidence was low. Falls back to the same expansion
/// suffix the short-query rewriter uses, since no LLM-backed rewriter is
/// specified here beyond §4.8's heuristic.
pub fn rewrite_for_quality(query: &str) -> RewriteOutcome {
    RewriteOutcome {
        rewritten: format!("{query} (context: RAG chat app, hybrid retrieval, citations)"),
        reason: "Low verification confidence; query re-expanded for another pass".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_query_is_rewritten() {
        let outcome = rewrite("hybrid retrieval").unwrap();
        assert!(outcome.rewritten.contains("hybrid retrieval"));
        assert!(outcome.rewritten.contains("context: RAG chat app"));
        assert_eq!(outcome.reason, "Short/ambiguous query expanded");
    }

    #[test]
    fn long_query_is_not_rewritten() {
        assert!(rewrite("What is hybrid retrieval and how does fusion scoring work exactly").is_none());
    }

    #[test]
    fn boundary_six_tokens_is_not_rewritten() {
        assert!(rewrite("one two three four five six").is_none());
    }

    #[test]
    fn five_tokens_is_rewritten() {
        assert!(rewrite("one two three four five").is_some());
    }
}
