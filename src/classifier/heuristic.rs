//! Heuristic classifier (§4.8): regex-pattern routing with no model call.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ClassifierDecision, ClassifierOptions, Complexity, Mode, Target};

static HAS_OPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(join|aggregate|compare|timeline|pipeline|why|how)\b").unwrap()
});

static SQL_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(select|from|table|column|join|where|group by|order by|count|sum|avg|max|min)\b")
        .unwrap()
});

static RECENCY_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(latest|today|yesterday|current|news|update|recent|202[4-9])\b").unwrap()
});

static IS_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey|thanks|thank you|good (morning|afternoon|evening)|hola|yo)\b")
        .unwrap()
});

/// Classifies `query` against `opts` using the heuristics in §4.8.
pub fn classify(query: &str, opts: ClassifierOptions) -> ClassifierDecision {
    let has_ops = HAS_OPS.is_match(query);
    let sql_indicators = SQL_INDICATORS.is_match(query);
    let recency_indicators = RECENCY_INDICATORS.is_match(query);
    let is_greeting = IS_GREETING.is_match(query.trim());
    let len = query.split_whitespace().count();

    let complexity = if has_ops && len > 12 {
        Complexity::High
    } else if has_ops {
        Complexity::Medium
    } else if len < 6 {
        Complexity::Low
    } else {
        Complexity::Medium
    };

    let mode = if has_ops || len > 6 {
        Mode::Retrieve
    } else if is_greeting {
        Mode::Direct
    } else if (!opts.use_rag && opts.use_web) || (recency_indicators && opts.use_web) {
        Mode::Retrieve
    } else if !opts.use_rag {
        Mode::Direct
    } else {
        Mode::Retrieve
    };

    let mut targets: HashSet<Target> = HashSet::new();
    if opts.use_rag {
        targets.insert(Target::Vector);
    }
    if opts.use_web || (recency_indicators && opts.use_web) {
        targets.insert(Target::Web);
    }
    if sql_indicators {
        targets.insert(Target::Sql);
    }
    if mode == Mode::Retrieve && targets.is_empty() {
        targets.insert(Target::Vector);
    }

    ClassifierDecision {
        mode,
        complexity,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(use_rag: bool, use_web: bool) -> ClassifierOptions {
        ClassifierOptions { use_rag, use_web }
    }

    #[test]
    fn greeting_is_direct_and_low_complexity() {
        let decision = classify("hi", opts(true, true));
        assert_eq!(decision.mode, Mode::Direct);
        assert_eq!(decision.complexity, Complexity::Low);
    }

    #[test]
    fn recency_and_web_query_targets_vector_and_web() {
        let decision = classify("What were the AI breakthroughs in 2024?", opts(true, true));
        assert!(decision.targets.contains(&Target::Vector));
        assert!(decision.targets.contains(&Target::Web));
    }

    #[test]
    fn sql_like_query_targets_sql() {
        let decision = classify("SELECT count FROM documents", opts(true, true));
        assert!(decision.targets.contains(&Target::Sql));
    }

    #[test]
    fn retrieve_mode_never_leaves_targets_empty() {
        let decision = classify("explain how this system works in detail today", opts(false, false));
        assert_eq!(decision.mode, Mode::Retrieve);
        assert!(!decision.targets.is_empty());
    }

    #[test]
    fn short_non_greeting_with_rag_disabled_and_web_disabled_is_direct() {
        let decision = classify("ok", opts(false, false));
        assert_eq!(decision.mode, Mode::Direct);
    }

    #[test]
    fn high_complexity_requires_ops_and_long_query() {
        let decision = classify(
            "why does the pipeline aggregate and join these tables across the whole timeline",
            opts(true, false),
        );
        assert_eq!(decision.complexity, Complexity::High);
    }
}
