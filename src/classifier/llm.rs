//! Optional LLM classifier path (§4.8): replaces the heuristic when
//! `USE_LLM_CLASSIFIER` is enabled. Falls back to the heuristic on any
//! error or timeout, never surfacing a classifier failure to the caller.

use std::time::Duration;

use genai::chat::{ChatMessage, ChatRequest};
use genai::Client;
use serde::Deserialize;
use tracing::warn;

use super::heuristic;
use super::types::{ClassifierDecision, ClassifierOptions, Complexity, Mode, Target};

const LLM_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RawDecision {
    mode: String,
    complexity: String,
    targets: Vec<String>,
}

fn build_prompt(query: &str, opts: ClassifierOptions) -> String {
    format!(
        "Classify the user query below. Respond with JSON only, no prose, no code fences.\n\
         Schema: {{\"mode\": \"retrieve\"|\"direct\", \"complexity\": \"low\"|\"medium\"|\"high\", \"targets\": [\"vector\"|\"sql\"|\"web\", ...]}}\n\
         Enabled sources: vector={}, web={}.\n\
         Query: {query}",
        opts.use_rag, opts.use_web
    )
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("```").unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn parse_decision(raw: &str, opts: ClassifierOptions) -> Option<ClassifierDecision> {
    let cleaned = strip_code_fences(raw);
    let parsed: RawDecision = serde_json::from_str(cleaned).ok()?;

    let mode = match parsed.mode.as_str() {
        "retrieve" => Mode::Retrieve,
        "direct" => Mode::Direct,
        _ => return None,
    };
    let complexity = match parsed.complexity.as_str() {
        "low" => Complexity::Low,
        "medium" => Complexity::Medium,
        "high" => Complexity::High,
        _ => return None,
    };

    let mut targets = std::collections::HashSet::new();
    for t in parsed.targets {
        let target = match t.as_str() {
            "vector" => Some(Target::Vector),
            "sql" => Some(Target::Sql),
            "web" => Some(Target::Web),
            _ => None,
        };
        if let Some(target) = target {
            let enabled = match target {
                Target::Vector => opts.use_rag,
                Target::Web => opts.use_web,
                Target::Sql => true,
            };
            if enabled {
                targets.insert(target);
            }
        }
    }

    if mode == Mode::Retrieve && targets.is_empty() {
        if opts.use_rag {
            targets.insert(Target::Vector);
        } else if opts.use_web {
            targets.insert(Target::Web);
        }
    }

    Some(ClassifierDecision {
        mode,
        complexity,
        targets,
    })
}

/// Classifies `query` via a chat-completion call, falling back to the
/// heuristic classifier on any error, timeout, or unparseable response.
pub async fn classify(client: &Client, model: &str, query: &str, opts: ClassifierOptions) -> ClassifierDecision {
    let prompt = build_prompt(query, opts);
    let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

    let call = client.exec_chat(model, request, None);
    let outcome = tokio::time::timeout(LLM_CLASSIFIER_TIMEOUT, call).await;

    match outcome {
        Ok(Ok(response)) => {
            let text = response.first_text().unwrap_or_default();
            match parse_decision(text, opts) {
                Some(decision) => decision,
                None => {
                    warn!(event = "classifier.llm_parse_failed", "falling back to heuristic classifier");
                    heuristic::classify(query, opts)
                }
            }
        }
        Ok(Err(e)) => {
            warn!(event = "classifier.llm_error", error = %e, "falling back to heuristic classifier");
            heuristic::classify(query, opts)
        }
        Err(_) => {
            warn!(event = "classifier.llm_timeout", "falling back to heuristic classifier");
            heuristic::classify(query, opts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ClassifierOptions {
        ClassifierOptions {
            use_rag: true,
            use_web: true,
        }
    }

    #[test]
    fn parses_plain_json() {
        let raw = r#"{"mode": "retrieve", "complexity": "medium", "targets": ["vector", "web"]}"#;
        let decision = parse_decision(raw, opts()).unwrap();
        assert_eq!(decision.mode, Mode::Retrieve);
        assert!(decision.targets.contains(&Target::Vector));
        assert!(decision.targets.contains(&Target::Web));
    }

    #[test]
    fn tolerates_code_fences() {
        let raw = "```json\n{\"mode\": \"direct\", \"complexity\": \"low\", \"targets\": []}\n```";
        let decision = parse_decision(raw, opts()).unwrap();
        assert_eq!(decision.mode, Mode::Direct);
        assert_eq!(decision.complexity, Complexity::Low);
    }

    #[test]
    fn disabled_target_is_dropped() {
        let raw = r#"{"mode": "retrieve", "complexity": "medium", "targets": ["web"]}"#;
        let disabled_web = ClassifierOptions {
            use_rag: true,
            use_web: false,
        };
        let decision = parse_decision(raw, disabled_web).unwrap();
        assert!(!decision.targets.contains(&Target::Web));
        assert!(decision.targets.contains(&Target::Vector));
    }

    #[test]
    fn unparseable_response_returns_none() {
        assert!(parse_decision("not json at all", opts()).is_none());
    }
}
