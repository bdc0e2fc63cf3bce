//! Guidance messages emitted when no evidence can be approved (§4.12 step h,
//! §7). Answer text is never fabricated from outside the approved set, so
//! these are the only text the coordinator produces without a citation.

use crate::scoring::GradeOutcome;

/// Builds the detailed guidance message for the empty-corpus / no-hits path.
/// `used_web` distinguishes the web-only variant from the RAG variant.
pub fn no_evidence_message(grades: &GradeOutcome, used_web: bool) -> String {
    let ids: Vec<String> = grades.grades.keys().cloned().collect();
    let (high, medium, low) = grades.partition_by_grade(&ids);
    let counts = format!(
        "({} high / {} medium / {} low)",
        high.len(),
        medium.len(),
        low.len()
    );

    let mut message = String::from("No supporting evidence found ");
    message.push_str(&counts);
    message.push_str(".\n\n");

    if used_web {
        message.push_str(
            "Web search was consulted but returned nothing usable for this query. \
             Try rephrasing with more specific terms, or narrow the allowed domains.",
        );
    } else {
        message.push_str(
            "No ingested document matched this query closely enough to cite. \
             Try rephrasing the question, ingesting relevant documents, or enabling web search.",
        );
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{GradeLabel, GradeMethod};
    use std::collections::HashMap;

    fn empty_outcome() -> GradeOutcome {
        GradeOutcome {
            grades: HashMap::new(),
            scores_by_chunk: HashMap::new(),
            method: GradeMethod::Keyword,
        }
    }

    #[test]
    fn empty_corpus_message_contains_marker_phrase_and_zero_counts() {
        let message = no_evidence_message(&empty_outcome(), false);
        assert!(message.contains("No supporting evidence found"));
        assert!(message.contains("(0 high / 0 medium / 0 low)"));
    }

    #[test]
    fn web_variant_mentions_web_search() {
        let message = no_evidence_message(&empty_outcome(), true);
        assert!(message.to_lowercase().contains("web search"));
    }

    #[test]
    fn rag_variant_suggests_ingestion() {
        let message = no_evidence_message(&empty_outcome(), false);
        assert!(message.to_lowercase().contains("ingest"));
    }

    #[test]
    fn counts_reflect_graded_chunks() {
        let mut grades = HashMap::new();
        grades.insert("a".to_string(), GradeLabel::High);
        grades.insert("b".to_string(), GradeLabel::Medium);
        grades.insert("c".to_string(), GradeLabel::Medium);
        grades.insert("d".to_string(), GradeLabel::Low);
        let outcome = GradeOutcome {
            grades,
            scores_by_chunk: HashMap::new(),
            method: GradeMethod::Keyword,
        };
        let message = no_evidence_message(&outcome, false);
        assert!(message.contains("(1 high / 2 medium / 1 low)"));
    }
}
