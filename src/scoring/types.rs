//! Shared types for the grader (C7) and verifier (C7).

use std::collections::HashMap;

/// A grade label assigned to a graded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeLabel {
    /// `score > HIGH_T`.
    High,
    /// `score > MEDIUM_T` and not `High`.
    Medium,
    /// Neither `High` nor `Medium`.
    Low,
}

impl std::fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeLabel::High => "high",
            GradeLabel::Medium => "medium",
            GradeLabel::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// Which scoring method the grader used, per §4.7 selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeMethod {
    /// Token-overlap ratio over query-token count.
    Keyword,
    /// Cosine similarity of query embedding against freshly-embedded chunk text.
    Semantic,
    /// `0.7 * semantic + 0.3 * keyword`.
    Hybrid,
}

/// Input to the grader/verifier: an identified piece of evidence text.
#[derive(Debug, Clone)]
pub struct GradeInput {
    /// Stable identifier (chunk id, or `web:<hash>` for web-sourced evidence).
    pub id: String,
    /// The evidence text to grade.
    pub content: String,
}

/// Result of grading a set of chunks against a query.
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    /// Label assigned to each input id.
    pub grades: HashMap<String, GradeLabel>,
    /// Raw score assigned to each input id (pre-labeling).
    pub scores_by_chunk: HashMap<String, f32>,
    /// Which method produced these scores.
    pub method: GradeMethod,
}

impl GradeOutcome {
    /// Splits input ids into grade buckets, preserving each bucket's relative order.
    pub fn partition_by_grade<'a>(
        &self,
        ids_in_order: &'a [String],
    ) -> (Vec<&'a str>, Vec<&'a str>, Vec<&'a str>) {
        let mut high = Vec::new();
        let mut medium = Vec::new();
        let mut low = Vec::new();
        for id in ids_in_order {
            match self.grades.get(id) {
                Some(GradeLabel::High) => high.push(id.as_str()),
                Some(GradeLabel::Medium) => medium.push(id.as_str()),
                _ => low.push(id.as_str()),
            }
        }
        (high, medium, low)
    }
}

/// Outcome of verifying an answer's grounding against approved evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    /// Whether `confidence >= VERIFY_T`.
    pub is_valid: bool,
    /// Human-readable confidence band.
    pub feedback: String,
    /// `|answer_tokens ∩ evidence_tokens| / max(1, |answer_tokens|)`.
    pub confidence: f32,
}
