//! Verifier: checks an answer's grounding against its evidence (§4.7).

use std::collections::HashSet;

use crate::constants::{DEFAULT_MIN_TECHNICAL_TERM_LENGTH, DEFAULT_VERIFICATION_THRESHOLD};

use super::types::VerificationOutcome;

/// Small whitelist of technical abbreviations that count toward verification
/// regardless of the minimum-token-length cutoff.
const TECHNICAL_ABBREVIATIONS: &[&str] = &[
    "ai", "ml", "api", "cpu", "gpu", "sql", "aws", "gcp", "ui", "ux", "os", "io", "db", "ci",
    "cd", "sdk", "cli", "http", "css", "xml", "url", "uri",
];

/// Verifies a composed answer's grounding against the approved evidence set.
#[derive(Debug, Clone)]
pub struct Verifier {
    threshold: f32,
    min_technical_term_length: usize,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VERIFICATION_THRESHOLD,
            min_technical_term_length: DEFAULT_MIN_TECHNICAL_TERM_LENGTH,
        }
    }
}

impl Verifier {
    /// Builds a verifier with an explicit acceptance threshold and minimum
    /// technical-term length.
    pub fn new(threshold: f32, min_technical_term_length: usize) -> Self {
        Self {
            threshold,
            min_technical_term_length,
        }
    }

    /// Verifies `answer` against the union of `evidence` texts.
    pub fn verify(&self, answer: &str, evidence: &[String]) -> VerificationOutcome {
        let answer_tokens = self.tokenize(answer);
        let evidence_tokens: HashSet<String> = evidence
            .iter()
            .flat_map(|text| self.tokenize(text))
            .collect();

        let denom = answer_tokens.len().max(1) as f32;
        let overlap = answer_tokens.intersection(&evidence_tokens).count();
        let confidence = overlap as f32 / denom;

        let is_valid = confidence >= self.threshold;
        let feedback = self.feedback_band(confidence);

        VerificationOutcome {
            is_valid,
            feedback,
            confidence,
        }
    }

    fn feedback_band(&self, confidence: f32) -> String {
        if confidence >= 0.8 {
            "strongly supported by the retrieved evidence".to_string()
        } else if confidence >= self.threshold {
            "supported by the retrieved evidence".to_string()
        } else if confidence >= 0.7 * self.threshold {
            "only moderately supported by the retrieved evidence".to_string()
        } else {
            "insufficiently supported by the retrieved evidence".to_string()
        }
    }

    fn tokenize(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .filter(|w| w.len() >= self.min_technical_term_length || TECHNICAL_ABBREVIATIONS.contains(w))
            .map(|w| w.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_grounded_answer_is_valid_and_strongly_supported() {
        let verifier = Verifier::default();
        let outcome = verifier.verify(
            "hybrid retrieval fuses vector and keyword search",
            &["hybrid retrieval fuses vector and keyword search results".to_string()],
        );
        assert!(outcome.is_valid);
        assert!(outcome.confidence >= 0.8);
        assert_eq!(outcome.feedback, "strongly supported by the retrieved evidence");
    }

    #[test]
    fn ungrounded_answer_is_invalid() {
        let verifier = Verifier::default();
        let outcome = verifier.verify("completely unrelated statement", &["evidence about something else".to_string()]);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.feedback, "insufficiently supported by the retrieved evidence");
    }

    #[test]
    fn short_technical_abbreviations_count_despite_min_length() {
        let verifier = Verifier::new(0.5, 4);
        let outcome = verifier.verify("the api uses sql under the hood", &["api and sql are both mentioned here".to_string()]);
        // "api" and "sql" are 3 chars, below min length 4, but whitelisted
        assert!(outcome.confidence > 0.0);
    }

    #[test]
    fn empty_answer_has_confidence_zero_over_denominator_one() {
        let verifier = Verifier::default();
        let outcome = verifier.verify("", &["some evidence".to_string()]);
        assert_eq!(outcome.confidence, 0.0);
        assert!(!outcome.is_valid);
    }
}
