//! Grader & Verifier (C7).
//!
//! [`Grader`] scores retrieved chunks against a query and buckets them into
//! high/medium/low grades; [`Verifier`] checks a composed answer's grounding
//! against its approved evidence.

pub mod error;
pub mod grader;
pub mod types;
pub mod verifier;

pub use error::ScoringError;
pub use grader::Grader;
pub use types::{GradeInput, GradeLabel, GradeMethod, GradeOutcome, VerificationOutcome};
pub use verifier::Verifier;
