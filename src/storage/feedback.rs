//! Feedback row model: `(id, rating, comment?, trace_id?, question?, created_at)` (§6).
//!
//! The feedback CRUD surface itself is out of scope (spec.md §1 names it
//! among the external collaborators); this is the row shape it writes to.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A thumbs up/down rating on a prior answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRating {
    /// Positive feedback.
    Up,
    /// Negative feedback.
    Down,
}

impl std::fmt::Display for FeedbackRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackRating::Up => write!(f, "up"),
            FeedbackRating::Down => write!(f, "down"),
        }
    }
}

/// A single feedback submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    /// Stable identifier.
    pub id: Uuid,
    /// Up or down rating.
    pub rating: FeedbackRating,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Optional trace id correlating this feedback to a coordinator invocation.
    pub trace_id: Option<String>,
    /// Optional copy of the original question.
    pub question: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Builds a new feedback row with a freshly-generated id and `created_at = now`.
    pub fn new(
        rating: FeedbackRating,
        comment: Option<String>,
        trace_id: Option<String>,
        question: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rating,
            comment,
            trace_id,
            question,
            created_at: now,
        }
    }
}
