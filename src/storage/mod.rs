//! Persisted row models (§6 "Persisted state"). DDL and migrations are out of
//! scope (spec.md §1); these are the row shapes the primary store adapter's
//! queries bind to.

pub mod chunk;
pub mod document;
pub mod feedback;
pub mod query_rewrite;
pub mod rate_limit_bucket;

pub use chunk::Chunk;
pub use document::Document;
pub use feedback::{Feedback, FeedbackRating};
pub use query_rewrite::QueryRewriteRecord;
pub use rate_limit_bucket::RateLimitBucket;
