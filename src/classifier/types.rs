//! Shared types for the classifier & rewriter (C8).

use std::collections::HashSet;

/// Whether the coordinator should retrieve evidence or answer directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the retrieve-grade-compose-verify loop.
    Retrieve,
    /// Answer without retrieval.
    Direct,
}

/// Estimated query complexity, surfaced in the planner's `agent_log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    /// Short, simple query.
    Low,
    /// Default complexity.
    Medium,
    /// Query combines multiple operations and is long.
    High,
}

/// One retrieval target the coordinator may fan out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Hybrid vector + keyword retrieval.
    Vector,
    /// The external SQL sub-agent.
    Sql,
    /// The web-search client.
    Web,
}

/// The classifier's routing decision for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierDecision {
    /// Retrieve or answer directly.
    pub mode: Mode,
    /// Estimated complexity.
    pub complexity: Complexity,
    /// Enabled retrieval targets, a subset of the caller-enabled sources.
    pub targets: HashSet<Target>,
}

/// Caller-level options the classifier consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Whether local hybrid retrieval is enabled for this call.
    pub use_rag: bool,
    /// Whether the web-search client is enabled for this call.
    pub use_web: bool,
}
