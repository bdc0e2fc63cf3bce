//! # Lantern
//!
//! A retrieval-augmented question-answering engine: hybrid (vector + keyword)
//! retrieval over an ingested document store, graded and reranked, composed
//! into an answer, and verified against its own cited evidence before it is
//! streamed back to the caller. An optional web-search collaborator and SQL
//! sub-agent extend retrieval beyond the local store when the caller's query
//! targets them.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lantern::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Listening on {}", config.socket_addr());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Purpose |
//! |---------|---------|
//! | `cpu` | CPU-only inference (docs.rs default) |
//! | `metal` | Apple Silicon GPU acceleration |
//! | `cuda` | NVIDIA GPU acceleration |
//! | `mock` | Mock backends for tests and the deterministic binary mode |
//!
//! ## Modules
//!
//! - [`coordinator`] - orchestrates classify → retrieve → grade → compose → verify
//! - [`classifier`] - query mode/complexity/target classification and rewriting
//! - [`retrieval`] - hybrid vector + keyword fusion and reranking
//! - [`scoring`] - evidence grading and answer verification
//! - [`websearch`] - streaming web-search collaborator
//! - [`sqlagent`] - structured-data collaborator seam
//! - [`ingestion`] - chunk/embed/write pipeline with compensating rollback
//! - [`reconcile`] - periodic drift detection between the two vector stores
//! - [`vectordb`] - primary (Postgres + pgvector) and secondary (Qdrant) adapters
//! - [`keyword`] - trigram title/keyword search adapter
//! - [`embedding`] - embedding client and cross-encoder reranker
//! - [`cache`] - process-global TTL+LRU caching
//! - [`events`] - the pipeline event stream and its sink trait
//! - [`gateway`] - HTTP/SSE adapter
//! - [`config`] - environment-backed configuration
//!
//! Links: repo/issues at the crate `repository` URL.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod embedding;
pub mod events;
pub mod gateway;
pub mod hashing;
pub mod ingestion;
pub mod keyword;
pub mod ratelimit;
pub mod reconcile;
pub mod retrieval;
pub mod scoring;
pub mod sqlagent;
pub mod storage;
pub mod vectordb;
pub mod websearch;

pub use cache::TtlLruCache;
pub use classifier::{
    Classifier, ClassifierDecision, ClassifierOptions, Complexity, Mode, RewriteOutcome, Target,
};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
pub use coordinator::{AgentRegistry, Coordinator, CoordinatorOptions};
pub use embedding::{
    DEFAULT_THRESHOLD, Embedding, EmbeddingClient, EmbeddingClientConfig, EmbeddingError, Reranker,
    RerankerConfig, RerankerError, cosine_similarity,
};
pub use events::{
    AgentRole, Citation, EventSink, FinalPayload, GradeSummary, PipelineEvent, VecSink,
};
pub use hashing::{embedding_seed, web_source_id};
pub use ingestion::{IngestOutcome, IngestionError, Ingestor};
pub use keyword::{KeywordAdapter, KeywordChunk, TitleMatch};
pub use reconcile::{DriftReport, Reconciler};
pub use retrieval::{
    CandidateSource, FusionWeights, HybridRetriever, RetrievalError, RetrievalOutput,
    RetrievedCandidate,
};
pub use scoring::{
    GradeInput, GradeLabel, GradeMethod, GradeOutcome, Grader, ScoringError, VerificationOutcome,
    Verifier,
};
#[cfg(any(test, feature = "mock"))]
pub use sqlagent::MockSqlSubAgent;
pub use sqlagent::{SqlAgentError, SqlRow, SqlSubAgent};
pub use storage::{Chunk, Document, Feedback, FeedbackRating, QueryRewriteRecord, RateLimitBucket};
pub use vectordb::{
    DEFAULT_COLLECTION_NAME, PrimaryStore, SecondaryStore, VectorDbError, VectorSearchHit,
};
pub use websearch::{
    HttpWebSearchProvider, ProviderRequest, StreamedOutcome, WebSearchChunk, WebSearchClient,
    WebSearchError, WebSearchHit, WebSearchMetadata, WebSearchProgress, WebSearchProvider,
    WebSearchResponse, search_with_progress,
};
