//! Dependency registry for the Coordinator: an explicit, constructed-once
//! object rather than lazily-initialized statics, per the design note
//! favoring ordinary dependency injection over racy global state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::classifier::Classifier;
use crate::cache::TtlLruCache;
use crate::constants::{
    RESPONSE_CACHE_CAPACITY, RESPONSE_CACHE_TTL_SECS, RETRIEVAL_CACHE_CAPACITY,
    RETRIEVAL_CACHE_TTL_SECS,
};
use crate::events::FinalPayload;
use crate::retrieval::{HybridRetriever, RetrievedCandidate};
use crate::scoring::{Grader, Verifier};
use crate::sqlagent::SqlSubAgent;
use crate::storage::QueryRewriteRecord;
use crate::vectordb::PrimaryStore;
use crate::websearch::WebSearchClient;

use super::throttle::EmptyResultThrottle;

/// Cached retrieval-pass output (§4.12 step b/d): the fused candidates plus
/// the query embedding the grader reuses for semantic/hybrid scoring.
#[derive(Debug, Clone)]
pub struct RetrievalCacheEntry {
    pub candidates: Vec<RetrievedCandidate>,
    pub query_embedding: Vec<f32>,
}

/// Persists a rewrite audit record out-of-band. The coordinator calls this
/// from a spawned task (§4.12 steps 4/l: "persisted asynchronously,
/// failure-tolerant") so a persistence hiccup never blocks or fails the
/// caller's answer.
#[async_trait]
pub trait RewritePersister: Send + Sync {
    async fn persist(&self, record: QueryRewriteRecord) -> Result<(), String>;
}

/// Persists rewrite records to the primary store.
pub struct PrimaryRewritePersister {
    primary: Arc<PrimaryStore>,
}

impl PrimaryRewritePersister {
    pub fn new(primary: Arc<PrimaryStore>) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl RewritePersister for PrimaryRewritePersister {
    async fn persist(&self, record: QueryRewriteRecord) -> Result<(), String> {
        self.primary
            .insert_query_rewrite(&record)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Spawns a fire-and-forget persist task. A failure is logged, never
/// propagated: rewrite audit is best-effort (§4.12).
pub fn spawn_rewrite_persist(
    persister: Option<Arc<dyn RewritePersister>>,
    original: String,
    rewritten: String,
) {
    let Some(persister) = persister else { return };
    tokio::spawn(async move {
        let record = QueryRewriteRecord::new(original, rewritten, chrono::Utc::now());
        if let Err(e) = persister.persist(record).await {
            warn!(error = %e, "failed to persist query rewrite audit record");
        }
    });
}

/// Every collaborator the Coordinator fans out to, plus the three named
/// process-global caches (§3, §5) and the tunables that shape the
/// retrieve-grade-compose-verify loop.
pub struct AgentRegistry {
    pub classifier: Arc<Classifier>,
    pub retriever: Arc<HybridRetriever>,
    pub grader: Arc<Grader>,
    pub verifier: Arc<Verifier>,
    pub embedding_client: Arc<crate::embedding::EmbeddingClient>,
    pub web_search: Option<Arc<WebSearchClient>>,
    pub sql_agent: Option<Arc<dyn SqlSubAgent>>,
    pub rewrite_persister: Option<Arc<dyn RewritePersister>>,

    pub response_cache: TtlLruCache<FinalPayload>,
    pub retrieval_cache: TtlLruCache<RetrievalCacheEntry>,
    pub empty_result_throttle: EmptyResultThrottle,

    pub max_verification_loops: u32,
    pub allow_low_grade_fallback: bool,
    pub cache_failures: bool,
    pub enable_query_rewriting: bool,
    /// Disables the response/retrieval caches outright (§4.12 step 2): the
    /// deterministic mock binary mode always wants a fresh run.
    pub deterministic_mock: bool,
}

impl AgentRegistry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: Arc<Classifier>,
        retriever: Arc<HybridRetriever>,
        grader: Arc<Grader>,
        verifier: Arc<Verifier>,
        embedding_client: Arc<crate::embedding::EmbeddingClient>,
        web_search: Option<Arc<WebSearchClient>>,
        sql_agent: Option<Arc<dyn SqlSubAgent>>,
        rewrite_persister: Option<Arc<dyn RewritePersister>>,
        max_verification_loops: u32,
        allow_low_grade_fallback: bool,
        cache_failures: bool,
        enable_query_rewriting: bool,
        web_search_failure_throttle_base_ms: u64,
        deterministic_mock: bool,
    ) -> Self {
        Self {
            classifier,
            retriever,
            grader,
            verifier,
            embedding_client,
            web_search,
            sql_agent,
            rewrite_persister,
            response_cache: TtlLruCache::new(
                "response",
                Duration::from_secs(RESPONSE_CACHE_TTL_SECS),
                RESPONSE_CACHE_CAPACITY,
            ),
            retrieval_cache: TtlLruCache::new(
                "retrieval",
                Duration::from_secs(RETRIEVAL_CACHE_TTL_SECS),
                RETRIEVAL_CACHE_CAPACITY,
            ),
            empty_result_throttle: EmptyResultThrottle::new(web_search_failure_throttle_base_ms),
            max_verification_loops,
            allow_low_grade_fallback,
            cache_failures,
            enable_query_rewriting,
            deterministic_mock,
        }
    }
}
