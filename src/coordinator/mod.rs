//! Coordinator (C12): the retrieve-grade-compose-verify loop tying every
//! other component together behind one `run` call.
//!
//! Classifies the query, optionally replays a cached response, otherwise
//! fans out to hybrid retrieval / the SQL sub-agent / web search, grades and
//! cites the results, composes an answer from the approved evidence, and
//! verifies the answer's grounding before emitting it — retrying with a
//! rewritten query up to `maxVerificationLoops` times when verification comes
//! back weak. Every step streams through the caller's [`EventSink`]; `final`
//! is emitted exactly once per call.

pub mod compose;
pub mod guidance;
pub mod registry;
pub mod throttle;
pub mod types;

pub use registry::AgentRegistry;
pub use types::CoordinatorOptions;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::classifier::{ClassifierOptions, Mode, Target};
use crate::constants::DEFAULT_TOKEN_CHUNK_LEN;
use crate::events::{AgentRole, Citation, EventSink, FinalPayload, GradeSummary, PipelineEvent};
use crate::hashing::web_source_id;
use crate::retrieval::RetrievedCandidate;
use crate::scoring::{GradeInput, VerificationOutcome};
use crate::sqlagent::{SqlRow, SqlSubAgent};
use crate::websearch::{search_with_progress, StreamedOutcome, WebSearchChunk, WebSearchProgress};

use self::registry::{spawn_rewrite_persist, RetrievalCacheEntry};
use self::types::{response_cache_key, retrieval_cache_key};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// One piece of evidence, unified across the three retrieval targets so the
/// grader, citation rendering, and composition can treat them identically.
#[derive(Debug, Clone)]
struct EvidenceItem {
    id: String,
    document_id: Option<Uuid>,
    chunk_index: Option<i32>,
    content: String,
    source: Option<String>,
    is_web: bool,
}

impl EvidenceItem {
    fn from_candidate(c: &RetrievedCandidate) -> Self {
        Self {
            id: c.id.clone(),
            document_id: c.document_id,
            chunk_index: c.chunk_index,
            content: c.content.clone(),
            source: c.source.clone(),
            is_web: false,
        }
    }

    fn from_sql(index: usize, row: &SqlRow) -> Self {
        Self {
            id: format!("sql:{index}"),
            document_id: None,
            chunk_index: None,
            content: row.content.clone(),
            source: Some(row.source.clone().unwrap_or_else(|| "sql".to_string())),
            is_web: false,
        }
    }

    fn from_web(chunk: &WebSearchChunk) -> Self {
        Self {
            id: web_source_id(&chunk.url),
            document_id: None,
            chunk_index: None,
            content: format!("{}\n{}", chunk.title, chunk.snippet),
            source: Some(chunk.url.clone()),
            is_web: true,
        }
    }

    fn document_label(&self) -> String {
        self.document_id.map(|d| d.to_string()).unwrap_or_else(|| self.id.clone())
    }

    fn to_citation(&self) -> Citation {
        Citation {
            document_id: self.document_id,
            source: self.source.clone(),
            chunk_index: self.chunk_index,
            citation_start: None,
            citation_end: None,
            is_web_source: self.is_web,
        }
    }
}

/// Ties every other component together behind one `run` call (§4.12).
pub struct Coordinator {
    registry: AgentRegistry,
}

impl Coordinator {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    /// Runs the full retrieve-grade-compose-verify loop for `message`,
    /// streaming every step through `sink`. Always emits exactly one `final`
    /// event before returning.
    pub async fn run(&self, message: &str, opts: CoordinatorOptions, sink: &mut dyn EventSink) {
        let decision = self
            .registry
            .classifier
            .classify(message, ClassifierOptions { use_rag: opts.use_rag, use_web: opts.use_web })
            .await;

        if !sink.send(PipelineEvent::AgentLog {
            role: AgentRole::Planner,
            message: format!(
                "route={:?} complexity={:?} targets=[{}]",
                decision.mode,
                decision.complexity,
                format_targets(&decision.targets)
            ),
            ts: now_ms(),
        }) {
            return;
        }

        if !self.registry.deterministic_mock {
            let key = response_cache_key(message, &opts);
            if let Some(cached) = self.registry.response_cache.get(&key) {
                self.replay_cached(sink, cached);
                return;
            }
        }

        if !opts.use_rag && !opts.use_web {
            let text = "RAG retrieval and web search are both disabled for this request; \
                        answering directly without evidence."
                .to_string();
            if !emit_tokens_chunked(sink, &text) {
                return;
            }
            self.finalize(sink, message, &opts, FinalPayload { text, verified: true, citations: Vec::new() });
            return;
        }

        if decision.mode == Mode::Direct {
            let text = format!("Direct mode: {message}");
            if !emit_tokens_chunked(sink, &text) {
                return;
            }
            self.finalize(sink, message, &opts, FinalPayload { text, verified: true, citations: Vec::new() });
            return;
        }

        let mut working_query = message.to_string();
        if self.registry.enable_query_rewriting {
            if let Some(outcome) = self.registry.classifier.maybe_rewrite(&working_query) {
                if !sink.send(PipelineEvent::AgentLog {
                    role: AgentRole::Planner,
                    message: format!("Rewriting query: {}", outcome.reason),
                    ts: now_ms(),
                }) {
                    return;
                }
                if !sink.send(PipelineEvent::Rewrite {
                    original: working_query.clone(),
                    rewritten: outcome.rewritten.clone(),
                    reason: outcome.reason.clone(),
                    ts: now_ms(),
                }) {
                    return;
                }
                spawn_rewrite_persist(
                    self.registry.rewrite_persister.clone(),
                    working_query.clone(),
                    outcome.rewritten.clone(),
                );
                working_query = outcome.rewritten;
            }
        }

        let total_passes = self.registry.max_verification_loops + 1;
        for pass in 0..total_passes {
            let is_last_pass = pass + 1 == total_passes;
            if !sink.send(PipelineEvent::AgentLog {
                role: AgentRole::Researcher,
                message: format!(
                    "Researching ({}), pass {}/{}",
                    composite_mode_label(&decision.targets, opts.use_web),
                    pass + 1,
                    total_passes
                ),
                ts: now_ms(),
            }) {
                return;
            }

            let web_requested = opts.use_web && decision.targets.contains(&Target::Web);
            let retrieval_key =
                retrieval_cache_key(&targets_as_str(&decision.targets), &working_query);

            let mut rag_candidates: Vec<RetrievedCandidate> = Vec::new();
            let mut query_embedding: Option<Vec<f32>> = None;
            let mut used_retrieval_cache = false;

            if !web_requested && !self.registry.deterministic_mock {
                if let Some(entry) = self.registry.retrieval_cache.get(&retrieval_key) {
                    rag_candidates = entry.candidates;
                    query_embedding = Some(entry.query_embedding);
                    used_retrieval_cache = true;
                }
            }

            let mut sql_rows: Vec<SqlRow> = Vec::new();

            if !used_retrieval_cache {
                if opts.use_rag && decision.targets.contains(&Target::Vector) {
                    match self.registry.retriever.retrieve(&working_query, opts.use_hybrid).await {
                        Ok(output) => {
                            rag_candidates = output.candidates;
                            query_embedding = Some(output.query_embedding);
                        }
                        Err(e) => {
                            warn!(error = %e, "hybrid retrieval failed; continuing without local evidence");
                        }
                    }
                }

                if opts.use_rag && decision.targets.contains(&Target::Sql) {
                    if let Some(sql_agent) = &self.registry.sql_agent {
                        match sql_agent.query(&working_query).await {
                            Ok(rows) => sql_rows = rows,
                            Err(e) => {
                                self.finalize(
                                    sink,
                                    message,
                                    &opts,
                                    FinalPayload {
                                        text: format!(
                                            "The structured-data sub-agent could not answer this \
                                             request: {e}"
                                        ),
                                        verified: false,
                                        citations: Vec::new(),
                                    },
                                );
                                return;
                            }
                        }
                    }
                }
            }

            let local_empty = rag_candidates.is_empty() && sql_rows.is_empty();
            let do_web = opts.use_web && (web_requested || local_empty);
            let mut web_chunks: Vec<WebSearchChunk> = Vec::new();

            if do_web && !self.registry.empty_result_throttle.is_throttled(&working_query) {
                if let Some(web) = &self.registry.web_search {
                    let outcome: StreamedOutcome = Arc::new(Mutex::new(None));
                    let mut progress = Box::pin(search_with_progress(
                        web,
                        working_query.clone(),
                        opts.web_max_results,
                        opts.allowed_domains.clone(),
                        outcome.clone(),
                    ));
                    use futures_util::StreamExt;
                    while let Some(stage) = progress.next().await {
                        if !sink.send(PipelineEvent::AgentLog {
                            role: AgentRole::Researcher,
                            message: web_progress_message(&stage),
                            ts: now_ms(),
                        }) {
                            return;
                        }
                    }

                    match outcome.lock().take() {
                        Some(Ok(response)) => {
                            if response.chunks.is_empty() {
                                self.registry.empty_result_throttle.record_empty(&working_query);
                            } else {
                                self.registry.empty_result_throttle.record_non_empty(&working_query);
                            }
                            if !sink.send(PipelineEvent::WebSearchMetadata {
                                query: response.metadata.query.clone(),
                                result_count: response.metadata.result_count,
                                ts: now_ms(),
                            }) {
                                return;
                            }
                            web_chunks = response.chunks;
                        }
                        Some(Err(e)) => {
                            warn!(event = "websearch.pass_failed", error = %e, "web search failed for this pass");
                        }
                        None => {}
                    }
                }
            }

            if !used_retrieval_cache && !web_requested && !self.registry.deterministic_mock {
                if let Some(embedding) = &query_embedding {
                    self.registry.retrieval_cache.set(
                        retrieval_key,
                        RetrievalCacheEntry {
                            candidates: rag_candidates.clone(),
                            query_embedding: embedding.clone(),
                        },
                    );
                }
            }

            let mut evidence: Vec<EvidenceItem> =
                rag_candidates.iter().map(EvidenceItem::from_candidate).collect();
            evidence.extend(sql_rows.iter().enumerate().map(|(i, r)| EvidenceItem::from_sql(i, r)));
            evidence.extend(web_chunks.iter().map(EvidenceItem::from_web));

            let grade_inputs: Vec<GradeInput> = evidence
                .iter()
                .map(|e| GradeInput { id: e.id.clone(), content: e.content.clone() })
                .collect();

            let grades = match self
                .registry
                .grader
                .grade(&self.registry.embedding_client, &working_query, &grade_inputs, query_embedding.as_deref())
                .await
            {
                Ok(g) => g,
                Err(e) => {
                    self.finalize(
                        sink,
                        message,
                        &opts,
                        FinalPayload {
                            text: format!("Grading the retrieved evidence failed: {e}"),
                            verified: false,
                            citations: Vec::new(),
                        },
                    );
                    return;
                }
            };

            let ids: Vec<String> = evidence.iter().map(|e| e.id.clone()).collect();
            let (high, medium, low) = grades.partition_by_grade(&ids);
            let grade_summary = GradeSummary { high: high.len(), medium: medium.len(), low: low.len() };

            let approved_ids: Vec<String> = if !high.is_empty() {
                high.iter().map(|s| s.to_string()).collect()
            } else if !medium.is_empty() {
                medium.iter().take(3).map(|s| s.to_string()).collect()
            } else if self.registry.allow_low_grade_fallback && !low.is_empty() {
                low.iter().take(3).map(|s| s.to_string()).collect()
            } else {
                Vec::new()
            };

            let approved: Vec<&EvidenceItem> = approved_ids
                .iter()
                .filter_map(|id| evidence.iter().find(|e| &e.id == id))
                .collect();

            if !approved.is_empty() {
                let citations: Vec<Citation> = approved.iter().map(|e| e.to_citation()).collect();
                if !sink.send(PipelineEvent::Citations { citations, ts: now_ms() }) {
                    return;
                }
            }

            if approved.is_empty() {
                let text = guidance::no_evidence_message(&grades, do_web);
                if !emit_tokens_chunked(sink, &text) {
                    return;
                }
                let verification = self.registry.verifier.verify(&text, &[]);
                if !sink.send(PipelineEvent::Verification {
                    is_valid: verification.is_valid,
                    grade_summary,
                    feedback: verification.feedback.clone(),
                    confidence: verification.confidence,
                    ts: now_ms(),
                }) {
                    return;
                }

                if verification.is_valid || is_last_pass {
                    self.finalize(
                        sink,
                        message,
                        &opts,
                        FinalPayload { text, verified: verification.is_valid, citations: Vec::new() },
                    );
                    return;
                }

                if !self.refine(sink, &mut working_query, &verification) {
                    return;
                }
                continue;
            }

            let (text, final_citations) = compose_answer(&approved);
            if !emit_tokens_chunked(sink, &text) {
                return;
            }

            let evidence_texts: Vec<String> = approved.iter().map(|e| e.content.clone()).collect();
            let verification = self.registry.verifier.verify(&text, &evidence_texts);
            if !sink.send(PipelineEvent::Verification {
                is_valid: verification.is_valid,
                grade_summary,
                feedback: verification.feedback.clone(),
                confidence: verification.confidence,
                ts: now_ms(),
            }) {
                return;
            }

            if verification.is_valid || is_last_pass {
                self.finalize(
                    sink,
                    message,
                    &opts,
                    FinalPayload { text, verified: verification.is_valid, citations: final_citations },
                );
                return;
            }

            if !sink.send(PipelineEvent::AgentLog {
                role: AgentRole::Critic,
                message: format!("Refining and retrying ({})", verification.feedback),
                ts: now_ms(),
            }) {
                return;
            }
            if !self.refine(sink, &mut working_query, &verification) {
                return;
            }
        }
    }

    /// Replays a cached [`FinalPayload`] as a fresh token stream plus a fresh
    /// `final` event (new timestamp, identical content). Stops short of the
    /// `final` event if the caller has already disconnected.
    fn replay_cached(&self, sink: &mut dyn EventSink, payload: FinalPayload) {
        if !emit_tokens_chunked(sink, &payload.text) {
            return;
        }
        let _ = sink.send(PipelineEvent::Final { payload, ts: now_ms() });
    }

    /// Caches (unless in deterministic-mock mode, or the answer is unverified
    /// and `cache_failures` is off) and emits the one `final` event for this
    /// call. `final` is always this call's last event, so a closed sink here
    /// has nothing left to stop.
    fn finalize(
        &self,
        sink: &mut dyn EventSink,
        message: &str,
        opts: &CoordinatorOptions,
        payload: FinalPayload,
    ) {
        if !self.registry.deterministic_mock && (payload.verified || self.registry.cache_failures) {
            let key = response_cache_key(message, opts);
            self.registry.response_cache.set(key, payload.clone());
        }
        let _ = sink.send(PipelineEvent::Final { payload, ts: now_ms() });
    }

    /// Refines `working_query` for another pass (§4.12 step l): a quality
    /// rewrite when verification confidence was very low, or a cheap
    /// disambiguation suffix otherwise. Returns `false` if the caller has
    /// disconnected, signalling the loop to stop rather than continue.
    fn refine(
        &self,
        sink: &mut dyn EventSink,
        working_query: &mut String,
        verification: &VerificationOutcome,
    ) -> bool {
        if verification.confidence < 0.5 {
            let outcome = crate::classifier::rewrite_for_quality(working_query);
            if !sink.send(PipelineEvent::Rewrite {
                original: working_query.clone(),
                rewritten: outcome.rewritten.clone(),
                reason: outcome.reason.clone(),
                ts: now_ms(),
            }) {
                return false;
            }
            spawn_rewrite_persist(
                self.registry.rewrite_persister.clone(),
                working_query.clone(),
                outcome.rewritten.clone(),
            );
            *working_query = outcome.rewritten;
        } else {
            *working_query = format!("{working_query} (focus: disambiguate terms)");
        }
        true
    }
}

/// Splits `text` into `EventSink`-sized `tokens` events of at most
/// [`DEFAULT_TOKEN_CHUNK_LEN`] characters each. Returns `false` as soon as
/// the sink reports the caller disconnected, so callers stop emitting
/// further events for this invocation.
fn emit_tokens_chunked(sink: &mut dyn EventSink, text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return sink.send(PipelineEvent::Tokens { text: String::new(), ts: now_ms() });
    }
    for chunk in chars.chunks(DEFAULT_TOKEN_CHUNK_LEN) {
        if !sink.send(PipelineEvent::Tokens { text: chunk.iter().collect(), ts: now_ms() }) {
            return false;
        }
    }
    true
}

/// Composes the final answer text from up to the first three approved
/// evidence items (§4.12 step i), returning the text alongside citations
/// whose offsets describe where each item landed in that text.
fn compose_answer(approved: &[&EvidenceItem]) -> (String, Vec<Citation>) {
    const SEPARATOR: &str = "\n\n---\n\n";
    let prefix = if approved[0].is_web { "" } else { "**Answer (from evidence):**\n\n" };

    let mut body = String::new();
    let mut citations = Vec::with_capacity(approved.len().min(3));
    let mut offset = prefix.chars().count();

    for (i, item) in approved.iter().take(3).enumerate() {
        if i > 0 {
            body.push_str(SEPARATOR);
            offset += SEPARATOR.chars().count();
        }

        let cleaned = compose::clean(&item.content);
        let truncated = compose::smart_truncate(&cleaned, compose::TRUNCATE_TARGET_LEN);
        let start = offset;
        let end = start + truncated.chars().count();
        offset = end;

        let label = compose::source_label(item.source.as_deref(), &item.document_label());
        let suffix = format!("\n\n*[Source: {label}]*");
        offset += suffix.chars().count();

        body.push_str(&truncated);
        body.push_str(&suffix);

        citations.push(Citation {
            document_id: item.document_id,
            source: item.source.clone(),
            chunk_index: item.chunk_index,
            citation_start: Some(start),
            citation_end: Some(end),
            is_web_source: item.is_web,
        });
    }

    (format!("{prefix}{body}"), citations)
}

fn format_targets(targets: &std::collections::HashSet<Target>) -> String {
    targets_as_str(targets).join(",")
}

fn targets_as_str(targets: &std::collections::HashSet<Target>) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = targets
        .iter()
        .map(|t| match t {
            Target::Vector => "vector",
            Target::Sql => "sql",
            Target::Web => "web",
        })
        .collect();
    out.sort_unstable();
    out
}

fn composite_mode_label(targets: &std::collections::HashSet<Target>, use_web: bool) -> String {
    let mut labels = targets_as_str(targets);
    if use_web && !labels.contains(&"web") {
        labels.push("web (fallback)");
    }
    if labels.is_empty() {
        "no sources".to_string()
    } else {
        labels.join("+")
    }
}

fn web_progress_message(stage: &WebSearchProgress) -> String {
    match stage {
        WebSearchProgress::InProgress => "Web search starting".to_string(),
        WebSearchProgress::Searching => "Web search in progress".to_string(),
        WebSearchProgress::Completed { result_count } => {
            format!("Web search completed with {result_count} results")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::embedding::{EmbeddingClient, EmbeddingClientConfig, Reranker};
    use crate::events::VecSink;
    use crate::keyword::KeywordAdapter;
    use crate::retrieval::HybridRetriever;
    use crate::scoring::{Grader, Verifier};
    use crate::vectordb::PrimaryStore;

    /// Builds a registry whose retriever is never called: `use_rag` and
    /// `use_web` are both false for these tests.
    fn minimal_classifier_registry() -> (AgentRegistry, Arc<EmbeddingClient>) {
        let embedding_client = Arc::new(EmbeddingClient::new(EmbeddingClientConfig::mock(8)));
        let reranker = Arc::new(Reranker::stub().unwrap());
        let keyword: Option<Arc<KeywordAdapter>> = None;
        let _ = &keyword;
        // HybridRetriever still requires a PrimaryStore; since these tests
        // never reach retrieval (guidance-only and direct-mode paths return
        // before any fan-out), we never dereference it, so an unconnected
        // pool is acceptable here.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction never connects");
        let primary = Arc::new(PrimaryStore::new(pool, 8));
        let retriever = Arc::new(HybridRetriever::new(
            primary,
            None,
            None,
            embedding_client.clone(),
            reranker,
            crate::retrieval::FusionWeights::default(),
            8,
        ));
        let classifier = Arc::new(Classifier::heuristic_only(false));
        let grader = Arc::new(Grader::default());
        let verifier = Arc::new(Verifier::default());

        let registry = AgentRegistry::new(
            classifier,
            retriever,
            grader,
            verifier,
            embedding_client.clone(),
            None,
            None,
            None,
            2,
            false,
            false,
            false,
            5_000,
            true,
        );
        (registry, embedding_client)
    }

    #[tokio::test]
    async fn guidance_only_path_emits_final_when_both_sources_disabled() {
        let (registry, _embedding) = minimal_classifier_registry();
        let coordinator = Coordinator::new(registry);
        let mut sink = VecSink::new();
        let opts = CoordinatorOptions { use_rag: false, use_web: false, ..CoordinatorOptions::default() };
        coordinator.run("what is the weather", opts, &mut sink).await;

        assert!(sink.events.iter().any(|e| matches!(e, PipelineEvent::Final { .. })));
        let finals: Vec<_> = sink
            .events
            .iter()
            .filter(|e| matches!(e, PipelineEvent::Final { .. }))
            .collect();
        assert_eq!(finals.len(), 1, "final must be emitted exactly once");
    }

    #[tokio::test]
    async fn direct_mode_short_greeting_emits_final_without_retrieval() {
        let (registry, _embedding) = minimal_classifier_registry();
        let coordinator = Coordinator::new(registry);
        let mut sink = VecSink::new();
        coordinator.run("hi", CoordinatorOptions::default(), &mut sink).await;

        let final_event = sink
            .events
            .iter()
            .find_map(|e| match e {
                PipelineEvent::Final { payload, .. } => Some(payload),
                _ => None,
            })
            .expect("final event present");
        assert!(final_event.text.contains("Direct mode"));
        assert!(final_event.verified);
    }

    /// A sink that reports the caller disconnected after `allowed` events.
    struct LimitedSink {
        events: Vec<PipelineEvent>,
        allowed: usize,
    }

    impl EventSink for LimitedSink {
        fn send(&mut self, event: PipelineEvent) -> bool {
            if self.events.len() >= self.allowed {
                return false;
            }
            self.events.push(event);
            true
        }
    }

    #[tokio::test]
    async fn stops_emitting_once_sink_reports_disconnect() {
        let (registry, _embedding) = minimal_classifier_registry();
        let coordinator = Coordinator::new(registry);
        let mut sink = LimitedSink { events: Vec::new(), allowed: 1 };
        let opts = CoordinatorOptions { use_rag: false, use_web: false, ..CoordinatorOptions::default() };
        coordinator.run("what is the weather", opts, &mut sink).await;

        // Only the planner `agent_log` (the first send) got through; the
        // coordinator must stop right there rather than emitting tokens or
        // a `final` event past the disconnect.
        assert_eq!(sink.events.len(), 1);
        assert!(!sink.events.iter().any(|e| matches!(e, PipelineEvent::Final { .. })));
    }

    #[test]
    fn compose_answer_prefixes_unless_first_approved_is_web() {
        let rag_item = EvidenceItem {
            id: "a".to_string(),
            document_id: None,
            chunk_index: None,
            content: "Evidence text.".to_string(),
            source: None,
            is_web: false,
        };
        let (text, citations) = compose_answer(&[&rag_item]);
        assert!(text.starts_with("**Answer (from evidence):**"));
        assert_eq!(citations.len(), 1);

        let web_item = EvidenceItem {
            id: "web:1".to_string(),
            document_id: None,
            chunk_index: None,
            content: "Evidence text.".to_string(),
            source: Some("https://example.com".to_string()),
            is_web: true,
        };
        let (text, _) = compose_answer(&[&web_item]);
        assert!(!text.starts_with("**Answer"));
    }

    #[test]
    fn emit_tokens_chunked_respects_max_length() {
        let mut sink = VecSink::new();
        let text = "x".repeat(150);
        assert!(emit_tokens_chunked(&mut sink, &text));
        assert_eq!(sink.events.len(), 3);
        for event in &sink.events {
            if let PipelineEvent::Tokens { text, .. } = event {
                assert!(text.chars().count() <= DEFAULT_TOKEN_CHUNK_LEN);
            }
        }
    }
}
