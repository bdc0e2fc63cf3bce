//! Lantern HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use lantern::config::Config;
use lantern::coordinator::registry::{PrimaryRewritePersister, RewritePersister};
use lantern::coordinator::{AgentRegistry, Coordinator};
use lantern::embedding::{EmbeddingClient, EmbeddingClientConfig, Reranker, RerankerConfig};
use lantern::gateway::{AppState, create_router};
use lantern::keyword::KeywordAdapter;
use lantern::reconcile::{DEFAULT_INTERVAL, Reconciler};
use lantern::retrieval::{FusionWeights, HybridRetriever};
use lantern::scoring::{Grader, Verifier};
use lantern::sqlagent::SqlSubAgent;
use lantern::vectordb::{PrimaryStore, SecondaryStore, DEFAULT_COLLECTION_NAME};
use lantern::websearch::{HttpWebSearchProvider, WebSearchClient};
use lantern::classifier::Classifier;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "lantern starting"
    );

    let primary = Arc::new(PrimaryStore::connect(&config.postgres_url, config.embedding_dimensions).await?);

    let secondary = if config.use_dual_vector_store {
        let store = SecondaryStore::connect(
            &config.qdrant_url,
            DEFAULT_COLLECTION_NAME,
            config.embedding_dimensions,
        )
        .await?;
        store.ensure_collection().await?;
        Some(Arc::new(store))
    } else {
        None
    };

    let embedding_client = Arc::new(EmbeddingClient::new(EmbeddingClientConfig::mock(
        config.embedding_dimensions,
    )));

    let reranker_config = match &config.reranker_path {
        Some(path) => RerankerConfig::new(path.clone()),
        None => {
            tracing::warn!("no reranker path configured, running reranker in stub mode");
            RerankerConfig::stub()
        }
    };
    let reranker = Arc::new(Reranker::load(reranker_config)?);

    let keyword_adapter = if config.use_dual_vector_store {
        Some(Arc::new(KeywordAdapter::new(primary.pool().clone())))
    } else {
        None
    };

    let retriever = Arc::new(HybridRetriever::new(
        primary.clone(),
        secondary.clone(),
        keyword_adapter,
        embedding_client.clone(),
        reranker,
        FusionWeights {
            vector: config.hybrid_vector_weight,
            keyword: config.hybrid_keyword_weight,
        },
        config.rag_top_k,
    ));

    let grader = Arc::new(Grader::new(
        config.grade_high_threshold,
        config.grade_medium_threshold,
        config.use_semantic_grading,
    ));
    let verifier = Arc::new(Verifier::new(
        config.verification_threshold,
        config.min_technical_term_length,
    ));

    let classifier = Arc::new(Classifier::heuristic_only(config.enable_query_rewriting));

    let web_search = build_web_search_client(&config);
    let sql_agent: Option<Arc<dyn SqlSubAgent>> = None;
    let rewrite_persister: Option<Arc<dyn RewritePersister>> =
        Some(Arc::new(PrimaryRewritePersister::new(primary.clone())));

    let registry = AgentRegistry::new(
        classifier,
        retriever,
        grader,
        verifier,
        embedding_client.clone(),
        web_search,
        sql_agent,
        rewrite_persister,
        config.max_verification_loops,
        config.allow_low_grade_fallback,
        config.cache_failures,
        config.enable_query_rewriting,
        config.web_search_failure_throttle_base_ms,
        false,
    );

    let coordinator = Arc::new(Coordinator::new(registry));

    if let Some(secondary) = secondary.clone() {
        let reconciler = Arc::new(Reconciler::new(primary.clone(), secondary));
        tokio::spawn(async move {
            reconciler.run_forever(DEFAULT_INTERVAL).await;
        });
    }

    let state = AppState::new(coordinator);
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lantern shutdown complete");
    Ok(())
}

fn build_web_search_client(config: &Config) -> Option<Arc<WebSearchClient>> {
    let endpoint = std::env::var("WEB_SEARCH_ENDPOINT").ok()?;
    let api_key = std::env::var("WEB_SEARCH_API_KEY").ok();
    let provider = Arc::new(HttpWebSearchProvider::new(endpoint, api_key));
    Some(Arc::new(WebSearchClient::new(
        provider,
        config.web_search_concurrent_requests,
        config.web_search_failure_throttle_base_ms,
        config.web_search_context_size,
        config.web_search_location.clone(),
        config.web_search_allowlist.clone(),
    )))
}

fn run_health_check() -> i32 {
    let port = std::env::var("LANTERN_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}
