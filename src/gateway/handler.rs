//! Request/response handlers for the query and health endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::coordinator::CoordinatorOptions;
use crate::events::EventSink;

use super::error::GatewayError;
use super::state::AppState;
use super::streaming::{ChannelSink, stream_coordinator_run};

/// Caller-supplied query request body (§6 external interface).
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub message: String,
    #[serde(default = "default_true")]
    pub use_rag: bool,
    #[serde(default = "default_true")]
    pub use_hybrid: bool,
    #[serde(default)]
    pub use_web: bool,
    #[serde(default)]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default)]
    pub web_max_results: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl From<&QueryRequest> for CoordinatorOptions {
    fn from(req: &QueryRequest) -> Self {
        Self {
            use_rag: req.use_rag,
            use_hybrid: req.use_hybrid,
            use_web: req.use_web,
            allowed_domains: req.allowed_domains.clone(),
            web_max_results: req.web_max_results,
        }
    }
}

/// Streams one coordinator run as Server-Sent Events (§6).
#[instrument(skip(state, request), fields(message_len = request.message.len()))]
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if request.message.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "`message` must not be empty".to_string(),
        ));
    }

    let opts = CoordinatorOptions::from(&request);
    let coordinator = state.coordinator.clone();
    let message = request.message;

    let sse = stream_coordinator_run(move |mut sink: ChannelSink| async move {
        coordinator.run(&message, opts, &mut sink as &mut dyn EventSink).await;
    });

    Ok(sse)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
}

#[instrument(skip(_state))]
pub async fn ready_handler(State(_state): State<AppState>) -> Response {
    (StatusCode::OK, Json(ReadyResponse { status: "ok" })).into_response()
}
