//! HTTP/SSE gateway (§6 "external interfaces"). Thin transport plumbing
//! around [`crate::coordinator::Coordinator`]: request routing and SSE
//! framing are explicitly out of scope for the pipeline itself (spec.md §1),
//! but the process still needs a surface to drive it from, so this module
//! wires one up the way the teacher's server crate wires up its own.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;
pub mod streaming;

use axum::{Router, routing::{get, post}};
use tower_http::trace::TraceLayer;

pub use handler::query_handler;
pub use state::AppState;

/// Builds the application router: `/healthz`, `/ready`, and `POST /v1/query`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handler::health_handler))
        .route("/ready", get(handler::ready_handler))
        .route("/v1/query", post(handler::query_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
