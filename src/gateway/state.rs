//! Shared application state handed to every axum handler.

use std::sync::Arc;

use crate::coordinator::Coordinator;

/// Cloneable handle to the process's single [`Coordinator`].
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self { coordinator }
    }
}
