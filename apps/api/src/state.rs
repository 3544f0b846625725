use std::sync::Arc;

use crate::generation::CaseMap;
use crate::llm_client::ModelBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Ollama in production, a fake in tests.
    pub backend: Arc<dyn ModelBackend>,
    /// Used when a request does not name a model.
    pub default_model: String,
    /// Canned result served by `POST /test/`.
    pub example: Arc<CaseMap>,
}
