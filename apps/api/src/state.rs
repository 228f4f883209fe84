use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    /// Model client. `GeminiClient` in production, scripted in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
