use std::sync::Arc;

use crate::config::Config;
use crate::corpus::JobCorpus;
use crate::llm_client::GenerationBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only afterwards.
    pub corpus: Arc<JobCorpus>,
    /// Pluggable generation backend. Default: OllamaClient.
    pub generator: Arc<dyn GenerationBackend>,
    pub config: Config,
}
