use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend behind the trait seam. Production: `OpenAiClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Shared HTTP client for remote spreadsheet fetches.
    pub http: reqwest::Client,
}
