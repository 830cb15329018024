use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Completion provider. `GeminiClient` in production, a stub in tests.
    pub llm: Arc<dyn TextProvider>,
    pub config: Config,
}
