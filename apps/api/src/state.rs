use std::sync::Arc;

use crate::generation::pipeline::DocumentPipeline;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DocumentPipeline>,
    /// Consulted by the generate handler only.
    pub rate_limiter: Arc<dyn RateLimiter>,
}
