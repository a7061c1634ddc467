pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/competence-files", post(handlers::handle_generate))
        .route(
            "/api/v1/competence-files/:id/preview",
            get(handlers::handle_preview),
        )
        .with_state(state)
}
