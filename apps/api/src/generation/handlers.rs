//! Axum route handlers for the Competence File API.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::pipeline::{validate, GenerateRequest, GenerateResponse};
use crate::rate_limit::{candidate_key, enforce};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/competence-files
///
/// Generates a competence file for the candidate and returns the stored artifact.
/// The artifact may be markup rather than PDF when rendering failed; `format` says which.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    // Malformed requests never count against the caller's quota.
    validate(&request)?;
    enforce(state.rate_limiter.as_ref(), &candidate_key(&request.candidate)).await?;

    let response = state.pipeline.generate(request).await?;
    info!(
        "Generated {} ({}, enriched={})",
        response.filename,
        response.format.as_str(),
        response.enriched
    );
    Ok(Json(response))
}

/// GET /api/v1/competence-files/:id/preview
///
/// Re-composes a stored document as markup with a preview banner.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let html = state.pipeline.preview(document_id).await?;
    Ok(Html(html))
}
