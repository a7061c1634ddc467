use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;

/// Fixed explanation returned when every enrichment task failed.
pub const ENRICHMENT_FAILED_MESSAGE: &str = "AI enrichment failed for every section. \
    No document was generated because it would contain no AI-enhanced content. \
    Retry the request or supply the section content directly.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or unusable configuration on a path that needs it. Surfaced verbatim.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Zero enrichment tasks succeeded.
    #[error("Enrichment failed: {detail}")]
    EnrichmentFailed { detail: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "The request is invalid".to_string(),
                Some(msg.clone()),
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                    None,
                )
            }
            AppError::EnrichmentFailed { detail } => {
                tracing::error!("Enrichment failed: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ENRICHMENT_FAILED",
                    ENRICHMENT_FAILED_MESSAGE.to_string(),
                    Some(detail.clone()),
                )
            }
            AppError::RateLimited(msg) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many generation requests, try again shortly".to_string(),
                Some(msg.clone()),
            ),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A storage error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = self.parts();

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
                "detail": detail,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_surfaces_message_verbatim() {
        let err = AppError::Configuration("ANTHROPIC_API_KEY is not set".to_string());
        let (status, code, message, _) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "CONFIGURATION_ERROR");
        assert_eq!(message, "ANTHROPIC_API_KEY is not set");
    }

    #[test]
    fn test_enrichment_failure_uses_fixed_message_with_detail() {
        let err = AppError::EnrichmentFailed {
            detail: "summary: timed out".to_string(),
        };
        let (status, code, message, detail) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "ENRICHMENT_FAILED");
        assert_eq!(message, ENRICHMENT_FAILED_MESSAGE);
        assert_eq!(detail.as_deref(), Some("summary: timed out"));
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let (status, code, _, detail) = AppError::Validation("name missing".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(detail.as_deref(), Some("name missing"));
    }

    #[test]
    fn test_rate_limited_is_429() {
        let (status, _, _, _) = AppError::RateLimited("key".into()).parts();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
