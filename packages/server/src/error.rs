//! API error type and the status-code mapping for core error kinds.
//!
//! This is the single place core errors are logged; the pipeline itself
//! never logs-and-rethrows.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use knowledge::{CrawlError, KnowledgeError};

/// Error returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself was invalid
    BadRequest(String),

    /// A core operation failed
    Knowledge(KnowledgeError),
}

impl From<KnowledgeError> for ApiError {
    fn from(error: KnowledgeError) -> Self {
        Self::Knowledge(error)
    }
}

impl From<CrawlError> for ApiError {
    fn from(error: CrawlError) -> Self {
        Self::Knowledge(KnowledgeError::Crawl(error))
    }
}

/// Map a core error to its user-facing status code.
pub fn status_for(error: &KnowledgeError) -> StatusCode {
    match error {
        KnowledgeError::Transport(_)
        | KnowledgeError::MalformedResponse { .. }
        | KnowledgeError::SchemaViolation { .. }
        | KnowledgeError::Embedding(_) => StatusCode::BAD_GATEWAY,
        KnowledgeError::DegenerateVector { .. } => StatusCode::BAD_REQUEST,
        KnowledgeError::Crawl(crawl) => match crawl {
            CrawlError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            CrawlError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CrawlError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CrawlError::EmptyContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CrawlError::Http(_) | CrawlError::Status { .. } => StatusCode::BAD_GATEWAY,
        },
        KnowledgeError::Storage(_) | KnowledgeError::Json(_) | KnowledgeError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::BadRequest(reason) => {
                tracing::warn!(reason = %reason, "bad request");
                (StatusCode::BAD_REQUEST, reason.clone())
            }
            ApiError::Knowledge(error) => {
                // MalformedResponse carries both texts; this boundary is
                // where they get logged
                if let KnowledgeError::MalformedResponse { original, repaired } = error {
                    tracing::error!(
                        original = %original,
                        repaired = %repaired,
                        "model response unparseable after repair"
                    );
                } else {
                    tracing::error!(error = %error, "request failed");
                }
                (status_for(error), error.to_string())
            }
        };

        (status, Json(json!({ "error": detail }))).into_response()
    }
}
