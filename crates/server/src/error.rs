//! Request-boundary error mapping
//!
//! Every handler failure funnels through [`ApiError`], which owns the
//! status code and the `{ success: false, error }` body shape. No partial
//! success: a request either returns 200 with the full result or fails
//! atomically with 400/429/500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API errors surfaced to the caller
#[derive(Debug)]
pub enum ApiError {
    /// Input validation failure (missing/unrecognized field) -> 400
    Validation(lead_scorer_core::Error),
    /// Too many requests in the window -> 429
    RateLimited,
    /// LLM or CRM call failed; the message embeds the collaborator's
    /// error text -> 500
    Collaborator(String),
    /// Anything unexpected -> generic 500, internals stay in the logs
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded, retry later".to_string(),
            ),
            ApiError::Collaborator(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

impl From<lead_scorer_core::Error> for ApiError {
    fn from(err: lead_scorer_core::Error) -> Self {
        ApiError::Validation(err)
    }
}
