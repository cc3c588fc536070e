//! Maps domain `AppError` to HTTP responses.
//!
//! Error bodies carry the status code in `message`; the envelope
//! middleware replaces it with localized text on the way out.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crudkit_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Status code, rewritten to text by the envelope.
    pub message: u16,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::UnsupportedOperator | ErrorKind::Mapping => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Persistence
        | ErrorKind::Database
        | ErrorKind::Internal
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        let detail = if status.is_server_error() {
            tracing::error!(kind = %self.kind, error = %self.message, "Internal server error");
            None
        } else {
            Some(self.message)
        };

        let body = ApiErrorResponse {
            error: self.kind.to_string(),
            message: status.as_u16(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_client_errors() {
        assert_eq!(status_for(ErrorKind::UnsupportedOperator), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Persistence), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::validation("bad page").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
