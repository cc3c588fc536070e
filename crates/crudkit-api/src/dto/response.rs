//! Response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crudkit_service::ServiceResult;

use crate::localization::Localizer;

/// Standard response wrapper for service results.
///
/// `message` is already localized, so the envelope middleware leaves these
/// bodies alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// HTTP status code.
    pub status: u16,
    /// Whether `status` is in the 2xx range.
    pub success: bool,
    /// Localized status text.
    pub message: String,
    /// Detail for failed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Payload; empty for failed requests.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a service result, localizing its status text.
    pub fn from_result(result: ServiceResult<T>, localizer: &dyn Localizer, language: &str) -> Self {
        let status = result.outcome.status_code();
        Self {
            status,
            success: (200..=299).contains(&status),
            message: localizer.message(status, language),
            detail: result.message,
            data: result.data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Server version.
    pub version: String,
    /// Active store backend.
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::CatalogLocalizer;
    use crudkit_service::Outcome;

    #[test]
    fn test_from_failure() {
        let result: ServiceResult<Vec<u8>> = ServiceResult::failure(Outcome::NotFound, "no rows");
        let envelope = Envelope::from_result(result, &CatalogLocalizer::default(), "en");
        assert_eq!(envelope.status, 404);
        assert!(!envelope.success);
        assert_eq!(envelope.message, "The requested resource was not found");
        assert_eq!(envelope.detail.as_deref(), Some("no rows"));
    }

    #[test]
    fn test_into_response_uses_status() {
        let envelope = Envelope::from_result(
            ServiceResult::ok(vec![1u8]),
            &CatalogLocalizer::default(),
            "en",
        );
        assert!(envelope.success);
        assert_eq!(envelope.into_response().status(), StatusCode::OK);
    }
}
