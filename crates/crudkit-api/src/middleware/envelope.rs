//! Response envelope middleware.
//!
//! Handlers and error mappers may emit a JSON object whose `message` is a
//! numeric status code. `404` and `404.0` both count; `404.5` does not. This middleware buffers every response body and,
//! for such objects, replaces `message` with localized text and adds
//! `status` and `success`. A code outside 2xx also becomes the transport
//! status. Any other body passes through byte for byte.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;
use tracing::error;

use crate::localization::Localizer;

/// State for [`rewrite_envelope`].
#[derive(Debug, Clone)]
pub struct EnvelopeSettings {
    /// Status text source.
    pub localizer: Arc<dyn Localizer>,
    /// Largest body that will be buffered.
    pub max_body_bytes: usize,
}

/// Rewrites `{"message": <code>, ...}` bodies into the standard envelope.
///
/// A body that cannot be buffered yields a bare 500.
pub async fn rewrite_envelope(
    State(settings): State<EnvelopeSettings>,
    request: Request,
    next: Next,
) -> Response {
    let language = settings.localizer.negotiate(request.headers());
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, settings.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some((code, rewritten)) = rewrite_body(&bytes, settings.localizer.as_ref(), &language)
    else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if !(200..=299).contains(&code) {
        if let Ok(status) = StatusCode::from_u16(code) {
            parts.status = status;
        }
    }
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(rewritten))
}

/// Rewrite a body if it is a JSON object with an integral numeric `message`.
///
/// Returns the code and the new body, or `None` to leave the body as is.
pub fn rewrite_body(bytes: &[u8], localizer: &dyn Localizer, language: &str) -> Option<(u16, Bytes)> {
    if bytes.is_empty() {
        return None;
    }

    let mut value: Value = serde_json::from_slice(bytes).ok()?;
    let object = value.as_object_mut()?;
    let code = match object.get("message")? {
        Value::Number(n) => status_code(n)?,
        _ => return None,
    };

    object.insert(
        "message".to_string(),
        Value::String(localizer.message(code, language)),
    );
    object.insert("status".to_string(), Value::from(code));
    object.insert(
        "success".to_string(),
        Value::Bool((200..=299).contains(&code)),
    );

    serde_json::to_vec(&value)
        .ok()
        .map(|body| (code, Bytes::from(body)))
}

fn status_code(n: &serde_json::Number) -> Option<u16> {
    let code = n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(f))
            .map(|f| f as u64)
    })?;
    u16::try_from(code).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::CatalogLocalizer;
    use axum::Router;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use serde_json::json;
    use tower::ServiceExt;

    fn settings(max_body_bytes: usize) -> EnvelopeSettings {
        EnvelopeSettings {
            localizer: Arc::new(CatalogLocalizer::default()),
            max_body_bytes,
        }
    }

    fn app(max_body_bytes: usize) -> Router {
        Router::new()
            .route("/missing", get(|| async { axum::Json(json!({ "message": 404 })) }))
            .route(
                "/ok",
                get(|| async { axum::Json(json!({ "message": 200, "data": [1, 2] })) }),
            )
            .route("/plain", get(|| async { r#"{"name":"Pikachu"}"# }))
            .route("/broken", get(|| async { "{not json" }))
            .layer(from_fn_with_state(settings(max_body_bytes), rewrite_envelope))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    #[test]
    fn test_rewrite_body_requires_integer_message() {
        let l = CatalogLocalizer::default();
        assert!(rewrite_body(br#"{"message":"hello"}"#, &l, "en").is_none());
        assert!(rewrite_body(br#"{"message":4.5}"#, &l, "en").is_none());
        assert!(rewrite_body(br#"[1,2]"#, &l, "en").is_none());
        assert!(rewrite_body(b"", &l, "en").is_none());
        assert!(rewrite_body(br#"{"message":70000}"#, &l, "en").is_none());
    }

    #[test]
    fn test_rewrite_body_accepts_integral_float() {
        let l = CatalogLocalizer::default();
        let (code, body) = rewrite_body(br#"{"message":404.0}"#, &l, "en").unwrap();
        assert_eq!(code, 404);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], Value::from(404));
        assert_eq!(value["success"], Value::Bool(false));
    }

    #[tokio::test]
    async fn test_error_code_overrides_status() {
        let (status, body) = call(app(1024), "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "The requested resource was not found",
                "status": 404,
                "success": false
            })
        );
    }

    #[tokio::test]
    async fn test_success_code_keeps_other_fields() {
        let (status, body) = call(app(1024), "/ok").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([1, 2]));
    }

    #[tokio::test]
    async fn test_other_bodies_pass_through() {
        let (status, body) = call(app(1024), "/plain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"name":"Pikachu"}"#);

        let (_, body) = call(app(1024), "/broken").await;
        assert_eq!(&body[..], b"{not json");
    }

    #[tokio::test]
    async fn test_oversized_body_is_bare_500() {
        let (status, body) = call(app(4), "/plain").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }
}
