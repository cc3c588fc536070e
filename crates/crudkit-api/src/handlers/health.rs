//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = match &state.db {
        Some(db) => match db.health_check().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        },
        None => true,
    };

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.to_string(),
    })
}
