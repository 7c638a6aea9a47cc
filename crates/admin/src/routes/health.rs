//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness: the process is up.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: the document store answers and the menu mirrors are fresh.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if let Err(e) = state.documents().health_check().await {
        tracing::warn!(error = %e, "Readiness check failed");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    if state.dishes().stale || state.categories().stale {
        tracing::warn!("Readiness check failed: menu sync is stale");
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}
