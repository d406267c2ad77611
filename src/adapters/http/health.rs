//! Health Checks - Liveness and Readiness Probes
//!
//! `/live` answers while the process runs. `/ready` answers 200 only
//! when the record store responds to a probe query, so orchestrators
//! stop routing traffic while the store is unreachable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;

/// Liveness probe: always returns 200 if the process is running.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: returns 200 only if the record store is healthy.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.store.is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        warn!("Readiness probe failed: record store unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}
