use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthStatus};

/// Liveness probe.
///
/// # Endpoint
/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    }))
}
