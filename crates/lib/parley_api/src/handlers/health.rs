//! Health endpoint.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health`: version and store connectivity.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_connected = state.chat.store_reachable().await;
    if !db_connected {
        warn!("health check: store unreachable");
    }

    Json(HealthResponse {
        status: if db_connected { "ok" } else { "degraded" }.to_string(),
        version: parley_core::version().to_string(),
        db_connected,
        model: state.config.llm.model.clone(),
    })
}
