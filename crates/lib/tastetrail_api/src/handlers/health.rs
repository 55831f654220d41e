//! Liveness and storage mode report.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health` — always `ok`; tells clients whether data is ephemeral.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = state.store.mode();
    Json(HealthResponse {
        status: "ok",
        demo_mode: mode.is_ephemeral(),
        mode,
    })
}
