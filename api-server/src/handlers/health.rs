//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use agromind_core::constants::APP_NAME;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    crop_model_loaded: bool,
    vision_model_loaded: bool,
    timestamp: i64,
}

/// Liveness plus a cheap model summary; never triggers a load
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.engine.registry();
    Json(HealthResponse {
        status: "healthy",
        service: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
        crop_model_loaded: registry.status(),
        vision_model_loaded: registry.vision_status(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
