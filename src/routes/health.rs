//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    /// Configured graph database extension root
    pub backend: String,
    /// Configured remote repository raw root
    pub remote: String,
}

/// Liveness only; neither upstream is contacted
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: env!("CARGO_PKG_NAME"),
        backend: config.backend.base_url.clone(),
        remote: config.remote.raw_base_url.clone(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
