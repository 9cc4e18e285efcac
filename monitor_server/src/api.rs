//! HTTP API and static dashboard hosting.

use std::path::Path;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use monitor_common::{RawReading, READINGS_PATH, STATUS_PATH};
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

use crate::state::StateHandle;

#[derive(Clone)]
pub struct ApiState {
    pub state: StateHandle,
}

/// Build the router. Paths outside the API are served from `static_dir`,
/// with `index.html` as the fallback for the single page app.
pub fn build_router(state: StateHandle, static_dir: &Path) -> Router {
    let dashboard = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(STATUS_PATH, get(status_handler))
        .route(READINGS_PATH, post(readings_handler))
        .route("/health", get(health_handler))
        .fallback_service(dashboard)
        .with_state(ApiState { state })
}

/// Current stabilised weight.
async fn status_handler(State(api): State<ApiState>) -> impl IntoResponse {
    let state = api.state.read().await;
    Json(state.status())
}

/// Raw reading from the digit detector.
async fn readings_handler(
    State(api): State<ApiState>,
    Json(raw): Json<RawReading>,
) -> impl IntoResponse {
    let mut state = api.state.write().await;
    let status = state.ingest(raw.value);
    debug!("Raw reading {:?} -> displayed {}", raw.value, status.gewicht);
    Json(status)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
