//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it answers `{"status": "healthy"}` whenever the process can
//! serve HTTP, whatever the container status resolves to. The request still
//! counts and refreshes the identity metrics.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use super::track_request;
use crate::metrics::Endpoint;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[instrument(name = "health::health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    track_request(&state, Endpoint::Health).await;
    Json(HealthResponse { status: "healthy" })
}
