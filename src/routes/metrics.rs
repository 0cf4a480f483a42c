//! Prometheus scrape endpoint.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension,
};
use http::header::CONTENT_TYPE;
use tracing::instrument;

use super::track_request;
use crate::error::{AppErrorResponse, ResultExt};
use crate::metrics::{Endpoint, METRICS_CONTENT_TYPE};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Serialize the registry in the text exposition format.
///
/// The count for this scrape is recorded before encoding, so it shows up in
/// its own output.
#[instrument(name = "metrics::metrics", skip(state, request_id))]
pub async fn metrics(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Response, AppErrorResponse> {
    track_request(&state, Endpoint::Metrics).await;

    let body = state.metrics.gather().with_request_id(&request_id)?;
    Ok(([(CONTENT_TYPE, METRICS_CONTENT_TYPE)], body).into_response())
}
