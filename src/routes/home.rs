//! Status page handler.

use axum::{extract::State, response::Html, Extension};
use chrono::Utc;
use tracing::instrument;

use super::track_request;
use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::metrics::Endpoint;
use crate::middleware::RequestId;
use crate::state::AppState;

/// Human-readable page showing the robot's id, version and status.
#[instrument(name = "home::index", skip(state, request_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let identity = track_request(&state, Endpoint::Index).await;

    let mut context = tera::Context::new();
    context.insert("robot", &identity);
    context.insert("healthy", &identity.is_healthy());
    context.insert(
        "checked_at",
        &Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    let html = state
        .tera
        .render("index.html", &context)
        .map_err(AppError::from)
        .with_request_id(&request_id)?;
    Ok(Html(html))
}
