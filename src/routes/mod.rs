//! HTTP route handlers.
//!
//! Each handler counts its own request, refreshes the robot identity and
//! writes it into the metrics registry before building a response. All
//! responses carry `Cache-Control: no-store` since they reflect live state.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod metrics;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::metrics::Endpoint;
use crate::middleware::request_id_layer;
use crate::robot::RobotIdentity;
use crate::state::AppState;

/// Count a request for `endpoint`, then refresh the identity series.
///
/// Returns the identity that was written, for handlers that display it.
pub async fn track_request(state: &AppState, endpoint: Endpoint) -> RobotIdentity {
    state.metrics.record_request(endpoint, state.robot.id());

    let identity = state.robot.identity().await;
    state.metrics.update(&identity);

    tracing::debug!(
        endpoint = endpoint.as_str(),
        version = %identity.version,
        version_source = identity.version_source.as_str(),
        status = %identity.status,
        "Robot identity refreshed"
    );

    identity
}

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics::metrics))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        .with_state(state.clone())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn_with_state(state, request_id_layer))
}
