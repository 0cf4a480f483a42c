//! robot-status: identity, health and Prometheus metrics for one robot.
//!
//! Serves three routes: a status page (`/`), a liveness probe (`/health`) and
//! a scrape endpoint (`/metrics`). Version and container status are resolved
//! on every request and written into a process-wide metrics registry.

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod robot;
pub mod routes;
pub mod state;
pub mod templates;

pub use routes::create_router;
pub use state::AppState;
