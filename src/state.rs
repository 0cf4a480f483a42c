//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::metrics::RobotMetrics;
use crate::robot::Robot;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the Tera engine, the identity resolvers and the process-wide metrics
/// registry. Built once in `main` and handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub tera: Arc<Tera>,
    pub robot: Robot,
    pub metrics: RobotMetrics,
}

impl AppState {
    pub fn new(config: &AppConfig, tera: Tera, metrics: RobotMetrics) -> Self {
        Self {
            tera: Arc::new(tera),
            robot: Robot::new(config),
            metrics,
        }
    }
}
