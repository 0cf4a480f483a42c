//! Prometheus metrics for the robot.
//!
//! One registry per process, owned by [`RobotMetrics`] and shared through
//! `AppState`. Four series are exposed:
//! - `robot_info{robot_id, version, status}` fixed at 1
//! - `robot_version{robot_id, version}` fixed at 1
//! - `robot_health_status{robot_id}` 1 when healthy, else 0
//! - `robot_requests_total{endpoint, robot_id}` per-endpoint request count
//!
//! Label sets left behind by an earlier version or status keep their last
//! value; each write only touches the current label set.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::robot::RobotIdentity;

/// Content type of the text exposition format (`text/plain; version=0.0.4`).
pub const METRICS_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Endpoint label values, kept to a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Health,
    Metrics,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Index => "index",
            Endpoint::Health => "health",
            Endpoint::Metrics => "metrics",
        }
    }
}

#[derive(Clone)]
pub struct RobotMetrics {
    registry: Arc<Registry>,
    info: IntGaugeVec,
    health_status: IntGaugeVec,
    requests_total: IntCounterVec,
    version: IntGaugeVec,
}

impl RobotMetrics {
    /// Create the metric families and register them with a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let info = IntGaugeVec::new(
            Opts::new("robot_info", "Robot information"),
            &["robot_id", "version", "status"],
        )?;
        let health_status = IntGaugeVec::new(
            Opts::new(
                "robot_health_status",
                "Robot health status (1=healthy, 0=unhealthy)",
            ),
            &["robot_id"],
        )?;
        let requests_total = IntCounterVec::new(
            Opts::new("robot_requests_total", "Total HTTP requests"),
            &["endpoint", "robot_id"],
        )?;
        let version = IntGaugeVec::new(
            Opts::new("robot_version", "Robot version information"),
            &["robot_id", "version"],
        )?;

        registry.register(Box::new(info.clone()))?;
        registry.register(Box::new(health_status.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(version.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            info,
            health_status,
            requests_total,
            version,
        })
    }

    /// Count one request against `endpoint`.
    pub fn record_request(&self, endpoint: Endpoint, robot_id: &str) {
        self.requests_total
            .with_label_values(&[endpoint.as_str(), robot_id])
            .inc();
    }

    /// Write the current identity into the info, version and health series.
    pub fn update(&self, identity: &RobotIdentity) {
        let id = identity.id.as_str();
        let version = identity.version.as_str();

        self.info
            .with_label_values(&[id, version, identity.status.as_str()])
            .set(1);
        self.version.with_label_values(&[id, version]).set(1);
        self.health_status
            .with_label_values(&[id])
            .set(identity.status.gauge_value());
    }

    pub fn request_count(&self, endpoint: Endpoint, robot_id: &str) -> u64 {
        self.requests_total
            .with_label_values(&[endpoint.as_str(), robot_id])
            .get()
    }

    pub fn health_value(&self, robot_id: &str) -> i64 {
        self.health_status.with_label_values(&[robot_id]).get()
    }

    /// Encode every registered family in the text exposition format.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            tracing::error!(error = %e, "Prometheus encoder produced invalid UTF-8");
            prometheus::Error::Msg(format!("metrics output is not valid UTF-8: {}", e))
        })
    }
}
