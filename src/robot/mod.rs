//! Robot identity: who this instance is, what version it runs and whether it
//! is healthy.
//!
//! The id is fixed at startup from configuration. Version and status are
//! derived again on every request through [`VersionResolver`] and
//! [`StatusResolver`]; neither ever fails, they degrade to fallback values.

pub mod status;
pub mod version;

use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;

pub use status::{ContainerStatus, StatusResolver};
pub use version::{InspectError, ResolvedVersion, VersionResolver, VersionSource};

/// Snapshot of the robot's identity, computed for a single request.
#[derive(Debug, Clone, Serialize)]
pub struct RobotIdentity {
    pub id: String,
    pub version: String,
    pub version_source: VersionSource,
    pub status: ContainerStatus,
}

impl RobotIdentity {
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Resolves [`RobotIdentity`] snapshots. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Robot {
    id: Arc<str>,
    version: VersionResolver,
    status: StatusResolver,
}

impl Robot {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            id: Arc::from(config.robot.id.as_str()),
            version: VersionResolver::new(&config.inspect, &config.robot),
            status: StatusResolver::new(&config.health.marker_path),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Compute a fresh identity snapshot.
    pub async fn identity(&self) -> RobotIdentity {
        let (resolved, status) = tokio::join!(self.version.resolve(), self.status.resolve());

        RobotIdentity {
            id: self.id.to_string(),
            version: resolved.version,
            version_source: resolved.source,
            status,
        }
    }
}
