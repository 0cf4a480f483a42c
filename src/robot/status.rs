//! Container health status from a filesystem marker.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerStatus {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Running (not containerized)")]
    NotContainerized,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ContainerStatus {
    /// Map the outcome of the marker check to a status.
    pub fn from_marker_check(check: io::Result<bool>) -> Self {
        match check {
            Ok(true) => ContainerStatus::Healthy,
            Ok(false) => ContainerStatus::NotContainerized,
            Err(_) => ContainerStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Healthy => "Healthy",
            ContainerStatus::NotContainerized => "Running (not containerized)",
            ContainerStatus::Unknown => "Unknown",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ContainerStatus::Healthy)
    }

    /// Value of the numeric health gauge.
    pub fn gauge_value(&self) -> i64 {
        if self.is_healthy() {
            1
        } else {
            0
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks for the containerization marker on every call.
#[derive(Debug, Clone)]
pub struct StatusResolver {
    marker: PathBuf,
}

impl StatusResolver {
    pub fn new(marker: impl AsRef<Path>) -> Self {
        Self {
            marker: marker.as_ref().to_path_buf(),
        }
    }

    /// Resolve the current status. Never fails.
    pub async fn resolve(&self) -> ContainerStatus {
        let check = tokio::fs::try_exists(&self.marker).await;
        if let Err(e) = &check {
            tracing::debug!(error = %e, marker = %self.marker.display(), "Container marker check failed");
        }
        ContainerStatus::from_marker_check(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(ContainerStatus::Healthy.to_string(), "Healthy");
        assert_eq!(
            ContainerStatus::NotContainerized.to_string(),
            "Running (not containerized)"
        );
        assert_eq!(ContainerStatus::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_check_error_is_unknown() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let status = ContainerStatus::from_marker_check(Err(err));
        assert_eq!(status, ContainerStatus::Unknown);
        assert_eq!(status.gauge_value(), 0);
    }

    #[tokio::test]
    async fn test_marker_absent() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = StatusResolver::new(dir.path().join(".dockerenv"));

        let status = resolver.resolve().await;
        assert_eq!(status, ContainerStatus::NotContainerized);
        assert!(!status.is_healthy());
        assert_eq!(status.gauge_value(), 0);
    }

    #[tokio::test]
    async fn test_marker_present() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join(".dockerenv");
        std::fs::write(&marker, "").unwrap();
        let resolver = StatusResolver::new(&marker);

        let status = resolver.resolve().await;
        assert_eq!(status, ContainerStatus::Healthy);
        assert_eq!(status.gauge_value(), 1);
    }
}
