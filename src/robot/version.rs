//! Version lookup through the container inspection tool.
//!
//! Runs `<command> inspect --format={{index .Config.Labels "<label>"}} <hostname>`
//! and uses its trimmed stdout. Any failure falls back to the configured
//! override (`APP_VERSION`) and then to [`DEFAULT_APP_VERSION`].

use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;

use crate::config::{InspectConfig, RobotConfig, DEFAULT_APP_VERSION};

/// Why the inspection tool did not produce a version.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("container inspection is disabled")]
    Disabled,

    #[error("failed to start inspection tool: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("inspection tool did not finish within {0:?}")]
    Timeout(Duration),

    #[error("failed waiting for inspection tool: {0}")]
    Wait(#[source] std::io::Error),

    #[error("inspection tool exited with {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("inspection tool returned no version")]
    EmptyOutput,
}

/// Where a resolved version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    Inspect,
    Environment,
    Default,
}

impl VersionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionSource::Inspect => "inspect",
            VersionSource::Environment => "environment",
            VersionSource::Default => "default",
        }
    }
}

/// A version string that is always present, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: String,
    pub source: VersionSource,
}

#[derive(Debug, Clone)]
pub struct VersionResolver {
    enabled: bool,
    command: String,
    label: String,
    hostname: String,
    timeout: Duration,
    fallback: Option<String>,
}

impl VersionResolver {
    pub fn new(inspect: &InspectConfig, robot: &RobotConfig) -> Self {
        Self {
            enabled: inspect.enabled,
            command: inspect.command.clone(),
            label: inspect.label.clone(),
            hostname: robot.hostname.clone(),
            timeout: inspect.timeout(),
            fallback: robot.version_override.clone(),
        }
    }

    /// Go template selecting the version label from the container metadata.
    pub fn format_argument(&self) -> String {
        format!("--format={{{{index .Config.Labels \"{}\"}}}}", self.label)
    }

    /// Resolve the version. Never fails.
    pub async fn resolve(&self) -> ResolvedVersion {
        match self.inspect().await {
            Ok(version) => ResolvedVersion {
                version,
                source: VersionSource::Inspect,
            },
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    command = %self.command,
                    hostname = %self.hostname,
                    "No version from container inspection, using fallback"
                );
                self.fallback()
            }
        }
    }

    /// Version used whenever inspection fails.
    pub fn fallback(&self) -> ResolvedVersion {
        match &self.fallback {
            Some(version) => ResolvedVersion {
                version: version.clone(),
                source: VersionSource::Environment,
            },
            None => ResolvedVersion {
                version: DEFAULT_APP_VERSION.to_string(),
                source: VersionSource::Default,
            },
        }
    }

    /// Ask the inspection tool for the version label of this host's container.
    pub async fn inspect(&self) -> Result<String, InspectError> {
        if !self.enabled {
            return Err(InspectError::Disabled);
        }

        // kill_on_drop reaps the child when the timeout drops the wait future
        let child = Command::new(&self.command)
            .arg("inspect")
            .arg(self.format_argument())
            .arg(&self.hostname)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(InspectError::Spawn)?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| InspectError::Timeout(self.timeout))?
            .map_err(InspectError::Wait)?;

        if !output.status.success() {
            return Err(InspectError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(InspectError::EmptyOutput);
        }

        Ok(version)
    }
}
