//! Configuration loading and constants.
//!
//! Settings come from an optional TOML file, with the robot identity taken from
//! the process environment (`ROBOT_ID`, `APP_VERSION`, `HOSTNAME`). Environment
//! values always win over anything in the file. `AppConfig` is the root struct.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Every page reflects live state; upstream caches must not hold on to it.
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Environment
// =============================================================================

/// Robot identifier
pub const ENV_ROBOT_ID: &str = "ROBOT_ID";
/// Version override used when the inspection tool gives no answer
pub const ENV_APP_VERSION: &str = "APP_VERSION";
/// Host identifier passed to the inspection tool
pub const ENV_HOSTNAME: &str = "HOSTNAME";

pub const DEFAULT_ROBOT_ID: &str = "1";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";
pub const DEFAULT_HOSTNAME: &str = "unknown";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Container inspection tool and the image label holding the version
pub const DEFAULT_INSPECT_COMMAND: &str = "docker";
pub const DEFAULT_INSPECT_LABEL: &str = "version";
pub const DEFAULT_INSPECT_TIMEOUT_SECS: u64 = 5;

/// File present at the root of every Docker container filesystem
pub const DEFAULT_CONTAINER_MARKER: &str = "/.dockerenv";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "robot_status=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Identity of this robot. Populated from the environment after parsing.
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Robot identity settings
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "RobotConfig::default_id")]
    pub id: String,
    /// Used when the inspection tool cannot report a version
    pub version_override: Option<String>,
    #[serde(default = "RobotConfig::default_hostname")]
    pub hostname: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            id: Self::default_id(),
            version_override: None,
            hostname: Self::default_hostname(),
        }
    }
}

impl RobotConfig {
    fn default_id() -> String {
        DEFAULT_ROBOT_ID.to_string()
    }

    fn default_hostname() -> String {
        DEFAULT_HOSTNAME.to_string()
    }

    /// Overlay values found through `lookup` onto this config.
    ///
    /// `lookup` maps an environment variable name to its value; the process
    /// environment is used in production, a closure over a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(ENV_ROBOT_ID) {
            self.id = id;
        }
        if let Some(version) = lookup(ENV_APP_VERSION) {
            self.version_override = Some(version);
        }
        if let Some(hostname) = lookup(ENV_HOSTNAME) {
            self.hostname = hostname;
        }
    }
}

/// External container inspection settings
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    /// Set to false to skip the tool entirely (version comes from the fallbacks)
    #[serde(default = "InspectConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "InspectConfig::default_command")]
    pub command: String,
    /// Image label that carries the version string
    #[serde(default = "InspectConfig::default_label")]
    pub label: String,
    #[serde(default = "InspectConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            command: Self::default_command(),
            label: Self::default_label(),
            timeout_seconds: Self::default_timeout(),
        }
    }
}

impl InspectConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_command() -> String {
        DEFAULT_INSPECT_COMMAND.to_string()
    }

    fn default_label() -> String {
        DEFAULT_INSPECT_LABEL.to_string()
    }

    fn default_timeout() -> u64 {
        DEFAULT_INSPECT_TIMEOUT_SECS
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Health status settings
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Presence of this path means the process runs inside a container
    #[serde(default = "HealthConfig::default_marker_path")]
    pub marker_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            marker_path: Self::default_marker_path(),
        }
    }
}

impl HealthConfig {
    fn default_marker_path() -> String {
        DEFAULT_CONTAINER_MARKER.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file and the process environment.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] but with an explicit environment lookup.
    pub fn load_with_env<P, F>(path: Option<P>, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };

        config.robot.apply_env(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.robot.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Robot id must not be empty (check ROBOT_ID)".to_string(),
            ));
        }
        if self.inspect.enabled && self.inspect.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "inspect.command must not be empty when inspection is enabled".to_string(),
            ));
        }
        if self.inspect.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "inspect.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
