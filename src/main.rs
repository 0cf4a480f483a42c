//! robot-status entry point.
//!
//! Initializes tracing, loads configuration from an optional TOML file and the
//! environment, builds the metrics registry and templates, then serves the
//! router until shutdown.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use robot_status::config::{AppConfig, DEFAULT_LOG_FILTER};
use robot_status::http::start_server;
use robot_status::metrics::RobotMetrics;
use robot_status::templates::init_templates;
use robot_status::{create_router, AppState};

/// Report a robot's identity, version and health over HTTP
#[derive(Parser, Debug)]
#[command(name = "robot-status", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "robot_status=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Port to listen on, overriding the configuration file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: it decides the log format
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        robot_id = %config.robot.id,
        hostname = %config.robot.hostname,
        version_override = ?config.robot.version_override,
        inspect_enabled = config.inspect.enabled,
        inspect_command = %config.inspect.command,
        marker = %config.health.marker_path,
        "Loaded configuration"
    );

    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    let metrics = RobotMetrics::new()?;
    tracing::info!("Initialized metrics registry");

    let state = AppState::new(&config, tera, metrics);
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
