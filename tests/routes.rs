//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! The inspection tool is pointed at a binary that does not exist, so the
//! version always comes from the configured fallbacks. The container marker is
//! a path inside a temp dir that each test creates or leaves absent.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::util::ServiceExt;

use robot_status::config::AppConfig;
use robot_status::metrics::{Endpoint, RobotMetrics};
use robot_status::templates::init_templates;
use robot_status::{create_router, AppState};

struct TestApp {
    router: Router,
    metrics: RobotMetrics,
    _dir: TempDir,
}

fn test_app(robot_id: Option<&str>, version: Option<&str>, containerized: bool) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let marker = dir.path().join(".dockerenv");
    if containerized {
        std::fs::write(&marker, "").expect("Failed to write marker");
    }

    let robot_id = robot_id.map(str::to_string);
    let version = version.map(str::to_string);
    let mut config = AppConfig::load_with_env(None::<&str>, |key| match key {
        "ROBOT_ID" => robot_id.clone(),
        "APP_VERSION" => version.clone(),
        "HOSTNAME" => Some("test-host".to_string()),
        _ => None,
    })
    .expect("Failed to load config");
    config.inspect.command = "robot-status-test-missing-inspector".to_string();
    config.health.marker_path = marker.to_string_lossy().into_owned();

    let metrics = RobotMetrics::new().expect("Failed to create metrics");
    let tera = init_templates().expect("Failed to init templates");
    let state = AppState::new(&config, tera, metrics.clone());

    TestApp {
        router: create_router(state),
        metrics,
        _dir: dir,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    (
        status,
        content_type,
        String::from_utf8(body.to_vec()).expect("Body is not UTF-8"),
    )
}

#[tokio::test]
async fn test_index_shows_default_identity() {
    let app = test_app(None, None, false);

    let (status, content_type, body) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
    assert!(body.contains("Robot 1"));
    assert!(body.contains("1.0.0"));
    assert!(body.contains("Running (not containerized)"));
}

#[tokio::test]
async fn test_index_uses_env_identity() {
    let app = test_app(Some("rx-9"), Some("2.5.0"), true);

    let (status, _, body) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Robot rx-9"));
    assert!(body.contains("2.5.0"));
    assert!(body.contains("Healthy"));
    assert!(body.contains("status-healthy"));
}

#[tokio::test]
async fn test_index_escapes_robot_id() {
    let app = test_app(Some("<b>x</b>"), None, false);

    let (_, _, body) = get(&app.router, "/").await;

    assert!(!body.contains("<b>x</b>"));
    assert!(body.contains("&lt;b&gt;x&lt;&#x2F;b&gt;"));
}

#[tokio::test]
async fn test_health_always_healthy() {
    for containerized in [false, true] {
        let app = test_app(None, None, containerized);

        let (status, content_type, body) = get(&app.router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let json: serde_json::Value = serde_json::from_str(&body).expect("Body is not JSON");
        assert_eq!(json, serde_json::json!({ "status": "healthy" }));
    }
}

#[tokio::test]
async fn test_health_metric_tracks_marker() {
    let outside = test_app(Some("7"), None, false);
    get(&outside.router, "/health").await;
    assert_eq!(outside.metrics.health_value("7"), 0);

    let inside = test_app(Some("7"), None, true);
    get(&inside.router, "/health").await;
    assert_eq!(inside.metrics.health_value("7"), 1);
}

#[tokio::test]
async fn test_each_request_increments_its_endpoint() {
    let app = test_app(Some("42"), None, false);

    get(&app.router, "/").await;
    get(&app.router, "/health").await;
    get(&app.router, "/health").await;
    get(&app.router, "/metrics").await;
    get(&app.router, "/metrics").await;
    get(&app.router, "/metrics").await;

    assert_eq!(app.metrics.request_count(Endpoint::Index, "42"), 1);
    assert_eq!(app.metrics.request_count(Endpoint::Health, "42"), 2);
    assert_eq!(app.metrics.request_count(Endpoint::Metrics, "42"), 3);
}

#[tokio::test]
async fn test_unknown_path_is_not_counted() {
    let app = test_app(None, None, false);

    let (status, _, _) = get(&app.router, "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.metrics.request_count(Endpoint::Index, "1"), 0);
    assert_eq!(app.metrics.request_count(Endpoint::Health, "1"), 0);
    assert_eq!(app.metrics.request_count(Endpoint::Metrics, "1"), 0);
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = test_app(Some("5"), Some("3.0.0"), true);

    get(&app.router, "/health").await;
    let (status, content_type, body) = get(&app.router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; version=0.0.4"));

    for name in [
        "robot_info",
        "robot_health_status",
        "robot_requests_total",
        "robot_version",
    ] {
        assert!(body.contains(&format!("# HELP {} ", name)), "missing HELP for {}", name);
        assert!(body.contains(&format!("# TYPE {} ", name)), "missing TYPE for {}", name);
    }

    assert!(body.contains(r#"robot_info{robot_id="5",status="Healthy",version="3.0.0"} 1"#));
    assert!(body.contains(r#"robot_version{robot_id="5",version="3.0.0"} 1"#));
    assert!(body.contains(r#"robot_health_status{robot_id="5"} 1"#));
    assert!(body.contains(r#"robot_requests_total{endpoint="health",robot_id="5"} 1"#));
    // the scrape itself is counted before encoding
    assert!(body.contains(r#"robot_requests_total{endpoint="metrics",robot_id="5"} 1"#));
}

#[tokio::test]
async fn test_responses_are_not_cached() {
    let app = test_app(None, None, false);

    for uri in ["/", "/health", "/metrics"] {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..]),
            "{} should not be cacheable",
            uri
        );
    }
}
