// Tests for the HTTP status source client against a local stub server

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use status_dashboard::config::SourceConfig;
use status_dashboard::source::{CommandSink, HttpDashboardClient, RuleEditor, StatusSource};
use status_dashboard::{AppError, DeviceStatus, SwitchCommand};
use std::sync::Arc;
use tokio::sync::Mutex;

type Received = Arc<Mutex<Vec<Value>>>;

async fn status() -> Json<Value> {
    Json(json!({
        "lamp": {"Type": "plug", "value": true, "Hidden": false},
        "kitchen": {"Type": "sensor", "Values": {
            "temperature": {"value": 21.4, "LastChanged": "2024-03-01T12:00:00.123456789+01:00", "Since": null, "History": null}
        }}
    }))
}

async fn switch(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
    received.lock().await.push(body);
    StatusCode::OK
}

async fn rule_form() -> Html<&'static str> {
    Html("<form></form>")
}

/// Start a stub home-automation server, returning its base URL
async fn start_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String) -> HttpDashboardClient {
    HttpDashboardClient::new(&SourceConfig {
        base_url,
        timeout_ms: 2000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_snapshot() {
    let base_url = start_stub(Router::new().route("/api/status", get(status))).await;

    let snapshot = client(base_url).fetch_snapshot().await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot["lamp"], DeviceStatus::Plug { on: Some(true) });
    assert!(matches!(snapshot["kitchen"], DeviceStatus::Sensor { .. }));
}

#[tokio::test]
async fn test_fetch_snapshot_upstream_error() {
    let router = Router::new().route(
        "/api/status",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "restarting") }),
    );
    let base_url = start_stub(router).await;

    let err = client(base_url).fetch_snapshot().await.unwrap_err();

    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "restarting");
        }
        other => panic!("Expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_snapshot_connection_refused() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{}", addr))
        .fetch_snapshot()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Http(_)));
}

#[tokio::test]
async fn test_switch_device_posts_command() {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/api/switch", post(switch))
        .with_state(received.clone());
    let base_url = start_stub(router).await;

    client(base_url)
        .switch_device(SwitchCommand::new("lamp", "true", 1))
        .await
        .unwrap();

    let received = received.lock().await;
    assert_eq!(
        *received,
        vec![json!({"device": "lamp", "value": "true", "duration": 1})]
    );
}

#[tokio::test]
async fn test_single_use_rule_form() {
    let base_url = start_stub(Router::new().route("/rules/add-single-use", get(rule_form))).await;

    let fragment = client(base_url).single_use_rule_form().await.unwrap();

    assert_eq!(fragment, "<form></form>");
}
