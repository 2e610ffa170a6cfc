// Integration tests for the dashboard HTTP API
// The status source side is replaced with in-process fakes

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use status_dashboard::api::{create_router, AppState};
use status_dashboard::poller::{PollStats, SharedPollStats};
use status_dashboard::render::{RenderState, SharedRenderState};
use status_dashboard::source::{CommandSink, RuleEditor};
use status_dashboard::{reconcile, AppError, Result, Snapshot, SwitchCommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct RecordingSink {
    tx: mpsc::UnboundedSender<SwitchCommand>,
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn switch_device(&self, command: SwitchCommand) -> Result<()> {
        self.tx.send(command).ok();
        Ok(())
    }
}

struct StaticRuleEditor {
    fragment: Option<String>,
}

#[async_trait]
impl RuleEditor for StaticRuleEditor {
    async fn single_use_rule_form(&self) -> Result<String> {
        self.fragment.clone().ok_or(AppError::Upstream {
            status: 500,
            message: "template missing".to_string(),
        })
    }
}

struct Harness {
    server: TestServer,
    render: SharedRenderState,
    stats: SharedPollStats,
    commands: mpsc::UnboundedReceiver<SwitchCommand>,
}

fn harness(fragment: Option<&str>) -> Harness {
    let (tx, commands) = mpsc::unbounded_channel();
    let render = RenderState::shared();
    let stats = PollStats::shared();

    let state = AppState::new(
        render.clone(),
        stats.clone(),
        Arc::new(RecordingSink { tx }),
        Arc::new(StaticRuleEditor {
            fragment: fragment.map(str::to_string),
        }),
    );

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        render,
        stats,
        commands,
    }
}

async fn seed(render: &SharedRenderState) {
    let snapshot: Snapshot = serde_json::from_value(json!({
        "lamp": {"Type": "plug", "value": true},
        "kitchen": {"Type": "sensor", "Values": {
            "temperature": {"value": 21.37, "LastChanged": Utc::now().to_rfc3339()}
        }}
    }))
    .unwrap();

    render
        .write()
        .await
        .apply(&reconcile(&snapshot, Utc::now()));
}

#[tokio::test]
async fn test_health_endpoint_reports_poll_stats() {
    let h = harness(None);
    {
        let mut stats = h.stats.write().await;
        stats.polls = 5;
        stats.failures = 1;
    }

    let response = h.server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["polls"], 5);
    assert_eq!(body["failures"], 1);
    assert_eq!(body["elements"], 0);
}

#[tokio::test]
async fn test_health_endpoint_degraded_after_failed_poll() {
    let h = harness(None);
    h.stats.write().await.last_error = Some("connection refused".to_string());

    let response = h.server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["last_error"], "connection refused");
}

#[tokio::test]
async fn test_render_state_endpoint() {
    let h = harness(None);
    seed(&h.render).await;

    let response = h.server.get("/api/render").await;
    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({
        "kitchen_temperature": {"text": "21.4", "stale": false},
        "value_lamp": {"text": "on", "stale": false}
    }));
}

#[tokio::test]
async fn test_single_element_endpoint() {
    let h = harness(None);
    seed(&h.render).await;

    let response = h.server.get("/api/render/value_lamp").await;
    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({"text": "on", "stale": false}));

    let response = h.server.get("/api/render/value_unknown").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_switch_forwards_command() {
    let mut h = harness(None);

    let response = h
        .server
        .post("/api/switch")
        .json(&json!({"device": "lamp", "value": false}))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["value"], "false");

    let command = tokio::time::timeout(Duration::from_secs(1), h.commands.recv())
        .await
        .expect("command was not forwarded")
        .unwrap();
    assert_eq!(command, SwitchCommand::new("lamp", "false", 1));
}

#[tokio::test]
async fn test_switch_rejects_missing_device() {
    let h = harness(None);

    let response = h
        .server
        .post("/api/switch")
        .json(&json!({"device": "", "value": 50}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "device is required");
}

#[tokio::test]
async fn test_rule_form_is_proxied() {
    let h = harness(Some("<form id=\"single-use-rule\"></form>"));

    let response = h.server.get("/rules/add-single-use").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("<form id=\"single-use-rule\"></form>");
}

#[tokio::test]
async fn test_rule_form_upstream_failure_is_bad_gateway() {
    let h = harness(None);

    let response = h.server.get("/rules/add-single-use").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}
