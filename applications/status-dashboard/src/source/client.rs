use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use super::{CommandSink, RuleEditor, StatusSource};
use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::models::{Snapshot, SwitchCommand};

const STATUS_PATH: &str = "/api/status";
const SWITCH_PATH: &str = "/api/switch";
const SINGLE_USE_RULE_PATH: &str = "/rules/add-single-use";

/// HTTP client for the home-automation server's status, switch and rule endpoints
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: Client,
    base_url: String,
}

impl HttpDashboardClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into `AppError::Upstream`
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(AppError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StatusSource for HttpDashboardClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let response = self.client.get(self.url(STATUS_PATH)).send().await?;
        let response = ensure_success(response).await?;

        let snapshot: Snapshot = response.json().await?;
        debug!("Fetched status for {} devices", snapshot.len());

        Ok(snapshot)
    }
}

#[async_trait]
impl CommandSink for HttpDashboardClient {
    async fn switch_device(&self, command: SwitchCommand) -> Result<()> {
        let response = self
            .client
            .post(self.url(SWITCH_PATH))
            .json(&command)
            .send()
            .await?;

        // The response body carries nothing the dashboard uses
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RuleEditor for HttpDashboardClient {
    async fn single_use_rule_form(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url(SINGLE_USE_RULE_PATH))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpDashboardClient::new(&SourceConfig {
            base_url: "http://dimmy.local:8080/".to_string(),
            timeout_ms: 500,
        })
        .unwrap();

        assert_eq!(client.base_url(), "http://dimmy.local:8080");
        assert_eq!(client.url(STATUS_PATH), "http://dimmy.local:8080/api/status");
    }
}
