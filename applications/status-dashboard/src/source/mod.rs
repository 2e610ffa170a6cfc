//! Collaborators on the home-automation server side.

pub mod client;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::models::{Snapshot, SwitchCommand};

pub use client::HttpDashboardClient;

/// Source of device status snapshots
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// Receiver of device switch commands. Callers do not wait on the outcome
/// beyond logging it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn switch_device(&self, command: SwitchCommand) -> Result<()>;
}

/// Provider of the single-use rule editor HTML fragment
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RuleEditor: Send + Sync {
    async fn single_use_rule_form(&self) -> Result<String>;
}
