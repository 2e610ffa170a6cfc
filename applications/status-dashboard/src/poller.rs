//! Status poller background task
//!
//! Fetches a snapshot on every tick, reconciles it and writes the result into
//! the shared render state. Missed ticks are skipped, so passes never overlap.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::reconcile::reconcile;
use crate::render::SharedRenderState;
use crate::source::StatusSource;

pub type SharedPollStats = Arc<RwLock<PollStats>>;

/// Running totals reported by the health endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollStats {
    pub polls: u64,
    pub failures: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl PollStats {
    pub fn shared() -> SharedPollStats {
        Arc::new(RwLock::new(Self::default()))
    }
}

pub struct Poller {
    source: Arc<dyn StatusSource>,
    render: SharedRenderState,
    stats: SharedPollStats,
    period: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        render: SharedRenderState,
        stats: SharedPollStats,
        period: Duration,
    ) -> Self {
        Self {
            source,
            render,
            stats,
            period,
        }
    }

    /// Run the poll loop until `shutdown` fires or its sender is dropped
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        info!("Status poller started (interval: {}ms)", self.period.as_millis());

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        info!("Status poller stopped");
    }

    /// One fetch → reconcile → apply pass. Returns the number of changed elements.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> Result<usize> {
        let snapshot = self.source.fetch_snapshot().await?;

        let reconciliation = reconcile(&snapshot, now);
        for unknown in &reconciliation.unrecognized {
            debug!("{}, rendering as percentage", unknown);
        }

        let changed = self.render.write().await.apply(&reconciliation);
        if changed > 0 {
            debug!(
                "Applied {} instructions, {} elements changed",
                reconciliation.instructions.len(),
                changed
            );
        }

        Ok(changed)
    }

    async fn tick(&self) {
        let result = self.run_pass(Utc::now()).await;

        let mut stats = self.stats.write().await;
        stats.polls += 1;

        match result {
            Ok(_) => {
                stats.last_success = Some(Utc::now());
                stats.last_error = None;
            }
            Err(e) => {
                // Nothing to retry: the next tick polls again
                warn!("Status poll failed: {}", e);
                stats.failures += 1;
                stats.last_error = Some(e.to_string());
            }
        }
    }
}
