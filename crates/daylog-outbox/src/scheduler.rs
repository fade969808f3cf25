// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic background flush.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use daylog_config::model::QueueConfig;

use crate::flush::Flusher;

/// Runs [`Flusher::flush_once`] on a fixed period until cancelled.
pub struct FlushScheduler {
    flusher: Flusher,
    first_delay: Duration,
    period: Duration,
}

impl FlushScheduler {
    pub fn new(flusher: Flusher, first_delay: Duration, period: Duration) -> Self {
        Self {
            flusher,
            first_delay,
            // tokio intervals panic on a zero period
            period: period.max(Duration::from_secs(1)),
        }
    }

    pub fn from_config(flusher: Flusher, config: &QueueConfig) -> Self {
        Self::new(
            flusher,
            Duration::from_secs(config.first_flush_delay_secs),
            Duration::from_secs(config.flush_interval_secs),
        )
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        info!(
            first_delay_secs = self.first_delay.as_secs(),
            period_secs = self.period.as_secs(),
            "flush scheduler started"
        );
        let mut interval = tokio::time::interval_at(Instant::now() + self.first_delay, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.flusher.flush_once().await {
                        Ok(report) if report.is_empty() => debug!("scheduled flush: queue empty"),
                        Ok(report) => info!(
                            sent = report.sent,
                            left = report.left,
                            stalled_on = report.stalled_on.as_deref().unwrap_or(""),
                            "scheduled flush"
                        ),
                        Err(e) => warn!(error = %e, "scheduled flush failed (non-fatal)"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("flush scheduler shutting down");
                    break;
                }
            }
        }
    }
}
