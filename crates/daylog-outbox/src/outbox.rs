// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submit policy: drain the backlog, try the new event directly, queue it on failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use daylog_config::model::QueueConfig;
use daylog_core::{DaylogError, DeliveryAdapter, Event};

use crate::flush::{FlushReport, Flusher};
use crate::store::{QueueStatus, QueueStore};

/// Pause between in-process append retries.
const APPEND_RETRY_PAUSE: Duration = Duration::from_millis(200);

/// What happened to a submitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReport {
    pub delivered: bool,
    pub queued: bool,
}

/// Entry point for recording events.
///
/// A submitted event is either delivered right away or persisted for a
/// later flush. Delivery failures never surface as errors; only a queue
/// write that keeps failing does.
#[derive(Clone)]
pub struct Outbox {
    store: Arc<QueueStore>,
    delivery: Arc<dyn DeliveryAdapter>,
    flusher: Flusher,
    append_retries: u32,
}

impl Outbox {
    pub fn new(store: Arc<QueueStore>, delivery: Arc<dyn DeliveryAdapter>) -> Self {
        let flusher = Flusher::new(store.clone(), delivery.clone());
        Self {
            store,
            delivery,
            flusher,
            append_retries: 2,
        }
    }

    /// Builds an outbox over the configured queue file.
    pub fn from_config(config: &QueueConfig, delivery: Arc<dyn DeliveryAdapter>) -> Self {
        Self::new(Arc::new(QueueStore::new(config.queue_path())), delivery)
            .with_append_retries(config.append_retries)
    }

    pub fn with_append_retries(mut self, retries: u32) -> Self {
        self.append_retries = retries;
        self
    }

    pub fn store(&self) -> &Arc<QueueStore> {
        &self.store
    }

    pub fn flusher(&self) -> Flusher {
        self.flusher.clone()
    }

    /// Records one event.
    ///
    /// Older queued events get a chance to go first, so a direct delivery
    /// only overtakes the backlog when the backlog is itself stuck.
    pub async fn submit(&self, event: Event) -> Result<SubmitReport, DaylogError> {
        if let Err(e) = self.flusher.flush_once().await {
            warn!(error = %e, "flush before submit failed");
        }

        let outcome = self.delivery.deliver(&event).await;
        if outcome.is_success() {
            info!(event = %event.label(), chat_id = %event.chat_id, "event delivered");
            if let Err(e) = self.flusher.flush_once().await {
                warn!(error = %e, "flush after submit failed");
            }
            return Ok(SubmitReport {
                delivered: true,
                queued: false,
            });
        }

        warn!(event = %event.label(), outcome = %outcome, "delivery failed, queueing event");
        self.append_with_retry(&event).await?;
        Ok(SubmitReport {
            delivered: false,
            queued: true,
        })
    }

    async fn append_with_retry(&self, event: &Event) -> Result<(), DaylogError> {
        let mut attempt = 0;
        loop {
            match self.store.append(event).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.append_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "queue append failed, retrying");
                    tokio::time::sleep(APPEND_RETRY_PAUSE).await;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        event = %event.label(),
                        timestamp = %event.timestamp,
                        chat_id = %event.chat_id,
                        "event lost: could not be delivered or queued"
                    );
                    return Err(e);
                }
            }
        }
    }

    pub async fn flush_once(&self) -> Result<FlushReport, DaylogError> {
        self.flusher.flush_once().await
    }

    pub async fn queue_status(&self) -> Result<QueueStatus, DaylogError> {
        self.store.status().await
    }

    /// Discards the head event. Operator escape hatch for a permanently rejected head.
    pub async fn drop_head(&self) -> Result<Option<Event>, DaylogError> {
        self.store.drop_head().await
    }
}
