// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, head-of-line blocking delivery of queued events.

use std::sync::Arc;

use tracing::{info, warn};

use daylog_core::{DaylogError, DeliveryAdapter, DeliveryOutcome};

use crate::store::QueueStore;

/// Result of one flush pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub left: usize,
    /// Reason the head event was not delivered, when the pass stopped early.
    pub stalled_on: Option<String>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.sent == 0 && self.left == 0
    }
}

/// Drains the queue front to back through a delivery adapter.
#[derive(Clone)]
pub struct Flusher {
    store: Arc<QueueStore>,
    delivery: Arc<dyn DeliveryAdapter>,
}

impl Flusher {
    pub fn new(store: Arc<QueueStore>, delivery: Arc<dyn DeliveryAdapter>) -> Self {
        Self { store, delivery }
    }

    /// Delivers queued events in order until the first failure.
    ///
    /// Holds the store lock for the whole pass. The file is rewritten to the
    /// undelivered remainder only when something was sent; an empty queue
    /// leaves the file untouched.
    pub async fn flush_once(&self) -> Result<FlushReport, DaylogError> {
        let mut queue = self.store.lock().await;
        let events = queue.read_all().await?;
        if events.is_empty() {
            return Ok(FlushReport::default());
        }

        let mut sent = 0;
        let mut stalled_on = None;
        for event in &events {
            match self.delivery.deliver(event).await {
                DeliveryOutcome::Success => sent += 1,
                outcome => {
                    warn!(
                        event = %event.label(),
                        timestamp = %event.timestamp,
                        outcome = %outcome,
                        "queue head not delivered, stopping flush"
                    );
                    stalled_on = outcome.reason().map(str::to_string);
                    break;
                }
            }
        }

        if sent > 0 {
            queue.rewrite(&events[sent..]).await?;
        }

        let report = FlushReport {
            sent,
            left: events.len() - sent,
            stalled_on,
        };
        info!(sent = report.sent, left = report.left, "queue flush finished");
        Ok(report)
    }
}
