// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted delivery adapter.
//!
//! `ScriptedDelivery` implements `DeliveryAdapter` by popping pre-configured
//! outcomes in order. Once the script runs out, every call returns the
//! default outcome (initially `Success`). Every attempt is recorded.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use daylog_core::{
    AdapterType, DaylogError, DeliveryAdapter, DeliveryOutcome, Event, HealthStatus, PluginAdapter,
};

#[derive(Clone)]
pub struct ScriptedDelivery {
    script: Arc<Mutex<VecDeque<DeliveryOutcome>>>,
    default: Arc<Mutex<DeliveryOutcome>>,
    attempts: Arc<Mutex<Vec<(Event, DeliveryOutcome)>>>,
}

impl ScriptedDelivery {
    /// An endpoint that accepts everything.
    pub fn new() -> Self {
        Self::with_default(DeliveryOutcome::Success)
    }

    /// An endpoint that answers every call with `outcome`.
    pub fn with_default(outcome: DeliveryOutcome) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default: Arc::new(Mutex::new(outcome)),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An endpoint that cannot be reached.
    pub fn offline() -> Self {
        Self::with_default(DeliveryOutcome::TransientFailure("connection refused".into()))
    }

    /// Queues outcomes returned before falling back to the default.
    pub async fn push_outcomes(&self, outcomes: impl IntoIterator<Item = DeliveryOutcome>) {
        self.script.lock().await.extend(outcomes);
    }

    /// Changes the fallback outcome, e.g. to bring the endpoint back online.
    pub async fn set_default(&self, outcome: DeliveryOutcome) {
        *self.default.lock().await = outcome;
    }

    /// Events the endpoint accepted, in arrival order.
    pub async fn delivered(&self) -> Vec<Event> {
        self.attempts
            .lock()
            .await
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .map(|(event, _)| event.clone())
            .collect()
    }

    /// Every call made, with the outcome it received.
    pub async fn attempts(&self) -> Vec<(Event, DeliveryOutcome)> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

impl Default for ScriptedDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedDelivery {
    fn name(&self) -> &str {
        "scripted-delivery"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, DaylogError> {
        Ok(match &*self.default.lock().await {
            DeliveryOutcome::Success => HealthStatus::Healthy,
            other => HealthStatus::Unhealthy(other.to_string()),
        })
    }
}

#[async_trait]
impl DeliveryAdapter for ScriptedDelivery {
    async fn deliver(&self, event: &Event) -> DeliveryOutcome {
        let scripted = self.script.lock().await.pop_front();
        let outcome = match scripted {
            Some(outcome) => outcome,
            None => self.default.lock().await.clone(),
        };
        self.attempts
            .lock()
            .await
            .push((event.clone(), outcome.clone()));
        outcome
    }
}
