// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat notifier for deterministic testing.
//!
//! `MockNotifier` implements `ChatNotifier` and captures every text sent,
//! optionally failing for chosen chat ids.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use daylog_core::{AdapterType, ChatNotifier, DaylogError, HealthStatus, PluginAdapter};

/// Captures `(chat_id, text)` pairs passed to `send_text()`.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
    failing: Arc<Mutex<HashSet<i64>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `chat_id` fail with a channel error.
    pub async fn fail_for(&self, chat_id: i64) {
        self.failing.lock().await.insert(chat_id);
    }

    /// All successfully sent messages, in order.
    pub async fn sent_messages(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }

    /// Chat ids that received something, in order.
    pub async fn recipients(&self) -> Vec<i64> {
        self.sent.lock().await.iter().map(|(id, _)| *id).collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, DaylogError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatNotifier for MockNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DaylogError> {
        if self.failing.lock().await.contains(&chat_id) {
            return Err(DaylogError::Channel {
                message: format!("chat {chat_id} is unreachable"),
                source: None,
            });
        }
        self.sent.lock().await.push((chat_id, text.to_string()));
        Ok(())
    }
}
