// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spreadsheet web-app adapter for daylog.
//!
//! [`SheetsClient`] implements [`DeliveryAdapter`] for event records and
//! offers the query actions used by the bot (`chats`, `alarm_chats`,
//! `alarm_set`, `has_recent_activity`, `stats`).

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use tracing::{info, warn};

use daylog_core::{
    AdapterType, DaylogError, DeliveryAdapter, DeliveryOutcome, Event, HealthStatus, PluginAdapter,
};

pub use client::SheetsClient;
pub use error::SheetsError;
pub use types::{Action, SheetsResponse, UserStats};

#[async_trait]
impl PluginAdapter for SheetsClient {
    fn name(&self) -> &str {
        "sheets"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    /// Round-trips a `chats` query.
    async fn health_check(&self) -> Result<HealthStatus, DaylogError> {
        Ok(match self.post(&Action::Chats).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) if e.is_transient() => HealthStatus::Unhealthy(e.to_string()),
            Err(e) => HealthStatus::Degraded(e.to_string()),
        })
    }
}

#[async_trait]
impl DeliveryAdapter for SheetsClient {
    async fn deliver(&self, event: &Event) -> DeliveryOutcome {
        match self.post(event).await {
            Ok(_) => {
                info!(event = %event.label(), chat_id = %event.chat_id, "event stored in sheet");
                DeliveryOutcome::Success
            }
            Err(e) => {
                let outcome = DeliveryOutcome::from(e);
                warn!(event = %event.label(), outcome = %outcome, "sheet delivery failed");
                outcome
            }
        }
    }
}
