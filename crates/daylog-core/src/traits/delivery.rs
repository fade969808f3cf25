// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery adapter trait for the remote event sink.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{DeliveryOutcome, Event};

/// A single-attempt mapping from [`Event`] to [`DeliveryOutcome`].
///
/// Implementations must not retry. Retries belong to the flush engine and
/// the dispatch policy, which decide ordering and durability.
#[async_trait]
pub trait DeliveryAdapter: PluginAdapter {
    /// Attempts to deliver one event and classifies the result.
    async fn deliver(&self, event: &Event) -> DeliveryOutcome;
}
