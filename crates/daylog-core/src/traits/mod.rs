// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be shared as `Arc<dyn …>` trait objects
//! across the outbox, the scheduler, and the chat handlers.

pub mod adapter;
pub mod delivery;
pub mod notifier;

pub use adapter::PluginAdapter;
pub use delivery::DeliveryAdapter;
pub use notifier::ChatNotifier;
