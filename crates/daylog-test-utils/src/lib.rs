// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for daylog.
//!
//! Deterministic stand-ins for the remote endpoint and the chat transport,
//! so outbox and reminder tests run without network access.
//!
//! # Components
//!
//! - [`ScriptedDelivery`] - delivery adapter that replays scripted outcomes
//! - [`MockNotifier`] - chat notifier that captures sent texts

pub mod mock_notifier;
pub mod scripted_delivery;

pub use mock_notifier::MockNotifier;
pub use scripted_delivery::ScriptedDelivery;
