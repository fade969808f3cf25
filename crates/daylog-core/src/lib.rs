// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for daylog.
//!
//! Holds the event model that flows through the durable outbox, the shared
//! error type, and the adapter traits implemented by the spreadsheet client
//! and the chat transport.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DaylogError;
pub use types::{AdapterType, Author, DeliveryOutcome, Event, EventKind, HealthStatus, Score};

pub use traits::{ChatNotifier, DeliveryAdapter, PluginAdapter};
