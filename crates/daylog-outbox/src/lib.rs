// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable outbox for daylog events.
//!
//! Events that cannot reach the remote endpoint are appended to a JSON
//! Lines file and delivered later, oldest first, by [`Flusher`]. Delivery
//! is at-least-once: an event leaves the file only after the endpoint
//! accepted it.
//!
//! - [`QueueStore`] owns the file and its lock.
//! - [`Flusher`] drains it with head-of-line blocking.
//! - [`Outbox`] is the submit policy used by the chat handlers.
//! - [`FlushScheduler`] flushes periodically in the background.

pub mod flush;
pub mod outbox;
pub mod scheduler;
pub mod store;

pub use flush::{FlushReport, Flusher};
pub use outbox::{Outbox, SubmitReport};
pub use scheduler::FlushScheduler;
pub use store::{QueueFile, QueueStatus, QueueStore};
