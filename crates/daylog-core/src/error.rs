// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for daylog.

use thiserror::Error;

/// The primary error type shared by every daylog crate.
///
/// Delivery failures against the remote endpoint are *not* errors at the
/// outbox boundary; they are reported as [`DeliveryOutcome`](crate::types::DeliveryOutcome)
/// values. This enum covers everything that can genuinely fail an operation.
#[derive(Debug, Error)]
pub enum DaylogError {
    /// Configuration errors (missing endpoint, invalid token, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local queue file I/O or serialization failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote spreadsheet endpoint failure on a query call.
    #[error("remote error: {message}")]
    Remote {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat transport errors (send failure, bad chat id).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An event could not be constructed (e.g. score out of range).
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

impl From<std::io::Error> for DaylogError {
    fn from(err: std::io::Error) -> Self {
        DaylogError::Storage {
            source: Box::new(err),
        }
    }
}
