// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of a single web-app call.

use thiserror::Error;

use daylog_core::{DaylogError, DeliveryOutcome};

#[derive(Debug, Error)]
pub enum SheetsError {
    /// Connect, DNS, timeout, or body read failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("bad_json_response")]
    BadJson(#[source] serde_json::Error),

    /// The web-app answered `ok: false`.
    #[error("{0}")]
    NotOk(String),
}

impl SheetsError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SheetsError::Transport(_))
    }
}

impl From<SheetsError> for DeliveryOutcome {
    fn from(err: SheetsError) -> Self {
        if err.is_transient() {
            DeliveryOutcome::TransientFailure(err.to_string())
        } else {
            DeliveryOutcome::Rejected(err.to_string())
        }
    }
}

impl From<SheetsError> for DaylogError {
    fn from(err: SheetsError) -> Self {
        DaylogError::Remote {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_carry_the_reason() {
        assert_eq!(
            DeliveryOutcome::from(SheetsError::Status(403)),
            DeliveryOutcome::Rejected("HTTP 403".into())
        );
        assert_eq!(
            DeliveryOutcome::from(SheetsError::NotOk("unknown".into())),
            DeliveryOutcome::Rejected("unknown".into())
        );
    }

    #[test]
    fn bad_json_maps_to_fixed_reason() {
        let parse_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(
            DeliveryOutcome::from(SheetsError::BadJson(parse_err)),
            DeliveryOutcome::Rejected("bad_json_response".into())
        );
    }

    #[test]
    fn converts_to_remote_error() {
        let err: DaylogError = SheetsError::Status(500).into();
        assert!(matches!(err, DaylogError::Remote { ref message, .. } if message == "HTTP 500"));
    }
}
