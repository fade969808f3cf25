// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Every check runs; all failures are reported together.

use crate::diagnostic::ConfigError;
use crate::model::DaylogConfig;

/// Longest accepted request timeout.
const MAX_TIMEOUT_SECS: u64 = 120;

/// UTC offsets in real use stay within +-14 hours.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Validates a deserialized configuration.
pub fn validate_config(config: &DaylogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Some(url) = config.sheets.webapp_url.as_deref() {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::invalid(
                "sheets.webapp_url",
                format!("`{url}` must start with http:// or https://"),
            ));
        }
    }

    if config.sheets.worksheet_name.trim().is_empty() {
        errors.push(ConfigError::invalid(
            "sheets.worksheet_name",
            "must not be empty",
        ));
    }

    let timeout = config.sheets.timeout_secs;
    if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
        errors.push(ConfigError::invalid(
            "sheets.timeout_secs",
            format!("must be between 1 and {MAX_TIMEOUT_SECS}, got {timeout}"),
        ));
    }

    if config.queue.file_name.trim().is_empty() {
        errors.push(ConfigError::invalid("queue.file_name", "must not be empty"));
    }

    if config.queue.data_dir.trim().is_empty() {
        errors.push(ConfigError::invalid("queue.data_dir", "must not be empty"));
    }

    if config.queue.flush_interval_secs == 0 {
        errors.push(ConfigError::invalid(
            "queue.flush_interval_secs",
            "must be greater than zero",
        ));
    }

    let reminder = &config.reminder;
    if reminder.local_time().is_none() {
        errors.push(ConfigError::invalid(
            "reminder.time",
            format!("`{}` is not a HH:MM wall-clock time", reminder.time),
        ));
    }

    if reminder.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        errors.push(ConfigError::invalid(
            "reminder.utc_offset_minutes",
            format!(
                "must be within +-{MAX_OFFSET_MINUTES}, got {}",
                reminder.utc_offset_minutes
            ),
        ));
    }

    if reminder.quiet_hours == 0 {
        errors.push(ConfigError::invalid(
            "reminder.quiet_hours",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
