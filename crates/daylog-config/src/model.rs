// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for daylog.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// Top-level daylog configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DaylogConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Remote spreadsheet endpoint settings.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Durable delivery queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Daily reminder settings.
    #[serde(default)]
    pub reminder: ReminderConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Name used in logs and the `/debug` output.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "daylog".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Remote spreadsheet web-app configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Web-app URL that accepts JSON POSTs.
    #[serde(default)]
    pub webapp_url: Option<String>,

    /// Shared secret merged into every payload as `secret`.
    #[serde(default)]
    pub secret: Option<String>,

    /// Target worksheet merged into every payload as `sheetName`.
    #[serde(default = "default_worksheet_name")]
    pub worksheet_name: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            webapp_url: None,
            secret: None,
            worksheet_name: default_worksheet_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_worksheet_name() -> String {
    "Sheet1".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

/// Durable queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Directory holding the queue file. Created lazily.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Queue file name inside `data_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Seconds between background flushes.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,

    /// Seconds after startup before the first background flush.
    #[serde(default = "default_first_flush_delay_secs")]
    pub first_flush_delay_secs: u64,

    /// Extra in-process attempts when appending a failed event.
    #[serde(default = "default_append_retries")]
    pub append_retries: u32,
}

impl QueueConfig {
    /// Full path of the queue file.
    pub fn queue_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.file_name)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
            flush_interval_secs: default_flush_interval_secs(),
            first_flush_delay_secs: default_first_flush_delay_secs(),
            append_retries: default_append_retries(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("daylog"))
        .unwrap_or_else(|| PathBuf::from("data"))
        .to_string_lossy()
        .into_owned()
}

fn default_file_name() -> String {
    "queue.jsonl".to_string()
}

fn default_flush_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_first_flush_delay_secs() -> u64 {
    10
}

fn default_append_retries() -> u32 {
    2
}

/// Daily reminder configuration.
///
/// The reminder fires once a day at `time` in the fixed `utc_offset_minutes`
/// zone, and only when nobody logged anything during `quiet_hours`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReminderConfig {
    /// Enable the daily reminder job.
    #[serde(default = "default_reminder_enabled")]
    pub enabled: bool,

    /// Local wall-clock time, `HH:MM`.
    #[serde(default = "default_reminder_time")]
    pub time: String,

    /// Offset of the local zone from UTC in minutes (Moscow is +180).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Lookback window passed to `has_recent_activity`.
    #[serde(default = "default_quiet_hours")]
    pub quiet_hours: u32,

    /// Message sent to every chat with the reminder enabled.
    #[serde(default = "default_reminder_text")]
    pub text: String,
}

impl ReminderConfig {
    /// Parses `time`. `None` when it is not a valid `HH:MM`.
    pub fn local_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }

    /// The configured zone. `None` when the offset is out of range.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: default_reminder_enabled(),
            time: default_reminder_time(),
            utc_offset_minutes: default_utc_offset_minutes(),
            quiet_hours: default_quiet_hours(),
            text: default_reminder_text(),
        }
    }
}

fn default_reminder_enabled() -> bool {
    true
}

fn default_reminder_time() -> String {
    "21:00".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    180
}

fn default_quiet_hours() -> u32 {
    24
}

fn default_reminder_text() -> String {
    "Hi! It has been quiet here for a day. Don't forget to log today's entry: /rate".to_string()
}
