// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `daylog flush` and `daylog queue ...` command implementations.
//!
//! These work on the queue file directly and can run while the bot is
//! stopped. `--json` prints machine-readable output; `--plain` (or a
//! non-TTY stdout) disables colors.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use daylog_config::DaylogConfig;
use daylog_core::{DaylogError, Event};
use daylog_outbox::{FlushReport, Flusher, QueueStatus, QueueStore};
use daylog_sheets::SheetsClient;

/// Structured queue status for `--json` mode.
#[derive(Debug, Serialize)]
pub struct QueueStatusResponse {
    pub path: String,
    pub count: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub oldest_age_secs: Option<u64>,
}

impl QueueStatusResponse {
    fn new(path: &Path, status: &QueueStatus, now: DateTime<Utc>) -> Self {
        Self {
            path: path.display().to_string(),
            count: status.count,
            oldest: status.oldest,
            oldest_age_secs: status
                .oldest
                .map(|ts| (now - ts).num_seconds().max(0) as u64),
        }
    }
}

/// Structured flush result for `--json` mode.
#[derive(Debug, Serialize)]
pub struct FlushResponse {
    pub sent: usize,
    pub left: usize,
    pub stalled_on: Option<String>,
}

impl From<&FlushReport> for FlushResponse {
    fn from(report: &FlushReport) -> Self {
        Self {
            sent: report.sent,
            left: report.left,
            stalled_on: report.stalled_on.clone(),
        }
    }
}

/// Format seconds into a human-readable age.
fn format_age(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Run `daylog queue status`.
pub async fn run_queue_status(
    config: &DaylogConfig,
    json: bool,
    plain: bool,
) -> Result<(), DaylogError> {
    let path = config.queue.queue_path();
    let status = QueueStore::new(path.clone()).status().await?;
    let response = QueueStatusResponse::new(&path, &status, Utc::now());

    if json {
        print_json(&response);
    } else {
        print_queue_status(&response, use_color(plain));
    }
    Ok(())
}

/// Run `daylog queue drop-head`.
pub async fn run_drop_head(config: &DaylogConfig, plain: bool) -> Result<(), DaylogError> {
    let store = QueueStore::new(config.queue.queue_path());
    let dropped = store.drop_head().await?;
    print_dropped(dropped.as_ref(), use_color(plain));
    Ok(())
}

/// Run `daylog flush`: one pass against the configured endpoint.
pub async fn run_flush(config: &DaylogConfig, json: bool, plain: bool) -> Result<(), DaylogError> {
    let sheets = SheetsClient::from_config(&config.sheets)?;
    let store = Arc::new(QueueStore::new(config.queue.queue_path()));
    let report = Flusher::new(store, Arc::new(sheets)).flush_once().await?;

    if json {
        print_json(&FlushResponse::from(&report));
    } else {
        print_flush(&report, use_color(plain));
    }
    Ok(())
}

fn print_queue_status(response: &QueueStatusResponse, use_color: bool) {
    println!();
    println!("  daylog queue");
    println!("  {}", "-".repeat(35));
    println!("    File:     {}", response.path);

    if response.count == 0 {
        if use_color {
            use colored::Colorize;
            println!("    Pending:  {} {}", "✓".green(), "empty".green());
        } else {
            println!("    Pending:  [OK] empty");
        }
    } else {
        let age = response
            .oldest_age_secs
            .map(format_age)
            .unwrap_or_else(|| "?".to_string());
        if use_color {
            use colored::Colorize;
            println!(
                "    Pending:  {} {} (oldest {} ago)",
                "!".yellow(),
                response.count.to_string().yellow(),
                age
            );
        } else {
            println!("    Pending:  [WARN] {} (oldest {age} ago)", response.count);
        }
    }
    println!();
}

fn print_flush(report: &FlushReport, use_color: bool) {
    if use_color {
        use colored::Colorize;
        let left = if report.left == 0 {
            report.left.to_string().green()
        } else {
            report.left.to_string().yellow()
        };
        println!("sent={} left={}", report.sent.to_string().green(), left);
    } else {
        println!("sent={} left={}", report.sent, report.left);
    }
    if let Some(reason) = &report.stalled_on {
        println!("head is stuck: {reason}");
        println!("inspect the queue with `daylog queue status`; `daylog queue drop-head` discards it");
    }
}

fn print_dropped(dropped: Option<&Event>, use_color: bool) {
    match dropped {
        Some(event) => {
            let line = format!(
                "dropped {} from chat {} at {}",
                event.label(),
                event.chat_id,
                event.timestamp.to_rfc3339()
            );
            if use_color {
                use colored::Colorize;
                println!("{}", line.yellow());
            } else {
                println!("{line}");
            }
        }
        None => println!("queue is empty, nothing dropped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_age_minutes() {
        assert_eq!(format_age(120), "2m");
    }

    #[test]
    fn format_age_hours() {
        assert_eq!(format_age(3720), "1h 2m");
    }

    #[test]
    fn format_age_days() {
        assert_eq!(format_age(90060), "1d 1h 1m");
    }

    #[test]
    fn status_response_reports_age() {
        let now = Utc.with_ymd_and_hms(2026, 5, 2, 12, 0, 0).unwrap();
        let status = QueueStatus {
            count: 3,
            oldest: Some(Utc.with_ymd_and_hms(2026, 5, 2, 11, 0, 0).unwrap()),
        };
        let resp = QueueStatusResponse::new(Path::new("/tmp/q.jsonl"), &status, now);
        assert_eq!(resp.oldest_age_secs, Some(3600));

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"count\":3"));
        assert!(json.contains("\"path\":\"/tmp/q.jsonl\""));
    }

    #[test]
    fn empty_status_serializes_nulls() {
        let resp = QueueStatusResponse::new(Path::new("q"), &QueueStatus::default(), Utc::now());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"oldest\":null"));
        assert!(json.contains("\"count\":0"));
    }

    #[test]
    fn flush_response_carries_stall_reason() {
        let report = FlushReport {
            sent: 2,
            left: 1,
            stalled_on: Some("rejected: HTTP 403".into()),
        };
        let json = serde_json::to_string(&FlushResponse::from(&report)).unwrap();
        assert!(json.contains("\"stalled_on\":\"rejected: HTTP 403\""));
    }

    #[tokio::test]
    async fn drop_head_on_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DaylogConfig::default();
        config.queue.data_dir = dir.path().display().to_string();

        run_drop_head(&config, true).await.unwrap();
        assert!(!config.queue.queue_path().exists());
    }
}
