// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing message texts.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};

use daylog_core::{Event, EventKind, HealthStatus};
use daylog_outbox::{FlushReport, QueueStatus, SubmitReport};
use daylog_sheets::UserStats;

use crate::callbacks::Reaction;

pub const HELP: &str = "Hi! I keep a daily log of how your day went.\n\n\
/rate - rate your day from 1 to 10 or flag anxiety\n\
/stats - statistics for everyone\n\
/react - send a reaction to the other chats\n\
/alarm_on, /alarm_off - daily reminder\n\n\
You can also just send a number from 1 to 10.";

pub const RATE_PROMPT: &str = "How was your day?";
pub const REACT_PROMPT: &str = "Pick a reaction:";
pub const NOT_RECORDED: &str = "Could not record that, please try again later.";
pub const REMOTE_UNAVAILABLE: &str = "The log is unavailable right now, try again later.";
pub const NO_STATS: &str = "No entries yet.";
pub const REACTION_SENT: &str = "Sent!";

fn when(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Acknowledgement shown in place of the keyboard after an event is recorded.
pub fn recorded(event: &Event, report: SubmitReport) -> String {
    let what = match &event.kind {
        EventKind::Score { score } => format!("Recorded: {score}/10"),
        EventKind::Anxiety { .. } => "Recorded: anxiety".to_string(),
        EventKind::Start | EventKind::Other(_) => "Recorded".to_string(),
    };
    if report.queued {
        format!("{what} (sync pending)")
    } else {
        what
    }
}

/// Relayed to the other chats.
pub fn event_notification(event: &Event) -> Option<String> {
    let who = event.author.display_name();
    match &event.kind {
        EventKind::Score { score } => Some(format!("{who} rated the day: {score}/10")),
        EventKind::Anxiety { .. } => Some(format!("{who} is feeling anxious 😰")),
        EventKind::Start | EventKind::Other(_) => None,
    }
}

pub fn reaction_notification(who: &str, reaction: Reaction) -> String {
    format!("{who} reacts: {}", reaction.label())
}

pub fn alarm(enabled: bool) -> &'static str {
    if enabled {
        "Daily reminder is on."
    } else {
        "Daily reminder is off."
    }
}

pub fn stats(rows: &[UserStats]) -> String {
    if rows.is_empty() {
        return NO_STATS.to_string();
    }
    let mut out = String::from("Stats:");
    for row in rows {
        let name = if row.name.is_empty() { "?" } else { &row.name };
        let avg = row
            .avg
            .map(|a| format!("{a:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = write!(
            out,
            "\n{name}: {} entries, avg {avg}, anxiety {}",
            row.count, row.anxiety
        );
        if let Some(last) = row.last.as_deref().filter(|l| !l.is_empty()) {
            let _ = write!(out, ", last {last}");
        }
    }
    out
}

pub fn queue(status: &QueueStatus) -> String {
    match status.oldest {
        Some(oldest) if status.count > 0 => {
            format!("Queued: {} (oldest {})", status.count, when(oldest))
        }
        _ => format!("Queued: {}", status.count),
    }
}

pub fn flush(report: &FlushReport) -> String {
    let mut out = format!("Flushed: sent {}, left {}", report.sent, report.left);
    if let Some(reason) = &report.stalled_on {
        let _ = write!(out, "\nHead is stuck: {reason}");
    }
    out
}

pub fn health(remote: &HealthStatus, queue_status: Option<&QueueStatus>) -> String {
    let remote = match remote {
        HealthStatus::Healthy => "ok".to_string(),
        HealthStatus::Degraded(reason) => format!("degraded ({reason})"),
        HealthStatus::Unhealthy(reason) => format!("unreachable ({reason})"),
    };
    let queue_line = match queue_status {
        Some(status) => queue(status),
        None => "Queued: unknown".to_string(),
    };
    format!("Sheet: {remote}\n{queue_line}")
}

pub struct DebugInfo<'a> {
    pub chat_id: i64,
    pub user_id: Option<u64>,
    pub worksheet: &'a str,
    pub queue_path: &'a Path,
    pub flush_interval_secs: u64,
}

pub fn debug(info: &DebugInfo<'_>) -> String {
    let user = info
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "chat_id: {}\nuser_id: {user}\nworksheet: {}\nqueue: {}\nflush every: {}s",
        info.chat_id,
        info.worksheet,
        info.queue_path.display(),
        info.flush_interval_secs
    )
}
