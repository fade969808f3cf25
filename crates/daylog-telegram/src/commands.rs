// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{KeyboardRemove, Message, ReplyMarkup};
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use daylog_core::{Event, HealthStatus, PluginAdapter};

use crate::handler::author_of;
use crate::texts::{self, DebugInfo};
use crate::{BotState, keyboards, safe};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "show help")]
    Start,
    #[command(description = "rate your day")]
    Rate,
    #[command(description = "statistics for everyone")]
    Stats,
    #[command(description = "send a reaction to the other chats")]
    React,
    #[command(description = "turn the daily reminder on")]
    AlarmOn,
    #[command(description = "turn the daily reminder off")]
    AlarmOff,
    #[command(description = "sheet and queue health")]
    Health,
    #[command(description = "pending queue")]
    Queue,
    #[command(description = "deliver queued events now")]
    Flush,
    #[command(description = "chat and bot details")]
    Debug,
}

pub async fn handle(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    info!(chat_id = chat_id.0, command = ?cmd, "command");

    match cmd {
        Command::Start => {
            if let Some(user) = msg.from.as_ref() {
                let event = Event::start(author_of(user), chat_id.0);
                if let Err(e) = state.outbox.submit(event).await {
                    warn!(chat_id = chat_id.0, error = %e, "start event not recorded");
                }
            }
            let remove = ReplyMarkup::KeyboardRemove(KeyboardRemove::new());
            safe::send(&bot, chat_id, texts::HELP, Some(remove)).await;
        }
        Command::Rate => {
            safe::send(
                &bot,
                chat_id,
                texts::RATE_PROMPT,
                Some(keyboards::rate().into()),
            )
            .await;
        }
        Command::React => {
            safe::send(
                &bot,
                chat_id,
                texts::REACT_PROMPT,
                Some(keyboards::react().into()),
            )
            .await;
        }
        Command::Stats => {
            let text = match state.sheets.stats().await {
                Ok(rows) => texts::stats(&rows),
                Err(e) => {
                    warn!(error = %e, "stats query failed");
                    texts::REMOTE_UNAVAILABLE.to_string()
                }
            };
            safe::send(&bot, chat_id, &text, None).await;
        }
        Command::AlarmOn | Command::AlarmOff => {
            let enabled = cmd == Command::AlarmOn;
            let text = match state.sheets.alarm_set(chat_id.0, enabled).await {
                Ok(()) => texts::alarm(enabled),
                Err(e) => {
                    warn!(chat_id = chat_id.0, enabled, error = %e, "alarm_set failed");
                    texts::REMOTE_UNAVAILABLE
                }
            };
            safe::send(&bot, chat_id, text, None).await;
        }
        Command::Health => {
            let remote = state
                .sheets
                .health_check()
                .await
                .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
            let queue_status = match state.outbox.queue_status().await {
                Ok(status) => Some(status),
                Err(e) => {
                    warn!(error = %e, "queue status failed");
                    None
                }
            };
            let text = texts::health(&remote, queue_status.as_ref());
            safe::send(&bot, chat_id, &text, None).await;
        }
        Command::Queue => {
            let text = match state.outbox.queue_status().await {
                Ok(status) => texts::queue(&status),
                Err(e) => {
                    warn!(error = %e, "queue status failed");
                    format!("Queue unreadable: {e}")
                }
            };
            safe::send(&bot, chat_id, &text, None).await;
        }
        Command::Flush => {
            let text = match state.outbox.flush_once().await {
                Ok(report) => texts::flush(&report),
                Err(e) => {
                    warn!(error = %e, "manual flush failed");
                    format!("Flush failed: {e}")
                }
            };
            safe::send(&bot, chat_id, &text, None).await;
        }
        Command::Debug => {
            let text = texts::debug(&DebugInfo {
                chat_id: chat_id.0,
                user_id: msg.from.as_ref().map(|u| u.id.0),
                worksheet: state.sheets.worksheet_name(),
                queue_path: &state.queue_path,
                flush_interval_secs: state.flush_interval_secs,
            });
            safe::send(&bot, chat_id, &text, None).await;
        }
    }

    Ok(())
}
