// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram front-end for daylog.
//!
//! Long-polls the Bot API via teloxide, turns button presses and commands
//! into events for the [`Outbox`], and relays notifications between chats.
//! [`TelegramNotifier`] exposes plain sends as a [`ChatNotifier`] for the
//! reminder job.

pub mod callbacks;
pub mod commands;
pub mod handler;
pub mod keyboards;
pub mod safe;
pub mod texts;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{ChatId, Update};
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use daylog_config::model::{QueueConfig, TelegramConfig};
use daylog_core::{AdapterType, ChatNotifier, DaylogError, HealthStatus, PluginAdapter};
use daylog_outbox::Outbox;
use daylog_sheets::SheetsClient;

pub use commands::Command;

/// Shared by every update handler.
pub struct BotState {
    pub outbox: Outbox,
    pub sheets: SheetsClient,
    pub queue_path: PathBuf,
    pub flush_interval_secs: u64,
}

impl BotState {
    pub fn new(outbox: Outbox, sheets: SheetsClient, queue: &QueueConfig) -> Self {
        Self {
            outbox,
            sheets,
            queue_path: queue.queue_path(),
            flush_interval_secs: queue.flush_interval_secs,
        }
    }
}

/// The polling bot.
pub struct TelegramBot {
    bot: Bot,
}

impl TelegramBot {
    /// Requires `telegram.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, DaylogError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            DaylogError::Config("telegram.bot_token is not set (or BOT_TOKEN)".into())
        })?;

        if token.trim().is_empty() {
            return Err(DaylogError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token.trim()),
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn notifier(&self) -> TelegramNotifier {
        TelegramNotifier::new(self.bot.clone())
    }

    /// Polls for updates until `cancel` fires.
    pub async fn run(&self, state: Arc<BotState>, cancel: CancellationToken) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "could not register bot commands");
        }
        if cancel.is_cancelled() {
            return;
        }

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), schema())
            .dependencies(dptree::deps![state])
            .default_handler(|_| async {})
            .build();

        let token = dispatcher.shutdown_token();
        let watcher = tokio::spawn(async move {
            cancel.cancelled().await;
            match token.shutdown() {
                Ok(done) => done.await,
                Err(_) => debug!("dispatcher was idle at shutdown"),
            }
        });

        info!("starting Telegram long polling");
        dispatcher.dispatch().await;
        watcher.abort();
        info!("Telegram polling stopped");
    }
}

/// Update routing: commands first, then bare-number messages, then buttons.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(commands::handle),
        )
        .branch(Update::filter_message().endpoint(handler::handle_text))
        .branch(Update::filter_callback_query().endpoint(handler::handle_callback))
}

/// [`ChatNotifier`] over the Bot API with retrying sends.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl PluginAdapter for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, DaylogError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }
}

#[async_trait]
impl ChatNotifier for TelegramNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DaylogError> {
        if safe::send(&self.bot, ChatId(chat_id), text, None).await {
            Ok(())
        } else {
            Err(DaylogError::Channel {
                message: format!("message to chat {chat_id} not delivered"),
                source: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig { bot_token: None };
        assert!(matches!(
            TelegramBot::new(&config),
            Err(DaylogError::Config(_))
        ));
    }

    #[test]
    fn new_rejects_blank_token() {
        let config = TelegramConfig {
            bot_token: Some("  ".into()),
        };
        assert!(TelegramBot::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        assert!(TelegramBot::new(&config).is_ok());
    }

    #[test]
    fn notifier_metadata() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        let notifier = TelegramBot::new(&config).unwrap().notifier();
        assert_eq!(notifier.name(), "telegram");
        assert_eq!(notifier.adapter_type(), AdapterType::Channel);
    }
}
