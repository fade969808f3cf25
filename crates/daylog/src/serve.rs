// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `daylog serve` command implementation.
//!
//! Wires the sheet client, the outbox, the background flush scheduler, the
//! daily reminder and the Telegram poller together, then runs until
//! SIGINT/SIGTERM. Background tasks share one cancellation token and are
//! joined before returning.

use std::sync::Arc;

use tracing::{info, warn};

use daylog_config::DaylogConfig;
use daylog_core::{DaylogError, DeliveryAdapter};
use daylog_outbox::{FlushScheduler, Outbox};
use daylog_sheets::SheetsClient;
use daylog_telegram::{BotState, TelegramBot};

use crate::reminder::ReminderJob;
use crate::shutdown;

/// Runs the `daylog serve` command.
pub async fn run_serve(config: DaylogConfig) -> Result<(), DaylogError> {
    info!(name = %config.bot.name, "starting daylog serve");

    let bot = TelegramBot::new(&config.telegram)?;
    let sheets = SheetsClient::from_config(&config.sheets)?;
    info!(worksheet = sheets.worksheet_name(), "sheet client ready");

    let delivery: Arc<dyn DeliveryAdapter> = Arc::new(sheets.clone());
    let outbox = Outbox::from_config(&config.queue, delivery);
    match outbox.queue_status().await {
        Ok(status) if status.count > 0 => {
            info!(pending = status.count, oldest = ?status.oldest, "queued events from a previous run");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "queue file unreadable at startup"),
    }

    let cancel = shutdown::install_signal_handler();

    let scheduler =
        FlushScheduler::from_config(outbox.flusher(), &config.queue).spawn(cancel.clone());
    info!(
        first_delay_secs = config.queue.first_flush_delay_secs,
        interval_secs = config.queue.flush_interval_secs,
        "flush scheduler started"
    );

    let reminder = if config.reminder.enabled {
        let job = ReminderJob::from_config(
            &config.reminder,
            Arc::new(sheets.clone()),
            Arc::new(bot.notifier()),
        )?;
        info!(
            time = %config.reminder.time,
            utc_offset_minutes = config.reminder.utc_offset_minutes,
            next = %job.next_fire(chrono::Utc::now()),
            "reminder enabled"
        );
        Some(job.spawn(cancel.clone()))
    } else {
        info!("reminder disabled");
        None
    };

    let state = Arc::new(BotState::new(outbox, sheets, &config.queue));
    bot.run(state, cancel.clone()).await;

    // Polling can also stop on its own; take the background tasks down with it.
    cancel.cancel();
    if let Err(e) = scheduler.await {
        warn!(error = %e, "flush scheduler task failed");
    }
    if let Some(handle) = reminder {
        if let Err(e) = handle.await {
            warn!(error = %e, "reminder task failed");
        }
    }

    info!("daylog serve shutdown complete");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` wins over `bot.log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("daylog={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
