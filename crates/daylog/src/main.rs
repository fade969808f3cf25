// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! daylog - a Telegram bot that keeps a daily log in a spreadsheet.
//!
//! This is the binary entry point.

mod queue;
mod reminder;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use daylog_config::DaylogConfig;

/// daylog - a Telegram bot that keeps a daily log in a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "daylog", version, about, long_about = None)]
struct Cli {
    /// Load this config file (plus environment) instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the bot, the flush scheduler and the reminder (default).
    Serve,
    /// Deliver queued events once and exit.
    Flush {
        /// Print JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Inspect or repair the pending queue.
    Queue {
        #[command(subcommand)]
        action: QueueCommands,
    },
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum QueueCommands {
    /// Show pending count and the oldest event's age.
    Status {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        plain: bool,
    },
    /// Discard the head event (use when it is permanently rejected).
    DropHead {
        #[arg(long)]
        plain: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> DaylogConfig {
    let loaded = match path {
        Some(path) => {
            if !path.is_file() {
                eprintln!("error: config file {} not found", path.display());
                std::process::exit(1);
            }
            daylog_config::load_and_validate_path(path)
        }
        None => daylog_config::load_and_validate(),
    };

    match loaded {
        Ok(config) => config,
        Err(errors) => {
            daylog_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn print_config_summary(config: &DaylogConfig) {
    let set = |v: &Option<String>| if v.is_some() { "set" } else { "missing" };
    println!("daylog: config OK (bot.name={})", config.bot.name);
    println!("  telegram.bot_token:  {}", set(&config.telegram.bot_token));
    println!("  sheets.webapp_url:   {}", set(&config.sheets.webapp_url));
    println!("  sheets.secret:       {}", set(&config.sheets.secret));
    println!("  sheets.worksheet:    {}", config.sheets.worksheet_name);
    println!("  queue file:          {}", config.queue.queue_path().display());
    if config.reminder.enabled {
        println!(
            "  reminder:            {} (UTC{:+} min)",
            config.reminder.time, config.reminder.utc_offset_minutes
        );
    } else {
        println!("  reminder:            disabled");
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    let command = cli.command.unwrap_or(Commands::Serve);

    if command == Commands::CheckConfig {
        print_config_summary(&config);
        return;
    }

    serve::init_tracing(&config.bot.log_level);

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Flush { json, plain } => queue::run_flush(&config, json, plain).await,
        Commands::Queue {
            action: QueueCommands::Status { json, plain },
        } => queue::run_queue_status(&config, json, plain).await,
        Commands::Queue {
            action: QueueCommands::DropHead { plain },
        } => queue::run_drop_head(&config, plain).await,
        Commands::CheckConfig => Ok(()),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
