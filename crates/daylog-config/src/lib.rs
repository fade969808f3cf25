// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the daylog bot.
//!
//! TOML files are merged along the XDG hierarchy, then overridden by
//! environment variables. Unknown keys are rejected (`deny_unknown_fields`)
//! and reported through miette with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use daylog_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("queue file: {}", config.queue.queue_path().display());
//! ```

#![allow(clippy::result_large_err)]

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::DaylogConfig;

/// Loads the layered configuration and validates it.
///
/// Deserialization failures become diagnostics with source spans; a
/// well-formed config then goes through [`validation::validate_config`].
pub fn load_and_validate() -> Result<DaylogConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => validated(config),
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Loads configuration from one explicit file (plus env overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<DaylogConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => validated(config),
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Loads configuration from a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<DaylogConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validated(config),
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

fn validated(config: DaylogConfig) -> Result<DaylogConfig, Vec<ConfigError>> {
    validation::validate_config(&config)?;
    Ok(config)
}

/// Reads whichever hierarchy files exist, for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = Vec::new();

    match std::env::current_dir() {
        Ok(dir) => candidates.push(dir.join("daylog.toml")),
        Err(_) => candidates.push("daylog.toml".into()),
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("daylog/daylog.toml"));
    }
    candidates.push("/etc/daylog/daylog.toml".into());

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
