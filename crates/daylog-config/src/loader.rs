// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./daylog.toml` > `~/.config/daylog/daylog.toml` > `/etc/daylog/daylog.toml`
//! with environment variable overrides via the `DAYLOG_` prefix and the
//! bare deployment variables (`BOT_TOKEN`, `SHEETS_WEBAPP_URL`, ...).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DaylogConfig;

/// Bare environment variables accepted for container deployments.
pub const DEPLOYMENT_ENV_VARS: &[&str] =
    &["BOT_TOKEN", "SHEETS_WEBAPP_URL", "SHEETS_SECRET", "WORKSHEET_NAME"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/daylog/daylog.toml` (system-wide)
/// 3. `~/.config/daylog/daylog.toml` (user XDG config)
/// 4. `./daylog.toml` (local directory)
/// 5. Deployment variables (`BOT_TOKEN`, `SHEETS_*`, `WORKSHEET_NAME`)
/// 6. `DAYLOG_*` environment variables
pub fn load_config() -> Result<DaylogConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DaylogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DaylogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DaylogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DaylogConfig::default()))
        .merge(Toml::file(path))
        .merge(deployment_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DaylogConfig::default()))
        .merge(Toml::file("/etc/daylog/daylog.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("daylog/daylog.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("daylog.toml"))
        .merge(deployment_env_provider())
        .merge(env_provider())
}

/// Create the `DAYLOG_*` provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `DAYLOG_SHEETS_WEBAPP_URL` must become `sheets.webapp_url`,
/// not `sheets.webapp.url`.
fn env_provider() -> Env {
    Env::prefixed("DAYLOG_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = map_section_key(&key_str);
        mapped.into()
    })
}

/// Maps the bare deployment variables onto their config keys.
fn deployment_env_provider() -> Env {
    Env::raw().only(DEPLOYMENT_ENV_VARS).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = match key_str.as_str() {
            "bot_token" => "telegram.bot_token".to_string(),
            "sheets_webapp_url" => "sheets.webapp_url".to_string(),
            "sheets_secret" => "sheets.secret".to_string(),
            "worksheet_name" => "sheets.worksheet_name".to_string(),
            other => other.to_string(),
        };
        mapped.into()
    })
}

/// `sheets_webapp_url` -> `sheets.webapp_url`. Only the first section prefix is rewritten.
pub(crate) fn map_section_key(key: &str) -> String {
    for section in ["bot", "telegram", "sheets", "queue", "reminder"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_prefix_becomes_dot() {
        assert_eq!(map_section_key("sheets_webapp_url"), "sheets.webapp_url");
        assert_eq!(map_section_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(
            map_section_key("queue_flush_interval_secs"),
            "queue.flush_interval_secs"
        );
        assert_eq!(map_section_key("bot_log_level"), "bot.log_level");
    }

    #[test]
    fn unknown_prefix_is_left_alone() {
        assert_eq!(map_section_key("storage_path"), "storage_path");
    }
}
