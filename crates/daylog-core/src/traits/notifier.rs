// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound text notifications to chats.

use async_trait::async_trait;

use crate::error::DaylogError;
use crate::traits::adapter::PluginAdapter;

/// Sends plain text to a chat by numeric id.
///
/// Used for social relays between chats and for the daily reminder.
#[async_trait]
pub trait ChatNotifier: PluginAdapter {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DaylogError>;
}
