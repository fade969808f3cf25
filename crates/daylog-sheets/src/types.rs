// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the spreadsheet web-app.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Every request body: credentials merged with the payload's own fields.
#[derive(Serialize)]
pub(crate) struct Envelope<'a, T: Serialize + ?Sized> {
    pub secret: &'a str,
    #[serde(rename = "sheetName")]
    pub sheet_name: &'a str,
    #[serde(flatten)]
    pub payload: &'a T,
}

/// Query and control requests besides plain event records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Every chat the bot has seen.
    Chats,
    /// Chats with the daily reminder switched on.
    AlarmChats,
    AlarmSet {
        /// Sent as a string, like event records.
        chat_id: String,
        enabled: bool,
    },
    HasRecentActivity {
        hours: u32,
    },
    Stats,
}

/// Raw response body.
///
/// Only `ok` and `error` are common to every action and are all a record
/// delivery looks at. Query fields are decoded on demand by the action that
/// asked for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetsResponse(Value);

impl SheetsResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// `ok: true`. A missing or non-boolean `ok` counts as false.
    pub fn ok(&self) -> bool {
        self.0.get("ok").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `error` field as text, if present and non-empty.
    pub fn error_message(&self) -> Option<String> {
        match self.0.get("error")? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Decodes the query-specific part of the body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }
}

/// `chats` and `alarm_chats` reply.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatsReply {
    #[serde(default, deserialize_with = "lenient_chat_ids")]
    pub chats: Vec<i64>,
}

/// `has_recent_activity` reply.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActivityReply {
    #[serde(default)]
    pub has_recent: Option<bool>,
}

/// `stats` reply.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatsReply {
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: Vec<UserStats>,
}

/// Aggregated figures for one user, as computed by the spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default, alias = "average")]
    pub avg: Option<f64>,
    #[serde(default, alias = "anxiety_count")]
    pub anxiety: u64,
    /// Timestamp of the latest entry, passed through verbatim.
    #[serde(default)]
    pub last: Option<String>,
}

/// Chat ids arrive as strings or numbers; anything else is dropped.
fn lenient_chat_ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i64>, D::Error> {
    let raw: Option<Vec<Value>> = Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect())
}

/// `null` reads as no rows; rows that do not decode are dropped.
fn lenient_stats<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<UserStats>, D::Error> {
    let raw: Option<Vec<Value>> = Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|row| UserStats::deserialize(&row).ok())
        .collect())
}
