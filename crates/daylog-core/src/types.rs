// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types: the durable [`Event`] record and delivery outcomes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::DaylogError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Delivery,
    Channel,
}

/// A daily rating in the inclusive range 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a score, rejecting values outside 1..=10.
    pub fn new(value: u8) -> Result<Self, DaylogError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DaylogError::InvalidEvent(format!(
                "score must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = DaylogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl FromStr for Score {
    type Err = DaylogError;

    /// Parses free text such as `" 7 "`. Anything that is not an integer
    /// in range is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| DaylogError::InvalidEvent(format!("not a score: {s:?}")))?;
        Score::new(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub user_id: u64,

    /// Platform handle without the `@`. Sent as `""` when absent.
    #[serde(default, with = "blank_as_none")]
    pub username: Option<String>,

    /// Full display name (`first last`, trimmed). May be empty.
    #[serde(default)]
    pub name: String,
}

impl Author {
    /// Human-facing name: the full name, else `@username`, else the numeric id.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => format!("@{username}"),
            _ => self.user_id.to_string(),
        }
    }
}

/// What the user did. Each known variant carries only the fields valid for it.
///
/// [`EventKind::Other`] holds any stored record that does not decode as a
/// known kind (an unfamiliar `kind`, a legacy out-of-range score). Its fields
/// are kept verbatim so the record can still be delivered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireKind", into = "WireKind")]
pub enum EventKind {
    Score { score: Score },
    Anxiety { anxiety: bool },
    Start,
    Other(Map<String, Value>),
}

impl EventKind {
    /// The `kind` tag as sent on the wire.
    pub fn name(&self) -> &str {
        match self {
            EventKind::Score { .. } => "score",
            EventKind::Anxiety { .. } => "anxiety",
            EventKind::Start => "start",
            EventKind::Other(fields) => fields
                .get("kind")
                .and_then(Value::as_str)
                .unwrap_or("other"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum KnownKind {
    Score { score: Score },
    Anxiety { anxiety: bool },
    Start,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireKind {
    Known(KnownKind),
    Other(Map<String, Value>),
}

impl From<WireKind> for EventKind {
    fn from(wire: WireKind) -> Self {
        match wire {
            WireKind::Known(KnownKind::Score { score }) => EventKind::Score { score },
            WireKind::Known(KnownKind::Anxiety { anxiety }) => EventKind::Anxiety { anxiety },
            WireKind::Known(KnownKind::Start) => EventKind::Start,
            WireKind::Other(fields) => EventKind::Other(fields),
        }
    }
}

impl From<EventKind> for WireKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Score { score } => WireKind::Known(KnownKind::Score { score }),
            EventKind::Anxiety { anxiety } => WireKind::Known(KnownKind::Anxiety { anxiety }),
            EventKind::Start => WireKind::Known(KnownKind::Start),
            EventKind::Other(fields) => WireKind::Other(fields),
        }
    }
}

/// One user action awaiting durable delivery to the remote endpoint.
///
/// Serializes to a single flat JSON object, e.g.
/// `{"timestamp":"…","user_id":1,"username":"","name":"Ann","chat_id":"42","kind":"score","score":7}`.
/// Events are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub author: Author,
    #[serde(deserialize_with = "chat_id_text")]
    pub chat_id: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Creates an event stamped with the current UTC time.
    pub fn new(author: Author, chat_id: i64, kind: EventKind) -> Self {
        Self::at(Utc::now(), author, chat_id, kind)
    }

    /// Creates an event with an explicit timestamp.
    pub fn at(timestamp: DateTime<Utc>, author: Author, chat_id: i64, kind: EventKind) -> Self {
        Self {
            timestamp,
            author,
            chat_id: chat_id.to_string(),
            kind,
        }
    }

    pub fn score(author: Author, chat_id: i64, score: Score) -> Self {
        Self::new(author, chat_id, EventKind::Score { score })
    }

    pub fn anxiety(author: Author, chat_id: i64, anxiety: bool) -> Self {
        Self::new(author, chat_id, EventKind::Anxiety { anxiety })
    }

    pub fn start(author: Author, chat_id: i64) -> Self {
        Self::new(author, chat_id, EventKind::Start)
    }

    /// Short label used in logs: `score=7`, `anxiety=true`, `start`.
    /// Unrecognised records are labelled by their raw `kind`.
    pub fn label(&self) -> String {
        match &self.kind {
            EventKind::Score { score } => format!("score={score}"),
            EventKind::Anxiety { anxiety } => format!("anxiety={anxiety}"),
            EventKind::Start => "start".to_string(),
            other => other.name().to_string(),
        }
    }
}

/// Result of a single delivery attempt against the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint accepted the event.
    Success,
    /// The endpoint was reachable but refused the event. Not retried by
    /// the delivery client.
    Rejected(String),
    /// Network, timeout, or DNS failure. Retry-eligible.
    TransientFailure(String),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Success => None,
            DeliveryOutcome::Rejected(reason) | DeliveryOutcome::TransientFailure(reason) => {
                Some(reason)
            }
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Success => write!(f, "success"),
            DeliveryOutcome::Rejected(reason) => write!(f, "rejected: {reason}"),
            DeliveryOutcome::TransientFailure(reason) => write!(f, "transient failure: {reason}"),
        }
    }
}

/// Chat ids are written as strings; older records may carry a bare integer.
fn chat_id_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_i64() => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "chat_id must be a string or integer, got {other}"
        ))),
    }
}

/// Serializes `None` as `""` and reads `""` back as `None`.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value: Option<String> = Option::deserialize(d)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}
