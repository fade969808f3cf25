// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline-button payloads.
//!
//! Wire format: `score:N`, `anxiety`, `next`, `react:<reaction>`.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};

use daylog_core::Score;

/// A social reaction relayed to the other chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Reaction {
    Joy,
    WhiteEnvy,
    BlackEnvy,
    Empathy,
    Schadenfreude,
}

impl Reaction {
    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Reaction::Joy => "💛 Joy",
            Reaction::WhiteEnvy => "🤍 White envy",
            Reaction::BlackEnvy => "🖤 Black envy",
            Reaction::Empathy => "💜 Empathy",
            Reaction::Schadenfreude => "💩 Schadenfreude",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Score(Score),
    Anxiety,
    /// Show the rating keyboard again.
    Next,
    React(Reaction),
}

impl FromStr for CallbackAction {
    type Err = UnknownCallback;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownCallback(data.to_string());
        match data.split_once(':') {
            None => match data {
                "anxiety" => Ok(CallbackAction::Anxiety),
                "next" => Ok(CallbackAction::Next),
                _ => Err(unknown()),
            },
            Some(("score", n)) => n
                .parse::<Score>()
                .map(CallbackAction::Score)
                .map_err(|_| unknown()),
            Some(("react", kind)) => kind
                .parse::<Reaction>()
                .map(CallbackAction::React)
                .map_err(|_| unknown()),
            Some(_) => Err(unknown()),
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Score(score) => write!(f, "score:{score}"),
            CallbackAction::Anxiety => f.write_str("anxiety"),
            CallbackAction::Next => f.write_str("next"),
            CallbackAction::React(reaction) => write!(f, "react:{reaction}"),
        }
    }
}

/// Callback data this bot never produces (stale buttons, other bots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCallback(pub String);

impl fmt::Display for UnknownCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown callback data {:?}", self.0)
    }
}

impl std::error::Error for UnknownCallback {}
