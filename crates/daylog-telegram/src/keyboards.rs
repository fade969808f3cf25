// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboards.

use strum::IntoEnumIterator;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use daylog_core::Score;

use crate::callbacks::{CallbackAction, Reaction};

const SCORES_PER_ROW: usize = 4;

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

/// Scores 1 to 10 in rows of four, then the anxiety button.
pub fn rate() -> InlineKeyboardMarkup {
    let scores: Vec<InlineKeyboardButton> = (Score::MIN..=Score::MAX)
        .filter_map(|n| Score::new(n).ok())
        .map(|score| button(score.to_string(), CallbackAction::Score(score)))
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> = scores
        .chunks(SCORES_PER_ROW)
        .map(|row| row.to_vec())
        .collect();
    rows.push(vec![button("😰 Anxiety", CallbackAction::Anxiety)]);
    InlineKeyboardMarkup::new(rows)
}

/// Single "rate again" button shown under an acknowledgement.
pub fn next() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("Rate again", CallbackAction::Next)]])
}

/// One reaction per row.
pub fn react() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Reaction::iter()
            .map(|reaction| vec![button(reaction.label(), CallbackAction::React(reaction))]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
        markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| match &b.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => panic!("unexpected button kind {other:?}"),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn rate_keyboard_layout() {
        let rows = callback_data(&rate());
        assert_eq!(
            rows,
            vec![
                vec!["score:1", "score:2", "score:3", "score:4"],
                vec!["score:5", "score:6", "score:7", "score:8"],
                vec!["score:9", "score:10"],
                vec!["anxiety"],
            ]
        );
    }

    #[test]
    fn react_keyboard_has_one_reaction_per_row() {
        let rows = callback_data(&react());
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.len() == 1));
        assert_eq!(rows[0][0], "react:joy");
        assert_eq!(rows[4][0], "react:schadenfreude");
    }

    #[test]
    fn next_keyboard() {
        assert_eq!(callback_data(&next()), vec![vec!["next"]]);
    }
}
