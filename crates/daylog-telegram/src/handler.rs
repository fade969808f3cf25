// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Button presses, free-text scores, and relaying to the other chats.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message, User};
use tracing::{debug, error, warn};

use daylog_core::{Author, ChatNotifier, Event, Score};

use crate::callbacks::CallbackAction;
use crate::{BotState, TelegramNotifier, keyboards, safe, texts};

pub fn author_of(user: &User) -> Author {
    Author {
        user_id: user.id.0,
        username: user.username.clone(),
        name: user.full_name().trim().to_string(),
    }
}

/// A bare number from 1 to 10 typed as a message.
pub fn parse_score_text(text: &str) -> Option<Score> {
    text.trim().parse::<Score>().ok()
}

/// Submits `event` and returns the acknowledgement text, or `None` if the
/// event was lost.
async fn record(state: &BotState, event: &Event) -> Option<String> {
    match state.outbox.submit(event.clone()).await {
        Ok(report) => Some(texts::recorded(event, report)),
        Err(e) => {
            error!(event = %event.label(), chat_id = %event.chat_id, error = %e, "event not recorded");
            None
        }
    }
}

/// Sends `text` to every chat in `chats` except `current`. Returns how many
/// sends succeeded; failures are logged and skipped.
pub async fn notify_others(
    notifier: &dyn ChatNotifier,
    chats: &[i64],
    current: i64,
    text: &str,
) -> usize {
    let mut sent = 0;
    for &chat_id in chats.iter().filter(|&&id| id != current) {
        match notifier.send_text(chat_id, text).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(chat_id, error = %e, "notification not delivered"),
        }
    }
    sent
}

async fn relay(bot: &Bot, state: &BotState, current: i64, text: &str) {
    let chats = match state.sheets.chats().await {
        Ok(chats) => chats,
        Err(e) => {
            warn!(error = %e, "chat list unavailable, notification skipped");
            return;
        }
    };
    let notifier = TelegramNotifier::new(bot.clone());
    let sent = notify_others(&notifier, &chats, current, text).await;
    debug!(sent, known = chats.len(), "notification relayed");
}

async fn relay_event(bot: &Bot, state: &BotState, event: &Event, current: i64) {
    if let Some(text) = texts::event_notification(event) {
        relay(bot, state, current, &text).await;
    }
}

/// Plain messages: a number from 1 to 10 records a score, anything else is ignored.
pub async fn handle_text(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(score) = msg.text().and_then(parse_score_text) else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let event = Event::score(author_of(user), chat_id.0, score);
    let text = record(&state, &event)
        .await
        .unwrap_or_else(|| texts::NOT_RECORDED.to_string());
    safe::send(&bot, chat_id, &text, Some(keyboards::next().into())).await;
    relay_event(&bot, &state, &event, chat_id.0).await;
    Ok(())
}

pub async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let action = match query.data.as_deref().map(str::parse::<CallbackAction>) {
        Some(Ok(action)) => action,
        Some(Err(e)) => {
            debug!(error = %e, "ignoring callback");
            safe::answer(&bot, &query, None).await;
            return Ok(());
        }
        None => {
            safe::answer(&bot, &query, None).await;
            return Ok(());
        }
    };
    let Some((chat_id, message_id)) = query.message.as_ref().map(|m| (m.chat().id, m.id()))
    else {
        safe::answer(&bot, &query, None).await;
        return Ok(());
    };

    let author = author_of(&query.from);
    let event = match action {
        CallbackAction::Score(score) => Event::score(author, chat_id.0, score),
        CallbackAction::Anxiety => Event::anxiety(author, chat_id.0, true),
        CallbackAction::Next => {
            safe::answer(&bot, &query, None).await;
            safe::edit_or_send(
                &bot,
                chat_id,
                message_id,
                texts::RATE_PROMPT,
                keyboards::rate(),
            )
            .await;
            return Ok(());
        }
        CallbackAction::React(reaction) => {
            safe::answer(&bot, &query, Some(texts::REACTION_SENT)).await;
            let text = texts::reaction_notification(&author.display_name(), reaction);
            relay(&bot, &state, chat_id.0, &text).await;
            return Ok(());
        }
    };

    safe::answer(&bot, &query, None).await;
    let text = record(&state, &event)
        .await
        .unwrap_or_else(|| texts::NOT_RECORDED.to_string());
    safe::edit_or_send(&bot, chat_id, message_id, &text, keyboards::next()).await;
    relay_event(&bot, &state, &event, chat_id.0).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylog_test_utils::MockNotifier;

    fn make_user(id: u64, username: Option<&str>, first: &str, last: Option<&str>) -> User {
        let mut json = serde_json::json!({
            "id": id,
            "is_bot": false,
            "first_name": first,
        });
        if let Some(username) = username {
            json["username"] = username.into();
        }
        if let Some(last) = last {
            json["last_name"] = last.into();
        }
        serde_json::from_value(json).expect("failed to deserialize mock user")
    }

    #[test]
    fn author_carries_full_name_and_handle() {
        let author = author_of(&make_user(42, Some("ann"), "Ann", Some("Lee")));
        assert_eq!(author.user_id, 42);
        assert_eq!(author.username.as_deref(), Some("ann"));
        assert_eq!(author.name, "Ann Lee");

        let bare = author_of(&make_user(7, None, "Bo", None));
        assert_eq!(bare.name, "Bo");
        assert!(bare.username.is_none());
    }

    #[test]
    fn free_text_scores() {
        assert_eq!(parse_score_text(" 7 \n").map(Score::get), Some(7));
        assert_eq!(parse_score_text("10").map(Score::get), Some(10));
        assert!(parse_score_text("0").is_none());
        assert!(parse_score_text("11").is_none());
        assert!(parse_score_text("seven").is_none());
        assert!(parse_score_text("7/10").is_none());
    }

    #[tokio::test]
    async fn notify_others_skips_current_chat() {
        let notifier = MockNotifier::new();
        let sent = notify_others(&notifier, &[1, 2, 3], 2, "hello").await;

        assert_eq!(sent, 2);
        assert_eq!(notifier.recipients().await, vec![1, 3]);
    }

    #[tokio::test]
    async fn notify_others_continues_past_failures() {
        let notifier = MockNotifier::new();
        notifier.fail_for(1).await;
        let sent = notify_others(&notifier, &[1, 3, 4], 0, "hi").await;

        assert_eq!(sent, 2);
        assert_eq!(notifier.recipients().await, vec![3, 4]);
    }
}
