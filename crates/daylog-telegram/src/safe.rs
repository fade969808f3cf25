// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram calls that retry transient failures and never propagate errors
//! into the handlers.
//!
//! Each call gets up to [`MAX_ATTEMPTS`] tries. Flood control (`RetryAfter`)
//! waits exactly as long as Telegram asks; network failures back off
//! exponentially. Anything else is logged and given up on.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, InlineKeyboardMarkup, MessageId, ReplyMarkup};
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

pub const MAX_ATTEMPTS: u32 = 4;

const BACKOFF_BASE_MS: u64 = 700;

/// Delay before retry number `attempt + 1` after a network failure.
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.min(16)))
}

/// How long to wait before retrying `err`, or `None` when it is not retryable.
pub fn retry_delay(err: &RequestError, attempt: u32) -> Option<Duration> {
    match err {
        RequestError::RetryAfter(secs) => Some(secs.duration()),
        RequestError::Network(_) | RequestError::Io(_) => Some(backoff(attempt)),
        _ => None,
    }
}

fn is_not_modified(err: &RequestError) -> bool {
    matches!(err, RequestError::Api(ApiError::MessageNotModified))
}

async fn with_retries<T, F, Fut>(op: &'static str, mut call: F) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let mut attempt = 0;
    loop {
        let err = match call().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if attempt + 1 >= MAX_ATTEMPTS {
            return Err(err);
        }
        match retry_delay(&err, attempt) {
            Some(delay) => {
                warn!(
                    op,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "telegram call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            None => return Err(err),
        }
    }
}

/// Sends `text`, optionally with a keyboard. Returns whether it went out.
pub async fn send(bot: &Bot, chat_id: ChatId, text: &str, markup: Option<ReplyMarkup>) -> bool {
    let result = with_retries("send_message", || {
        let mut request = bot.send_message(chat_id, text);
        if let Some(markup) = markup.clone() {
            request = request.reply_markup(markup);
        }
        request.into_future()
    })
    .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            warn!(chat_id = chat_id.0, error = %e, "send_message failed");
            false
        }
    }
}

/// Acknowledges a button press so the client stops its spinner.
pub async fn answer(bot: &Bot, query: &CallbackQuery, text: Option<&str>) {
    let result = with_retries("answer_callback_query", || {
        let mut request = bot.answer_callback_query(query.id.clone());
        if let Some(text) = text {
            request = request.text(text);
        }
        request.into_future()
    })
    .await;

    if let Err(e) = result {
        debug!(error = %e, "answer_callback_query failed");
    }
}

/// Replaces the text and keyboard of `message_id`, or sends a fresh message
/// when editing is impossible.
pub async fn edit_or_send(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    markup: InlineKeyboardMarkup,
) -> bool {
    let result = with_retries("edit_message_text", || {
        bot.edit_message_text(chat_id, message_id, text)
            .reply_markup(markup.clone())
            .into_future()
    })
    .await;

    match result {
        Ok(_) => true,
        Err(e) if is_not_modified(&e) => true,
        Err(e) => {
            debug!(chat_id = chat_id.0, error = %e, "edit failed, sending instead");
            send(bot, chat_id, text, Some(markup.into())).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use teloxide::types::Seconds;

    #[test]
    fn backoff_doubles_from_700ms() {
        assert_eq!(backoff(0), Duration::from_millis(700));
        assert_eq!(backoff(1), Duration::from_millis(1400));
        assert_eq!(backoff(2), Duration::from_millis(2800));
    }

    #[test]
    fn retry_after_is_honoured() {
        let err = RequestError::RetryAfter(Seconds::from_seconds(3));
        assert_eq!(retry_delay(&err, 0), Some(Duration::from_secs(3)));
    }

    #[test]
    fn api_errors_are_not_retried() {
        let err = RequestError::Api(ApiError::BotBlocked);
        assert_eq!(retry_delay(&err, 0), None);
        assert!(is_not_modified(&RequestError::Api(
            ApiError::MessageNotModified
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retries("test", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(RequestError::RetryAfter(Seconds::from_seconds(1))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_first_permanent_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = with_retries("test", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(RequestError::Api(ApiError::ChatNotFound)) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_flood_wait() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = with_retries("test", || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(RequestError::RetryAfter(Seconds::from_seconds(5)))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
    }
}
