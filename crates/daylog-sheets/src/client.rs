// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the spreadsheet web-app.
//!
//! [`SheetsClient`] posts JSON with the shared secret and worksheet name
//! merged in, and classifies the answer. It never retries; ordering and
//! redelivery belong to the outbox.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use daylog_config::model::SheetsConfig;
use daylog_core::DaylogError;

use crate::error::SheetsError;
use crate::types::{
    Action, ActivityReply, ChatsReply, Envelope, SheetsResponse, StatsReply, UserStats,
};

/// Response bodies are logged up to this many characters.
const LOGGED_BODY_CHARS: usize = 200;

#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    url: String,
    secret: String,
    sheet_name: String,
}

impl fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsClient")
            .field("url", &self.url)
            .field("secret", &"<redacted>")
            .field("sheet_name", &self.sheet_name)
            .finish()
    }
}

impl SheetsClient {
    pub fn new(
        url: impl Into<String>,
        secret: impl Into<String>,
        sheet_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DaylogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DaylogError::Remote {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: url.into(),
            secret: secret.into(),
            sheet_name: sheet_name.into(),
        })
    }

    /// Builds a client from `[sheets]`. Both the URL and the secret are required.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, DaylogError> {
        let url = config
            .webapp_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                DaylogError::Config(
                    "sheets.webapp_url is not set (or SHEETS_WEBAPP_URL)".to_string(),
                )
            })?;
        let secret = config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                DaylogError::Config("sheets.secret is not set (or SHEETS_SECRET)".to_string())
            })?;

        Self::new(
            url.trim(),
            secret,
            config.worksheet_name.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn worksheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Posts one payload and classifies the answer.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SheetsResponse, SheetsError> {
        let envelope = Envelope {
            secret: &self.secret,
            sheet_name: &self.sheet_name,
            payload,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&envelope)
            .send()
            .await
            .map_err(SheetsError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(SheetsError::Transport)?;
        info!(
            status = status.as_u16(),
            body = truncate_chars(&body, LOGGED_BODY_CHARS),
            "sheets response"
        );

        if !status.is_success() {
            return Err(SheetsError::Status(status.as_u16()));
        }

        let parsed = serde_json::from_str(&body)
            .map(SheetsResponse::new)
            .map_err(SheetsError::BadJson)?;
        if !parsed.ok() {
            return Err(SheetsError::NotOk(
                parsed.error_message().unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        Ok(parsed)
    }

    /// Posts a query action and decodes the fields it answers with.
    async fn query<T: DeserializeOwned>(&self, action: &Action) -> Result<T, DaylogError> {
        let response = self.post(action).await?;
        Ok(response.decode().map_err(SheetsError::BadJson)?)
    }

    /// Every chat id known to the sheet.
    pub async fn chats(&self) -> Result<Vec<i64>, DaylogError> {
        let reply: ChatsReply = self.query(&Action::Chats).await?;
        Ok(reply.chats)
    }

    /// Chats that asked for the daily reminder.
    pub async fn alarm_chats(&self) -> Result<Vec<i64>, DaylogError> {
        let reply: ChatsReply = self.query(&Action::AlarmChats).await?;
        Ok(reply.chats)
    }

    pub async fn alarm_set(&self, chat_id: i64, enabled: bool) -> Result<(), DaylogError> {
        self.post(&Action::AlarmSet {
            chat_id: chat_id.to_string(),
            enabled,
        })
        .await?;
        debug!(chat_id, enabled, "reminder preference stored");
        Ok(())
    }

    /// Whether anyone logged something within the last `hours`.
    pub async fn has_recent_activity(&self, hours: u32) -> Result<bool, DaylogError> {
        let reply: ActivityReply = self.query(&Action::HasRecentActivity { hours }).await?;
        Ok(reply.has_recent.unwrap_or(false))
    }

    pub async fn stats(&self) -> Result<Vec<UserStats>, DaylogError> {
        let reply: StatsReply = self.query(&Action::Stats).await?;
        Ok(reply.stats)
    }
}

/// Cuts `s` to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> SheetsClient {
        SheetsClient::new(base_url, "test-secret", "Sheet1", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn debug_output_redacts_secret() {
        let client = test_client("https://example.com/exec");
        let debug = format!("{client:?}");
        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("короткий", 100), "короткий");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn from_config_requires_url_and_secret() {
        let mut config = SheetsConfig::default();
        assert!(matches!(
            SheetsClient::from_config(&config),
            Err(DaylogError::Config(_))
        ));

        config.webapp_url = Some("https://example.com/exec".into());
        assert!(SheetsClient::from_config(&config).is_err());

        config.secret = Some("s".into());
        let client = SheetsClient::from_config(&config).unwrap();
        assert_eq!(client.worksheet_name(), "Sheet1");
    }

    #[tokio::test]
    async fn chats_action_is_enveloped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "secret": "test-secret",
                "sheetName": "Sheet1",
                "action": "chats"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "chats": ["1", 2, "x"]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let chats = test_client(&server.uri()).chats().await.unwrap();
        assert_eq!(chats, vec![1, 2]);
    }

    #[tokio::test]
    async fn alarm_set_sends_chat_id_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "alarm_set",
                "chat_id": "-1001",
                "enabled": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .alarm_set(-1001, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn has_recent_activity_defaults_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"action": "has_recent_activity", "hours": 24})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let recent = test_client(&server.uri())
            .has_recent_activity(24)
            .await
            .unwrap();
        assert!(!recent);
    }

    #[tokio::test]
    async fn stats_tolerate_null_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"action": "stats"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "stats": null})))
            .mount(&server)
            .await;

        assert!(test_client(&server.uri()).stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_failure_becomes_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "bad secret"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).stats().await.unwrap_err();
        assert!(
            matches!(err, DaylogError::Remote { ref message, .. } if message == "bad secret"),
            "got: {err:?}"
        );
    }
}
