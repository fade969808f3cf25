// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily reminder.
//!
//! Once a day at a fixed local time, chats that opted in get a nudge unless
//! somebody already logged something within the quiet window.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use daylog_config::model::ReminderConfig;
use daylog_core::{ChatNotifier, DaylogError};
use daylog_sheets::SheetsClient;

/// Where the reminder learns who to remind and whether to bother.
#[async_trait]
pub trait ReminderSource: Send + Sync {
    async fn has_recent_activity(&self, hours: u32) -> Result<bool, DaylogError>;
    async fn alarm_chats(&self) -> Result<Vec<i64>, DaylogError>;
}

#[async_trait]
impl ReminderSource for SheetsClient {
    async fn has_recent_activity(&self, hours: u32) -> Result<bool, DaylogError> {
        SheetsClient::has_recent_activity(self, hours).await
    }

    async fn alarm_chats(&self) -> Result<Vec<i64>, DaylogError> {
        SheetsClient::alarm_chats(self).await
    }
}

/// First instant strictly after `now` whose wall-clock time in `offset` is `at`.
pub fn next_fire(now: DateTime<Utc>, at: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local_today = now.with_timezone(&offset).date_naive().and_time(at);
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    let candidate = (local_today - shift).and_utc();
    if candidate > now {
        candidate
    } else {
        candidate + TimeDelta::days(1)
    }
}

pub struct ReminderJob {
    source: Arc<dyn ReminderSource>,
    notifier: Arc<dyn ChatNotifier>,
    at: NaiveTime,
    offset: FixedOffset,
    quiet_hours: u32,
    text: String,
}

impl ReminderJob {
    pub fn from_config(
        config: &ReminderConfig,
        source: Arc<dyn ReminderSource>,
        notifier: Arc<dyn ChatNotifier>,
    ) -> Result<Self, DaylogError> {
        let at = config.local_time().ok_or_else(|| {
            DaylogError::Config(format!("reminder.time {:?} is not HH:MM", config.time))
        })?;
        let offset = config.offset().ok_or_else(|| {
            DaylogError::Config(format!(
                "reminder.utc_offset_minutes {} is out of range",
                config.utc_offset_minutes
            ))
        })?;

        Ok(Self {
            source,
            notifier,
            at,
            offset,
            quiet_hours: config.quiet_hours,
            text: config.text.clone(),
        })
    }

    pub fn next_fire(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        next_fire(now, self.at, self.offset)
    }

    /// Runs one reminder round. Returns how many chats were reminded.
    ///
    /// A failed activity check does not suppress the reminder.
    pub async fn fire(&self) -> usize {
        match self.source.has_recent_activity(self.quiet_hours).await {
            Ok(true) => {
                info!(quiet_hours = self.quiet_hours, "recent activity, reminder skipped");
                return 0;
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "activity check failed, reminding anyway"),
        }

        let chats = match self.source.alarm_chats().await {
            Ok(chats) => chats,
            Err(e) => {
                warn!(error = %e, "reminder chat list unavailable");
                return 0;
            }
        };

        let mut sent = 0;
        for chat_id in chats {
            match self.notifier.send_text(chat_id, &self.text).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(chat_id, error = %e, "reminder not delivered"),
            }
        }
        info!(sent, "reminder round finished");
        sent
    }

    /// Sleeps until each daily fire time and runs a round, until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = self.next_fire(now);
                let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                debug!(next = %next, "reminder scheduled");

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        self.fire().await;
                    }
                    _ = cancel.cancelled() => {
                        info!("reminder task shutting down");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use daylog_test_utils::MockNotifier;
    use tokio::sync::Mutex;

    fn msk() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn nine_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(21, 0, 0).unwrap()
    }

    #[test]
    fn fires_later_today_when_time_not_reached() {
        // 12:00 UTC is 15:00 in UTC+3.
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(
            next_fire(now, nine_pm(), msk()),
            Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn fires_tomorrow_once_time_passed() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap();
        assert_eq!(
            next_fire(now, nine_pm(), msk()),
            Utc.with_ymd_and_hms(2026, 5, 2, 18, 0, 0).unwrap()
        );
    }

    #[test]
    fn local_date_differs_from_utc_date() {
        // 22:30 UTC on May 1 is already 01:30 on May 2 in UTC+3.
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 22, 30, 0).unwrap();
        let at = NaiveTime::from_hms_opt(0, 15, 0).unwrap();
        assert_eq!(
            next_fire(now, at, msk()),
            Utc.with_ymd_and_hms(2026, 5, 2, 21, 15, 0).unwrap()
        );
    }

    #[test]
    fn negative_offsets() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(
            next_fire(now, nine_pm(), offset),
            Utc.with_ymd_and_hms(2026, 1, 10, 2, 0, 0).unwrap()
        );
    }

    struct FakeSource {
        recent: Result<bool, ()>,
        chats: Vec<i64>,
        asked_hours: Mutex<Vec<u32>>,
    }

    impl FakeSource {
        fn new(recent: Result<bool, ()>, chats: Vec<i64>) -> Arc<Self> {
            Arc::new(Self {
                recent,
                chats,
                asked_hours: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ReminderSource for FakeSource {
        async fn has_recent_activity(&self, hours: u32) -> Result<bool, DaylogError> {
            self.asked_hours.lock().await.push(hours);
            self.recent
                .map_err(|()| DaylogError::Remote {
                    message: "HTTP 500".into(),
                    source: None,
                })
        }

        async fn alarm_chats(&self) -> Result<Vec<i64>, DaylogError> {
            Ok(self.chats.clone())
        }
    }

    fn job(source: Arc<FakeSource>, notifier: &MockNotifier) -> ReminderJob {
        ReminderJob::from_config(
            &ReminderConfig::default(),
            source,
            Arc::new(notifier.clone()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn quiet_day_reminds_every_opted_in_chat() {
        let notifier = MockNotifier::new();
        let source = FakeSource::new(Ok(false), vec![10, 20]);

        assert_eq!(job(source.clone(), &notifier).fire().await, 2);
        assert_eq!(notifier.recipients().await, vec![10, 20]);
        assert_eq!(*source.asked_hours.lock().await, vec![24]);
    }

    #[tokio::test]
    async fn recent_activity_suppresses_reminder() {
        let notifier = MockNotifier::new();
        let source = FakeSource::new(Ok(true), vec![10, 20]);

        assert_eq!(job(source, &notifier).fire().await, 0);
        assert_eq!(notifier.sent_count().await, 0);
    }

    #[tokio::test]
    async fn failed_activity_check_still_reminds() {
        let notifier = MockNotifier::new();
        let source = FakeSource::new(Err(()), vec![10]);

        assert_eq!(job(source, &notifier).fire().await, 1);
    }

    #[tokio::test]
    async fn send_failures_are_skipped() {
        let notifier = MockNotifier::new();
        notifier.fail_for(10).await;
        let source = FakeSource::new(Ok(false), vec![10, 20]);

        assert_eq!(job(source, &notifier).fire().await, 1);
        assert_eq!(notifier.recipients().await, vec![20]);
    }

    #[test]
    fn invalid_time_is_a_config_error() {
        let config = ReminderConfig {
            time: "25:00".into(),
            ..ReminderConfig::default()
        };
        let result = ReminderJob::from_config(
            &config,
            FakeSource::new(Ok(false), vec![]),
            Arc::new(MockNotifier::new()),
        );
        assert!(matches!(result, Err(DaylogError::Config(_))));
    }
}
