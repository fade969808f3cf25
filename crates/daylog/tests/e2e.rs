// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: config → outbox → sheet client → mock web-app.
//!
//! Each test gets its own temp queue directory and wiremock server.

use std::sync::Arc;

use daylog_core::{Author, DeliveryAdapter, Event, Score};
use daylog_outbox::Outbox;
use daylog_sheets::SheetsClient;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Setup {
    _dir: TempDir,
    server: MockServer,
    outbox: Outbox,
    queue_path: std::path::PathBuf,
}

async fn setup() -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let toml = format!(
        r#"
[sheets]
webapp_url = "{}"
secret = "e2e-secret"
worksheet_name = "Log"
timeout_secs = 2

[queue]
data_dir = "{}"
"#,
        server.uri(),
        dir.path().display()
    );
    let config = daylog_config::load_and_validate_str(&toml).unwrap();
    let sheets = SheetsClient::from_config(&config.sheets).unwrap();
    let delivery: Arc<dyn DeliveryAdapter> = Arc::new(sheets);

    Setup {
        queue_path: config.queue.queue_path(),
        outbox: Outbox::from_config(&config.queue, delivery),
        server,
        _dir: dir,
    }
}

async fn answer(server: &MockServer, template: ResponseTemplate) {
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn author() -> Author {
    Author {
        user_id: 501,
        username: Some("kim".into()),
        name: "Kim".into(),
    }
}

async fn bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn score_queued_during_outage_is_flushed_after_recovery() {
    let s = setup().await;
    answer(&s.server, ResponseTemplate::new(503)).await;

    let report = s
        .outbox
        .submit(Event::score(author(), 42, Score::new(7).unwrap()))
        .await
        .unwrap();
    assert!(report.queued);
    assert_eq!(s.outbox.queue_status().await.unwrap().count, 1);

    answer(
        &s.server,
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;
    let flushed = s.outbox.flush_once().await.unwrap();
    assert_eq!((flushed.sent, flushed.left), (1, 0));

    let sent = bodies(&s.server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["kind"], "score");
    assert_eq!(sent[0]["score"], 7);
    assert_eq!(sent[0]["chat_id"], "42");
    assert_eq!(sent[0]["sheetName"], "Log");
    assert_eq!(sent[0]["secret"], "e2e-secret");
    assert_eq!(s.outbox.queue_status().await.unwrap().count, 0);
}

#[tokio::test]
async fn anxiety_delivered_directly_never_creates_queue_file() {
    let s = setup().await;
    answer(
        &s.server,
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;

    let report = s
        .outbox
        .submit(Event::anxiety(author(), 42, true))
        .await
        .unwrap();
    assert!(report.delivered);
    assert!(!report.queued);
    assert!(!s.queue_path.exists());

    let sent = bodies(&s.server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["kind"], "anxiety");
    assert_eq!(sent[0]["anxiety"], true);
}

#[tokio::test]
async fn backlog_is_replayed_in_submission_order() {
    let s = setup().await;
    answer(
        &s.server,
        ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "locked"})),
    )
    .await;

    for n in [3u8, 9, 5] {
        let report = s
            .outbox
            .submit(Event::score(author(), 42, Score::new(n).unwrap()))
            .await
            .unwrap();
        assert!(report.queued);
    }

    answer(
        &s.server,
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;
    let flushed = s.outbox.flush_once().await.unwrap();
    assert_eq!(flushed.sent, 3);

    let scores: Vec<i64> = bodies(&s.server)
        .await
        .iter()
        .filter_map(|b| b["score"].as_i64())
        .collect();
    assert_eq!(scores, vec![3, 9, 5]);
}

#[tokio::test]
async fn next_submit_drains_backlog_first() {
    let s = setup().await;
    answer(&s.server, ResponseTemplate::new(502)).await;
    s.outbox
        .submit(Event::score(author(), 1, Score::new(2).unwrap()))
        .await
        .unwrap();

    answer(
        &s.server,
        ResponseTemplate::new(200).set_body_json(json!({"ok": true})),
    )
    .await;
    let report = s
        .outbox
        .submit(Event::score(author(), 1, Score::new(8).unwrap()))
        .await
        .unwrap();
    assert!(report.delivered);

    let scores: Vec<i64> = bodies(&s.server)
        .await
        .iter()
        .filter_map(|b| b["score"].as_i64())
        .collect();
    assert_eq!(scores, vec![2, 8]);
    assert_eq!(s.outbox.queue_status().await.unwrap().count, 0);
}
