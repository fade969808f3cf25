// SPDX-FileCopyrightText: 2026 Daylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON Lines queue file guarded by a single async mutex.
//!
//! The file holds pending events oldest first, one JSON object per line.
//! Every access goes through [`QueueStore::lock`], so a flush can hold the
//! lock across read, deliver and rewrite.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use daylog_core::{DaylogError, Event};

/// Count and age of the pending queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStatus {
    pub count: usize,
    /// Timestamp of the head event, if any.
    pub oldest: Option<DateTime<Utc>>,
}

/// Durable FIFO of undelivered events.
pub struct QueueStore {
    file: Mutex<QueueFile>,
}

/// The queue file, reachable only through the store's lock.
#[derive(Debug)]
pub struct QueueFile {
    path: PathBuf,
}

impl QueueStore {
    /// Creates a store for `path`. Nothing touches the disk until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Mutex::new(QueueFile { path: path.into() }),
        }
    }

    /// Acquires exclusive access to the queue file.
    pub async fn lock(&self) -> MutexGuard<'_, QueueFile> {
        self.file.lock().await
    }

    pub async fn path(&self) -> PathBuf {
        self.lock().await.path.clone()
    }

    pub async fn append(&self, event: &Event) -> Result<(), DaylogError> {
        self.lock().await.append(event).await
    }

    pub async fn read_all(&self) -> Result<Vec<Event>, DaylogError> {
        self.lock().await.read_all().await
    }

    pub async fn rewrite(&self, events: &[Event]) -> Result<(), DaylogError> {
        self.lock().await.rewrite(events).await
    }

    /// Pending count and oldest timestamp. Never modifies the file.
    pub async fn status(&self) -> Result<QueueStatus, DaylogError> {
        let events = self.read_all().await?;
        Ok(QueueStatus {
            count: events.len(),
            oldest: events.first().map(|e| e.timestamp),
        })
    }

    /// Removes and returns the head event. `None` when the queue is empty.
    pub async fn drop_head(&self) -> Result<Option<Event>, DaylogError> {
        let mut file = self.lock().await;
        let mut events = file.read_all().await?;
        if events.is_empty() {
            return Ok(None);
        }
        let head = events.remove(0);
        file.rewrite(&events).await?;
        warn!(event = %head.label(), timestamp = %head.timestamp, "dropped queue head");
        Ok(Some(head))
    }
}

impl QueueFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event as a single line, creating the directory and file as needed.
    ///
    /// A torn last line (no trailing newline) is terminated first so the new
    /// event starts a line of its own.
    pub async fn append(&mut self, event: &Event) -> Result<(), DaylogError> {
        let record = serde_json::to_vec(event).map_err(storage_error)?;

        self.ensure_parent().await?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut line = Vec::with_capacity(record.len() + 2);
        if !ends_with_newline(&mut file).await? {
            warn!(path = %self.path.display(), "queue file ends mid-line, terminating it");
            line.push(b'\n');
        }
        line.extend_from_slice(&record);
        line.push(b'\n');
        file.write_all(&line).await?;
        file.sync_data().await?;

        debug!(event = %event.label(), path = %self.path.display(), "event queued");
        Ok(())
    }

    /// Parses the file in order, skipping blank and malformed lines.
    ///
    /// A missing file is an empty queue.
    pub async fn read_all(&self) -> Result<Vec<Event>, DaylogError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(parse_lines(&bytes, &self.path))
    }

    /// Replaces the contents with `events` via a synced sibling file and a rename.
    ///
    /// A crash before the rename leaves the previous contents in place, which
    /// can only cause redelivery.
    pub async fn rewrite(&mut self, events: &[Event]) -> Result<(), DaylogError> {
        let mut buf = Vec::new();
        for event in events {
            serde_json::to_writer(&mut buf, event).map_err(storage_error)?;
            buf.push(b'\n');
        }

        self.ensure_parent().await?;
        let tmp = self.tmp_path();
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&buf).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, &self.path).await?;
        self.sync_parent().await?;

        debug!(remaining = events.len(), path = %self.path.display(), "queue rewritten");
        Ok(())
    }

    async fn ensure_parent(&self) -> Result<(), DaylogError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Makes a completed rename durable.
    #[cfg(unix)]
    async fn sync_parent(&self) -> Result<(), DaylogError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::File::open(dir).await?.sync_all().await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn sync_parent(&self) -> Result<(), DaylogError> {
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "queue".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// True for an empty file or one whose last byte is `\n`.
async fn ends_with_newline(file: &mut fs::File) -> Result<bool, DaylogError> {
    if file.metadata().await?.len() == 0 {
        return Ok(true);
    }
    file.seek(std::io::SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

fn parse_lines(bytes: &[u8], path: &Path) -> Vec<Event> {
    let mut events = Vec::new();
    for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_no = idx + 1;
        let Ok(line) = std::str::from_utf8(raw) else {
            warn!(path = %path.display(), line = line_no, "skipping non-UTF-8 queue line");
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(line) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!(path = %path.display(), line = line_no, error = %e, "skipping malformed queue line");
            }
        }
    }
    events
}

fn storage_error(err: serde_json::Error) -> DaylogError {
    DaylogError::Storage {
        source: Box::new(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylog_core::{Author, Score};
    use tracing_test::traced_test;

    fn event(score: u8) -> Event {
        Event::score(
            Author {
                user_id: 9,
                username: Some("kim".into()),
                name: "Kim".into(),
            },
            100,
            Score::new(score).unwrap(),
        )
    }

    #[tokio::test]
    async fn missing_file_reads_empty_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/queue.jsonl");
        let store = QueueStore::new(&path);

        assert!(store.read_all().await.unwrap().is_empty());
        assert_eq!(store.status().await.unwrap(), QueueStatus::default());
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn append_creates_directories_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/queue.jsonl");
        let store = QueueStore::new(&path);

        store.append(&event(3)).await.unwrap();
        store.append(&event(4)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
        let labels: Vec<String> = store.read_all().await.unwrap().iter().map(Event::label).collect();
        assert_eq!(labels, ["score=3", "score=4"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_lines_are_skipped_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.jsonl");
        let good = serde_json::to_string(&event(5)).unwrap();
        std::fs::write(&path, format!("{good}\n{{not json\n\n{good}\n")).unwrap();

        let events = QueueStore::new(&path).read_all().await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(logs_contain("skipping malformed queue line"));
    }

    #[tokio::test]
    #[traced_test]
    async fn append_after_torn_tail_starts_a_new_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.jsonl");
        let good = serde_json::to_string(&event(3)).unwrap();
        std::fs::write(&path, format!("{good}\n{{\"timestamp\":\"2026-")).unwrap();

        let store = QueueStore::new(&path);
        store.append(&event(7)).await.unwrap();

        let labels: Vec<String> = store.read_all().await.unwrap().iter().map(Event::label).collect();
        assert_eq!(labels, ["score=3", "score=7"]);
        assert!(logs_contain("queue file ends mid-line"));

        store.append(&event(8)).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn rewrite_replaces_contents_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.jsonl");
        let store = QueueStore::new(&path);
        for score in 1..=3 {
            store.append(&event(score)).await.unwrap();
        }

        let remaining = store.read_all().await.unwrap()[1..].to_vec();
        store.rewrite(&remaining).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), remaining);
        assert!(!dir.path().join("queue.jsonl.tmp").exists());
    }

    #[tokio::test]
    async fn rewrite_in_fresh_nested_directory_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x/y/queue.jsonl");
        let store = QueueStore::new(&path);

        store.rewrite(&[event(2), event(5)]).await.unwrap();
        store.rewrite(&[event(5)]).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert_eq!(store.read_all().await.unwrap()[0].label(), "score=5");
    }

    #[tokio::test]
    async fn unrecognised_records_survive_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.jsonl");
        let legacy = r#"{"timestamp":"2026-01-01T00:00:00Z","user_id":1,"chat_id":"1","kind":"reaction","reaction":"hug"}"#;
        let good = serde_json::to_string(&event(4)).unwrap();
        std::fs::write(&path, format!("{legacy}\n{good}\n")).unwrap();

        let store = QueueStore::new(&path);
        let events = store.read_all().await.unwrap();
        assert_eq!(events.len(), 2);
        store.rewrite(&events).await.unwrap();

        let first: serde_json::Value =
            serde_json::from_str(std::fs::read_to_string(&path).unwrap().lines().next().unwrap())
                .unwrap();
        assert_eq!(first["kind"], "reaction");
        assert_eq!(first["reaction"], "hug");
    }

    #[tokio::test]
    async fn drop_head_removes_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let store = QueueStore::new(dir.path().join("queue.jsonl"));
        assert!(store.drop_head().await.unwrap().is_none());

        store.append(&event(1)).await.unwrap();
        store.append(&event(2)).await.unwrap();

        let head = store.drop_head().await.unwrap().unwrap();
        assert_eq!(head.label(), "score=1");
        let status = store.status().await.unwrap();
        assert_eq!(status.count, 1);
        assert_eq!(
            status.oldest,
            store.read_all().await.unwrap().first().map(|e| e.timestamp)
        );
    }
}
