//! Whole-file reader for JSON documents that are rewritten in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reforger_types::RawPayload;

use crate::error::{ReaderError, Result};
use crate::sink::LineSink;
use crate::tailer::ticker;

pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_millis(60_000);

#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub directory: PathBuf,
    pub filename: String,
    pub scan_interval: Duration,
}

impl SnapshotConfig {
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            scan_interval: DEFAULT_SNAPSHOT_INTERVAL,
        }
    }

    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Re-reads one JSON file every tick and forwards the parsed document,
/// whether or not it changed since the last read
pub struct SnapshotFileReader<S> {
    config: SnapshotConfig,
    file_path: PathBuf,
    sink: S,
    missing_logged: bool,
}

impl<S: LineSink> SnapshotFileReader<S> {
    pub fn new(config: SnapshotConfig, sink: S) -> Self {
        let file_path = config.file_path();
        Self {
            config,
            file_path,
            sink,
            missing_logged: false,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read and forward the document once. Returns `Ok(false)` when the
    /// file does not exist yet.
    pub fn scan(&mut self) -> Result<bool> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if !self.missing_logged {
                    tracing::warn!(
                        path = %self.file_path.display(),
                        "snapshot file not found, will keep polling for it"
                    );
                    self.missing_logged = true;
                }
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        self.missing_logged = false;

        let document: serde_json::Value = serde_json::from_str(&content)?;
        self.sink.push(RawPayload::Json(document));
        Ok(true)
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        let mut scan_tick = ticker(self.config.scan_interval);

        tracing::info!(
            path = %self.file_path.display(),
            scan_ms = self.config.scan_interval.as_millis() as u64,
            "started scanning snapshot file"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                _ = scan_tick.tick() => {
                    match self.scan() {
                        Ok(_) => {}
                        Err(ReaderError::Json(e)) => {
                            tracing::error!(path = %self.file_path.display(), error = %e, "error parsing snapshot file");
                        }
                        Err(e) => {
                            tracing::error!(path = %self.file_path.display(), error = %e, "error reading snapshot file");
                        }
                    }
                }
            }
        }

        tracing::info!(path = %self.file_path.display(), "stopped scanning snapshot file");
    }
}

impl<S: LineSink + 'static> SnapshotFileReader<S> {
    pub async fn start(self, cancel: CancellationToken) -> Result<JoinHandle<()>> {
        Ok(tokio::spawn(self.run(cancel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    use crate::sink::QueueSink;
    use reforger_types::{EventKind, RawLine};

    fn setup(dir: &TempDir) -> (SnapshotFileReader<QueueSink>, mpsc::UnboundedReceiver<RawLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = SnapshotConfig::new(dir.path(), "squadList.json");
        let reader = SnapshotFileReader::new(config, QueueSink::new(EventKind::SquadList, tx));
        (reader, rx)
    }

    #[test]
    fn test_missing_file_forwards_nothing() {
        let dir = TempDir::new().unwrap();
        let (mut reader, mut rx) = setup(&dir);

        assert!(!reader.scan().unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_identical_content_is_forwarded_every_time() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("squadList.json"),
            r#"{"groups":[{"groupId":1,"name":"Alpha","faction":"US","members":[{"id":1,"name":"X","isLeader":true}]}]}"#,
        )
        .unwrap();
        let (mut reader, mut rx) = setup(&dir);

        assert!(reader.scan().unwrap());
        assert!(reader.scan().unwrap());

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_json().unwrap()["groups"][0]["name"], "Alpha");
    }

    #[test]
    fn test_parse_failure_is_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("squadList.json"), "{ \"groups\": [").unwrap();
        let (mut reader, mut rx) = setup(&dir);

        assert!(matches!(reader.scan(), Err(ReaderError::Json(_))));
        assert!(rx.try_recv().is_err());

        // A later rewrite is picked up normally
        fs::write(dir.path().join("squadList.json"), "{\"groups\": []}").unwrap();
        assert!(reader.scan().unwrap());
        assert!(rx.try_recv().is_ok());
    }
}
