//! Polling tailer for append-only log files.
//!
//! Every scan tick the file is re-stat'ed; newly appended bytes are read in
//! bounded chunks, split into lines and pushed to the sink one by one. The
//! trailing partial line is carried over to the next scan. A second tick
//! persists the read position so a restart resumes where it left off.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use reforger_types::{RawPayload, TailState};

use crate::error::Result;
use crate::sink::LineSink;
use crate::state::StateStore;

/// Bytes read per chunk
pub const CHUNK_SIZE: usize = 64 * 1024;

/// A single scan stops after consuming more than this many chunks and
/// resumes on the next tick
pub const MAX_CHUNKS_PER_SCAN: usize = 10;

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_STATE_SAVE_INTERVAL: Duration = Duration::from_millis(60_000);

/// Configuration for one tailed file
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// Directory containing the log file
    pub directory: PathBuf,
    /// File name inside `directory`
    pub filename: String,
    /// How often the file is checked for growth
    pub scan_interval: Duration,
    /// How often the read position is persisted
    pub state_save_interval: Duration,
    /// Where the recovery record lives
    pub state_path: PathBuf,
}

impl TailerConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        filename: impl Into<String>,
        state_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            state_save_interval: DEFAULT_STATE_SAVE_INTERVAL,
            state_path: state_path.into(),
        }
    }

    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub fn with_state_save_interval(mut self, interval: Duration) -> Self {
        self.state_save_interval = interval;
        self
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// What a single scan did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// The file does not exist (yet)
    pub file_missing: bool,
    /// The file shrank below the recorded offset and was re-read from 0
    pub truncated: bool,
    /// Bytes consumed during this scan
    pub bytes_read: u64,
    /// Complete lines handed to the sink
    pub lines_forwarded: usize,
    /// The scan stopped early; more bytes are waiting for the next tick
    pub more_pending: bool,
}

/// Tails one append-only file into a [`LineSink`]
pub struct AppendFileTailer<S> {
    config: TailerConfig,
    file_path: PathBuf,
    store: StateStore,
    sink: S,

    /// Bytes of the file consumed so far
    offset: u64,

    /// Incomplete trailing line, kept as bytes so a UTF-8 sequence split
    /// across chunks is decoded whole
    pending: Vec<u8>,

    /// Set while the file is absent so the warning is logged once
    missing_logged: bool,
}

impl<S: LineSink> AppendFileTailer<S> {
    pub fn new(config: TailerConfig, sink: S) -> Self {
        let file_path = config.file_path();
        let store = StateStore::new(config.state_path.clone());
        Self {
            config,
            file_path,
            store,
            sink,
            offset: 0,
            pending: Vec::new(),
            missing_logged: false,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Snapshot of the current read position.
    ///
    /// A character cut off at the end of the carry-over is left out and
    /// the offset rewound by its length, so it is re-read whole after a
    /// restart.
    pub fn state(&self) -> TailState {
        let cut = incomplete_utf8_tail(&self.pending);
        let keep = self.pending.len() - cut;
        TailState {
            path: self.file_path.display().to_string(),
            last_offset: self.offset - cut as u64,
            carry_over: String::from_utf8_lossy(&self.pending[..keep]).into_owned(),
        }
    }

    /// Load the persisted read position, if any
    pub fn restore(&mut self) {
        let expected = self.file_path.display().to_string();
        match self.store.load(&expected) {
            Some(state) => {
                tracing::info!(
                    path = %self.file_path.display(),
                    offset = state.last_offset,
                    carry_over = state.carry_over.len(),
                    "restored tail state"
                );
                self.offset = state.last_offset;
                self.pending = state.carry_over.into_bytes();
            }
            None => {
                self.offset = 0;
                self.pending.clear();
            }
        }
    }

    /// Persist the current read position
    pub fn save_state(&self) -> Result<()> {
        self.store.save(&self.state())
    }

    /// Check the file once and forward any complete new lines
    pub fn scan(&mut self) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        let metadata = match fs::metadata(&self.file_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if !self.missing_logged {
                    tracing::warn!(
                        path = %self.file_path.display(),
                        "log file not found, will keep polling for it"
                    );
                    self.missing_logged = true;
                }
                report.file_missing = true;
                return Ok(report);
            }
            Err(e) => return Err(e.into()),
        };

        if self.missing_logged {
            tracing::info!(path = %self.file_path.display(), "log file appeared");
            self.missing_logged = false;
        }

        let size = metadata.len();
        if size < self.offset {
            tracing::info!(
                path = %self.file_path.display(),
                previous_offset = self.offset,
                current_size = size,
                "file truncated or rotated, resetting position"
            );
            self.offset = 0;
            self.pending.clear();
            report.truncated = true;
        }

        if size <= self.offset {
            return Ok(report);
        }

        let mut file = File::open(&self.file_path)?;
        file.seek(SeekFrom::Start(self.offset))?;

        let start = self.offset;
        let budget = (CHUNK_SIZE * MAX_CHUNKS_PER_SCAN) as u64;
        let mut chunk = vec![0u8; CHUNK_SIZE];

        while self.offset < size {
            let want = (size - self.offset).min(CHUNK_SIZE as u64) as usize;
            let read = file.read(&mut chunk[..want])?;
            if read == 0 {
                break;
            }

            report.lines_forwarded += self.consume(&chunk[..read]);
            report.bytes_read += read as u64;
            self.offset += read as u64;

            if self.offset < size && self.offset - start > budget {
                tracing::debug!(
                    path = %self.file_path.display(),
                    offset = self.offset,
                    remaining = size - self.offset,
                    "scan budget exhausted, resuming next tick"
                );
                report.more_pending = true;
                if let Err(e) = self.save_state() {
                    tracing::warn!(path = %self.file_path.display(), error = %e, "failed to save tail state");
                }
                break;
            }
        }

        Ok(report)
    }

    /// Append `bytes` to the carry-over and forward every complete line
    fn consume(&mut self, bytes: &[u8]) -> usize {
        self.pending.extend_from_slice(bytes);

        let mut forwarded = 0;
        let mut line_start = 0;
        while let Some(pos) = self.pending[line_start..].iter().position(|&b| b == b'\n') {
            let line_end = line_start + pos;
            let line = String::from_utf8_lossy(&self.pending[line_start..line_end]);
            let line = line.trim();
            if !line.is_empty() {
                self.sink.push(RawPayload::Text(line.to_string()));
                forwarded += 1;
            }
            line_start = line_end + 1;
        }

        self.pending.drain(..line_start);
        forwarded
    }

    /// Drive the scan and state-save ticks until cancelled, then save once
    /// more
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut scan_tick = ticker(self.config.scan_interval);
        let mut save_tick = ticker(self.config.state_save_interval);
        // The first tick of an interval fires immediately; nothing to save yet
        save_tick.tick().await;

        tracing::info!(
            path = %self.file_path.display(),
            scan_ms = self.config.scan_interval.as_millis() as u64,
            "started tailing log file"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                _ = scan_tick.tick() => {
                    match self.scan() {
                        Ok(report) if report.lines_forwarded > 0 => {
                            tracing::trace!(
                                path = %self.file_path.display(),
                                lines = report.lines_forwarded,
                                bytes = report.bytes_read,
                                "scan forwarded lines"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(path = %self.file_path.display(), error = %e, "error scanning log file");
                        }
                    }
                }

                _ = save_tick.tick() => {
                    if let Err(e) = self.save_state() {
                        tracing::warn!(path = %self.file_path.display(), error = %e, "failed to save tail state");
                    }
                }
            }
        }

        if let Err(e) = self.save_state() {
            tracing::warn!(path = %self.file_path.display(), error = %e, "failed to save tail state on shutdown");
        }
        tracing::info!(path = %self.file_path.display(), offset = self.offset, "stopped tailing log file");
    }
}

impl<S: LineSink + 'static> AppendFileTailer<S> {
    /// Restore state and spawn the polling task
    pub async fn start(mut self, cancel: CancellationToken) -> Result<JoinHandle<()>> {
        if let Some(parent) = self.config.state_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        self.restore();
        Ok(tokio::spawn(self.run(cancel)))
    }
}

/// Length of a UTF-8 sequence left unfinished at the end of `bytes`
fn incomplete_utf8_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return 0,
        };
        return if back < width { back } else { 0 };
    }
    0
}

/// Interval that skips the burst of catch-up ticks after a slow scan
pub fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
