//! Service configuration
//!
//! Loaded from an optional TOML file. Every field has a default; when no
//! `[[sources]]` are listed every known family is read from its default
//! file.
//!
//! ```toml
//! log_dir = "/srv/reforger/profile/logs"
//! state_dir = "state"
//! stats_interval_ms = 60000
//!
//! [[sources]]
//! kind = "chat"
//! filename = "chatEvents.log"
//! scan_interval_ms = 3000
//! state_save_interval_ms = 60000
//!
//! [[sources]]
//! kind = "squad_list"
//! enabled = false
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use reforger_readers::{
    DEFAULT_SCAN_INTERVAL, DEFAULT_SNAPSHOT_INTERVAL, DEFAULT_STATE_SAVE_INTERVAL, SnapshotConfig,
    TailerConfig,
};
use reforger_types::EventKind;

use crate::error::{ConfigError, Result};

pub const DEFAULT_STATS_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Directory the game server writes its event files to
    pub log_dir: PathBuf,

    /// Directory holding one recovery record per tailed file
    pub state_dir: PathBuf,

    /// Period of the lines-per-minute report
    pub stats_interval_ms: u64,

    /// Explicit source list; empty means every family with defaults
    pub sources: Vec<SourceConfig>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            state_dir: PathBuf::from("state"),
            stats_interval_ms: DEFAULT_STATS_INTERVAL_MS,
            sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: EventKind,

    /// Defaults to the file the game server writes for this family
    #[serde(default)]
    pub filename: Option<String>,

    /// Defaults to 3 s for log files and 60 s for snapshots
    #[serde(default)]
    pub scan_interval_ms: Option<u64>,

    /// Ignored for snapshot sources
    #[serde(default)]
    pub state_save_interval_ms: Option<u64>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            filename: None,
            scan_interval_ms: None,
            state_save_interval_ms: None,
            enabled: true,
        }
    }

    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .unwrap_or_else(|| self.kind.default_filename())
    }

    pub fn scan_interval(&self) -> Duration {
        match self.scan_interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None if self.kind.is_snapshot() => DEFAULT_SNAPSHOT_INTERVAL,
            None => DEFAULT_SCAN_INTERVAL,
        }
    }

    pub fn state_save_interval(&self) -> Duration {
        self.state_save_interval_ms
            .map_or(DEFAULT_STATE_SAVE_INTERVAL, Duration::from_millis)
    }

    fn validate(&self) -> Result<()> {
        if self.filename().trim().is_empty() {
            return Err(ConfigError::invalid_value(self.kind, "filename", "must not be empty"));
        }
        if self.scan_interval_ms == Some(0) {
            return Err(ConfigError::invalid_value(
                self.kind,
                "scan_interval_ms",
                "must be greater than zero",
            ));
        }
        if self.state_save_interval_ms == Some(0) {
            return Err(ConfigError::invalid_value(
                self.kind,
                "state_save_interval_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl IngestConfig {
    /// Default configuration reading from `log_dir`
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        content.parse()
    }

    fn parse(s: &str) -> Result<Self> {
        let config: IngestConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stats_interval_ms == 0 {
            return Err(ConfigError::ZeroStatsInterval);
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.kind) {
                return Err(ConfigError::DuplicateSource { kind: source.kind });
            }
            source.validate()?;
        }

        if !self.sources.is_empty() && !self.sources.iter().any(|s| s.enabled) {
            return Err(ConfigError::NoSourcesEnabled);
        }
        Ok(())
    }

    /// Sources to run, in configuration order
    pub fn enabled_sources(&self) -> Vec<SourceConfig> {
        if self.sources.is_empty() {
            return EventKind::ALL.into_iter().map(SourceConfig::new).collect();
        }
        self.sources.iter().filter(|s| s.enabled).cloned().collect()
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms)
    }

    /// Recovery record location for a family
    pub fn state_path(&self, kind: EventKind) -> PathBuf {
        self.state_dir.join(format!("{}_state.json", kind.as_str()))
    }

    pub fn tailer_config(&self, source: &SourceConfig) -> TailerConfig {
        TailerConfig::new(&self.log_dir, source.filename(), self.state_path(source.kind))
            .with_scan_interval(source.scan_interval())
            .with_state_save_interval(source.state_save_interval())
    }

    pub fn snapshot_config(&self, source: &SourceConfig) -> SnapshotConfig {
        SnapshotConfig::new(&self.log_dir, source.filename()).with_scan_interval(source.scan_interval())
    }
}

impl FromStr for IngestConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
