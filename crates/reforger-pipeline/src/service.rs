//! Top-level owner of every reader and dispatcher.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reforger_parsers::classifier_for;
use reforger_readers::{AppendFileTailer, QueueSink, SnapshotFileReader, ticker};
use reforger_types::EventKind;

use crate::bus::{EventBus, Subscription};
use crate::config::{IngestConfig, SourceConfig};
use crate::dispatcher::SourceDispatcher;
use crate::stats::{FamilyStats, StatsSnapshot};

/// One reader feeding one family queue
enum Reader {
    Tail(AppendFileTailer<QueueSink>),
    Snapshot(SnapshotFileReader<QueueSink>),
}

impl Reader {
    fn file_path(&self) -> &Path {
        match self {
            Self::Tail(tailer) => tailer.file_path(),
            Self::Snapshot(reader) => reader.file_path(),
        }
    }

    async fn start(self, cancel: CancellationToken) -> reforger_readers::Result<JoinHandle<()>> {
        match self {
            Self::Tail(tailer) => tailer.start(cancel).await,
            Self::Snapshot(reader) => reader.start(cancel).await,
        }
    }
}

struct Running {
    cancel: CancellationToken,
    readers: Vec<JoinHandle<()>>,
    dispatchers: Vec<JoinHandle<()>>,
    reporter_cancel: CancellationToken,
    reporter: JoinHandle<()>,
}

/// Runs the whole ingestion pipeline
pub struct IngestionService {
    config: IngestConfig,
    bus: EventBus,
    running: Option<Running>,
}

impl IngestionService {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            bus: EventBus::new(),
            running: None,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to one event family. May be called before or after
    /// [`start`](Self::start).
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        self.bus.subscribe(kind)
    }

    /// Every event name the service can publish
    pub fn event_names(&self) -> Vec<&'static str> {
        EventKind::ALL.iter().map(EventKind::event_name).collect()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start one reader and one dispatcher per enabled source.
    ///
    /// Readers start concurrently; a reader that fails to start is logged
    /// and skipped. Returns the number of readers running.
    pub async fn start(&mut self) -> usize {
        if self.running.is_some() {
            tracing::warn!("ingestion service already running");
            return 0;
        }

        let cancel = CancellationToken::new();
        let mut readers = Vec::new();
        let mut dispatchers = Vec::new();
        let mut families = Vec::new();

        for source in self.config.enabled_sources() {
            let (dispatcher, sink) = SourceDispatcher::new(classifier_for(source.kind), self.bus.clone());
            families.push((source.kind, dispatcher.stats()));
            dispatchers.push(dispatcher.spawn());
            readers.push(self.reader_for(&source, sink));
        }

        let started = join_all(readers.into_iter().map(|reader| {
            let cancel = cancel.clone();
            async move {
                let path = reader.file_path().to_path_buf();
                (path, reader.start(cancel).await)
            }
        }))
        .await;

        let mut handles = Vec::with_capacity(started.len());
        for (path, result) in started {
            match result {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to start reader");
                }
            }
        }

        let reporter_cancel = CancellationToken::new();
        let reporter = tokio::spawn(report_stats(
            families,
            self.config.stats_interval(),
            reporter_cancel.clone(),
        ));

        tracing::info!(
            log_dir = %self.config.log_dir.display(),
            readers = handles.len(),
            "ingestion service started"
        );

        let count = handles.len();
        self.running = Some(Running {
            cancel,
            readers: handles,
            dispatchers,
            reporter_cancel,
            reporter,
        });
        count
    }

    /// Stop every reader (saving tail state), drain every family queue and
    /// close all subscriptions
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.cancel.cancel();
        for handle in running.readers {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "reader task failed");
            }
        }

        // Readers own the only sinks, so every queue is now closed
        for handle in running.dispatchers {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "dispatcher task failed");
            }
        }

        running.reporter_cancel.cancel();
        if let Err(e) = running.reporter.await {
            tracing::error!(error = %e, "stats task failed");
        }

        self.bus.clear();
        tracing::info!("ingestion service stopped");
    }

    fn reader_for(&self, source: &SourceConfig, sink: QueueSink) -> Reader {
        if source.kind.is_snapshot() {
            Reader::Snapshot(SnapshotFileReader::new(self.config.snapshot_config(source), sink))
        } else {
            Reader::Tail(AppendFileTailer::new(self.config.tailer_config(source), sink))
        }
    }
}

impl Drop for IngestionService {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.cancel.cancel();
            running.reporter_cancel.cancel();
        }
    }
}

async fn report_stats(
    families: Vec<(EventKind, Arc<FamilyStats>)>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut tick = ticker(period);
    tick.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                log_stats(&families);
            }
        }
    }
}

/// Log and reset every family's counters
fn log_stats(families: &[(EventKind, Arc<FamilyStats>)]) -> StatsSnapshot {
    let mut total = StatsSnapshot::default();
    for (kind, stats) in families {
        let family = stats.take();
        total += family;
        tracing::debug!(
            family = %kind,
            lines = family.lines_seen,
            matched = family.lines_matched,
            "lines per minute"
        );
    }
    tracing::info!(
        lines = total.lines_seen,
        matched = total.lines_matched,
        "total lines per minute"
    );
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use tempfile::TempDir;
    use tokio::time::timeout;

    use reforger_types::{DomainEvent, TailState};

    fn fast_source(kind: EventKind) -> SourceConfig {
        SourceConfig {
            scan_interval_ms: Some(10),
            state_save_interval_ms: Some(10),
            ..SourceConfig::new(kind)
        }
    }

    fn config(dir: &TempDir, kinds: &[EventKind]) -> IngestConfig {
        IngestConfig {
            log_dir: dir.path().join("logs"),
            state_dir: dir.path().join("state"),
            stats_interval_ms: 60_000,
            sources: kinds.iter().copied().map(fast_source).collect(),
        }
    }

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new().create(true).append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    async fn next(rx: &mut Subscription) -> Arc<DomainEvent> {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("subscription closed")
    }

    #[tokio::test]
    async fn test_end_to_end_chat_and_kill() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, &[EventKind::Chat, EventKind::PlayerKilled]);
        fs::create_dir_all(&config.log_dir).unwrap();
        let chat_log = config.log_dir.join("chatEvents.log");
        let kill_log = config.log_dir.join("playerKilledEvents.log");

        let mut service = IngestionService::new(config);
        let mut chat = service.subscribe(EventKind::Chat);
        let mut kills = service.subscribe(EventKind::PlayerKilled);
        assert_eq!(service.start().await, 2);

        append(
            &chat_log,
            "[2025-05-27 05:53:04] CHAT = playerBiId=abc-123,channelId=0,message=hello,playerName=Bob,playerId=7\n",
        );
        append(
            &kill_log,
            "[t] PLAYER_KILLED = victimName=A, isFriendlyFire=true, isTeamKill=false, killerName=World, killerId=3\n",
        );

        let DomainEvent::ChatMessage(message) = next(&mut chat).await.as_ref().clone() else {
            panic!("expected chat event");
        };
        assert_eq!(message.player_name.as_deref(), Some("Bob"));
        assert_eq!(message.message.as_deref(), Some("hello"));

        let DomainEvent::PlayerKilled(kill) = next(&mut kills).await.as_ref().clone() else {
            panic!("expected kill event");
        };
        assert_eq!(kill.kill.kill_type.as_str(), "Friendly AI Kill");

        service.stop().await;
        assert!(!service.is_running());
        // Subscriptions are released on stop
        assert!(chat.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_command_log_feeds_line_family_subscribers() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, &[EventKind::ServerCommand]);
        fs::create_dir_all(&config.log_dir).unwrap();
        let command_log = config.log_dir.join("serverCommands.jsonl");

        let mut service = IngestionService::new(config);
        let mut chat = service.subscribe(EventKind::Chat);
        let mut commands = service.subscribe(EventKind::ServerCommand);
        assert_eq!(service.start().await, 1);

        append(
            &command_log,
            concat!(
                r#"{"type":"ChatMessageEvent","timestamp":"t1","playerName":"Bob","channelId":0,"message":"hi"}"#,
                "\nnot json\n",
                r#"{"type":"VoteStartedEvent","timestamp":"t2","playerId":4,"voteType":"KICK","voteTarget":9}"#,
                "\n",
            ),
        );

        let DomainEvent::ChatMessage(message) = next(&mut chat).await.as_ref().clone() else {
            panic!("expected chat event");
        };
        assert_eq!(message.timestamp, "t1");
        assert_eq!(message.is_server_muted, Some(false));

        let DomainEvent::ServerCommand(vote) = next(&mut commands).await.as_ref().clone() else {
            panic!("expected command event");
        };
        assert_eq!(vote.timestamp, "t2");
        assert_eq!(vote.command.name(), "voteStartedEvent");

        service.stop().await;
    }

    #[tokio::test]
    async fn test_stop_saves_tail_state_for_restart() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, &[EventKind::Chat]);
        fs::create_dir_all(&config.log_dir).unwrap();
        let chat_log = config.log_dir.join("chatEvents.log");
        let state_path = config.state_path(EventKind::Chat);

        append(&chat_log, "[t1] CHAT = message=one\n[t2] CHAT = mess");

        let mut service = IngestionService::new(config.clone());
        let mut chat = service.subscribe(EventKind::Chat);
        service.start().await;
        assert_eq!(next(&mut chat).await.timestamp(), "t1");
        service.stop().await;

        let saved: TailState = serde_json::from_str(&fs::read_to_string(&state_path).unwrap()).unwrap();
        assert_eq!(saved.last_offset, fs::metadata(&chat_log).unwrap().len());
        assert_eq!(saved.carry_over, "[t2] CHAT = mess");

        // Restart picks up the partial line without re-emitting the first
        append(&chat_log, "age=two\n");
        let mut service = IngestionService::new(config);
        let mut chat = service.subscribe(EventKind::Chat);
        service.start().await;

        let event = next(&mut chat).await;
        assert_eq!(event.timestamp(), "t2");
        let DomainEvent::ChatMessage(message) = event.as_ref() else {
            panic!("expected chat event");
        };
        assert_eq!(message.message.as_deref(), Some("two"));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_snapshot_source_publishes_every_read() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, &[EventKind::SquadList]);
        fs::create_dir_all(&config.log_dir).unwrap();
        fs::write(
            config.log_dir.join("squadList.json"),
            r#"{"groups":[{"groupId":1,"name":"Alpha","members":[{"id":1,"name":"X","isLeader":true}]}]}"#,
        )
        .unwrap();

        let mut service = IngestionService::new(config);
        let mut roster = service.subscribe(EventKind::SquadList);
        service.start().await;

        let first = next(&mut roster).await;
        let second = next(&mut roster).await;
        assert_eq!(first.name(), "squadListEvent");
        assert_eq!(second.name(), "squadListEvent");
        service.stop().await;
    }

    #[tokio::test]
    async fn test_missing_files_do_not_stop_the_service() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, &[EventKind::Chat, EventKind::SquadList]);

        let mut service = IngestionService::new(config);
        assert_eq!(service.start().await, 2);
        assert!(service.is_running());
        assert_eq!(service.start().await, 0);
        service.stop().await;
        service.stop().await;
    }

    #[test]
    fn test_event_names() {
        let service = IngestionService::new(IngestConfig::default());
        let names = service.event_names();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"serverCommandEvent"));
        assert!(names.contains(&"chatMessageEvent"));
        assert!(names.contains(&"squadListEvent"));
        assert!(names.contains(&"damageEvent"));
    }

    #[test]
    fn test_log_stats_sums_and_resets() {
        let chat = Arc::new(FamilyStats::new());
        let kills = Arc::new(FamilyStats::new());
        chat.record(true);
        chat.record(false);
        kills.record(true);

        let families = vec![(EventKind::Chat, chat.clone()), (EventKind::PlayerKilled, kills)];
        let total = log_stats(&families);
        assert_eq!(total.lines_seen, 3);
        assert_eq!(total.lines_matched, 2);
        assert_eq!(chat.snapshot(), StatsSnapshot::default());
    }
}
