//! The watch loop.
//!
//! Single consumer: events come in over a bounded ring and are drawn one at a
//! time on the coordinator's task. While a draw runs, newer events queue up,
//! overwriting the oldest ones when the ring is full; once it finishes,
//! everything queued is debounced and only the latest accepted event is drawn.

use std::path::{Path, PathBuf};
use std::time::Duration;

use surfer_config::WatchConfig;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::errors::WatchError;
use super::event::WatchEvent;
use super::source::FsEventSource;
use crate::debounce::DebounceGate;
use crate::display::DisplaySession;

/// Counters for one watch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Notifications pulled from the channel.
    pub received: u64,
    /// Not a file modification.
    pub ignored: u64,
    /// Rejected by the debounce gate.
    pub debounced: u64,
    /// Accepted, but a newer accepted event replaced it before drawing.
    pub superseded: u64,
    /// Overwritten in the full queue before the consumer got to them.
    pub evicted: u64,
    pub drawn: u64,
    pub failed: u64,
    /// Stopped by the cancellation token rather than by the source closing.
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct WatchCoordinator {
    gate: DebounceGate,
    queue_capacity: usize,
    join_timeout: Duration,
}

impl WatchCoordinator {
    /// A zero `queue_capacity` is raised to one.
    pub fn new(gate: DebounceGate, queue_capacity: usize, join_timeout: Duration) -> Self {
        Self {
            gate,
            queue_capacity: queue_capacity.max(1),
            join_timeout,
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            DebounceGate::new(config.debounce_interval()),
            config.queue_capacity(),
            config.join_timeout(),
        )
    }

    /// Watch `path` and draw modified files until `token` is cancelled.
    ///
    /// Returns only after the event source has stopped and released its end
    /// of the channel (or the join timeout elapsed).
    pub async fn run(
        &mut self,
        path: &Path,
        session: &mut DisplaySession,
        token: &CancellationToken,
    ) -> Result<WatchSummary, WatchError> {
        let dir = resolve_directory(path)?;
        let (tx, mut rx) = broadcast::channel(self.queue_capacity);
        let source = FsEventSource::start(&dir, tx)?;

        info!(
            event = "core.watch.started",
            path = %dir.display(),
            debounce_ms = self.gate.interval().as_millis() as u64
        );

        let summary = self.consume(&mut rx, session, token).await;

        source.stop();
        self.join(&mut rx).await;

        info!(
            event = "core.watch.completed",
            path = %dir.display(),
            received = summary.received,
            drawn = summary.drawn,
            failed = summary.failed,
            debounced = summary.debounced,
            superseded = summary.superseded,
            evicted = summary.evicted
        );
        Ok(summary)
    }

    /// Process events until cancellation or until every sender is gone.
    pub async fn consume(
        &mut self,
        rx: &mut broadcast::Receiver<WatchEvent>,
        session: &mut DisplaySession,
        token: &CancellationToken,
    ) -> WatchSummary {
        let mut summary = WatchSummary::default();

        loop {
            let first = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!(event = "core.watch.cancelled");
                    summary.cancelled = true;
                    return summary;
                }
                next = rx.recv() => match next {
                    Ok(event) => event,
                    Err(RecvError::Lagged(count)) => {
                        Self::record_eviction(count, &mut summary);
                        continue;
                    }
                    Err(RecvError::Closed) => {
                        info!(event = "core.watch.source_closed");
                        return summary;
                    }
                },
            };

            let mut latest = self.admit(first, &mut summary);
            loop {
                let event = match rx.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Lagged(count)) => {
                        Self::record_eviction(count, &mut summary);
                        continue;
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                };
                if let Some(accepted) = self.admit(event, &mut summary)
                    && let Some(replaced) = latest.replace(accepted)
                {
                    debug!(
                        event = "core.watch.superseded",
                        path = %replaced.path.display()
                    );
                    summary.superseded += 1;
                }
            }

            if let Some(event) = latest {
                Self::draw(session, &event, &mut summary);
            }
        }
    }

    fn record_eviction(count: u64, summary: &mut WatchSummary) {
        warn!(
            event = "core.watch.queue_full",
            evicted = count,
            "Event queue overflowed; oldest events were dropped"
        );
        summary.evicted += count;
    }

    fn admit(&mut self, event: WatchEvent, summary: &mut WatchSummary) -> Option<WatchEvent> {
        summary.received += 1;

        if !event.is_candidate() {
            trace!(
                event = "core.watch.ignored",
                path = %event.path.display(),
                kind = ?event.kind,
                is_directory = event.is_directory
            );
            summary.ignored += 1;
            return None;
        }

        if !self.gate.accept(event.timestamp) {
            debug!(event = "core.watch.debounced", path = %event.path.display());
            summary.debounced += 1;
            return None;
        }

        Some(event)
    }

    fn draw(session: &mut DisplaySession, event: &WatchEvent, summary: &mut WatchSummary) {
        // Hardware calls block; keep them off the async scheduler
        let result = tokio::task::block_in_place(|| session.draw(&event.path, true));
        match result {
            Ok(mode) => {
                info!(
                    event = "core.watch.draw_completed",
                    path = %event.path.display(),
                    mode = %mode
                );
                summary.drawn += 1;
            }
            Err(e) => {
                error!(
                    event = "core.watch.draw_failed",
                    path = %e.path().display(),
                    mode = %e.mode(),
                    error = %e
                );
                summary.failed += 1;
            }
        }
    }

    /// Wait for the stopped source to drop its sender.
    async fn join(&self, rx: &mut broadcast::Receiver<WatchEvent>) {
        let drained = tokio::time::timeout(self.join_timeout, async {
            while !matches!(rx.recv().await, Err(RecvError::Closed)) {}
        })
        .await;

        match drained {
            Ok(()) => debug!(event = "core.watch.source_joined"),
            Err(_) => warn!(
                event = "core.watch.join_timeout",
                timeout_ms = self.join_timeout.as_millis() as u64,
                "Event source did not release its channel in time"
            ),
        }
    }
}

/// Directory to watch for `path`.
///
/// A file path is replaced by its parent directory, with a warning.
pub fn resolve_directory(path: &Path) -> Result<PathBuf, WatchError> {
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    if !path.exists() {
        return Err(WatchError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    warn!(
        event = "core.watch.file_given",
        path = %path.display(),
        watching = %parent.display(),
        "Watch path is a file; watching its parent directory"
    );
    Ok(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{Call, MockHandle, write_image};
    use crate::refresh::RefreshPolicy;
    use crate::watch::event::WatchEventKind;
    use std::time::Instant;
    use tempfile::TempDir;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn coordinator() -> WatchCoordinator {
        WatchCoordinator::new(DebounceGate::new(secs(5)), 16, Duration::from_millis(500))
    }

    fn session(handle: &MockHandle) -> DisplaySession {
        DisplaySession::new("mock", Box::new(handle.driver()), RefreshPolicy::default())
    }

    fn modified(path: &Path, at: Instant) -> WatchEvent {
        WatchEvent::new(path, WatchEventKind::Modified, at)
    }

    /// Queue `events`, close the channel, and run the consumer to completion.
    async fn consume_all(
        coordinator: &mut WatchCoordinator,
        session: &mut DisplaySession,
        events: Vec<WatchEvent>,
    ) -> WatchSummary {
        let (tx, mut rx) = broadcast::channel(events.len().max(1));
        for event in events {
            tx.send(event).unwrap();
        }
        drop(tx);
        coordinator
            .consume(&mut rx, session, &CancellationToken::new())
            .await
    }

    #[test]
    fn test_resolve_directory_keeps_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_directory(dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn test_resolve_directory_substitutes_parent_for_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("frame.png");
        std::fs::write(&file, b"x").unwrap();

        assert_eq!(resolve_directory(&file).unwrap(), dir.path());
    }

    #[test]
    fn test_resolve_directory_missing_path() {
        let result = resolve_directory(Path::new("/nonexistent/path/that/will/never/exist"));
        assert!(matches!(result, Err(WatchError::PathNotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_modification_is_drawn_partially() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "a.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);

        let summary = consume_all(
            &mut coordinator(),
            &mut session,
            vec![modified(&image, Instant::now())],
        )
        .await;

        assert_eq!(summary.drawn, 1);
        assert!(!summary.cancelled);
        assert_eq!(handle.count(Call::InitPart), 1);
        assert_eq!(handle.count(Call::Sleep), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_non_candidates_never_reach_the_gate() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "a.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let mut coordinator = coordinator();
        let now = Instant::now();

        let mut in_dir = modified(dir.path(), now);
        in_dir.is_directory = true;
        let events = vec![
            WatchEvent::new(&image, WatchEventKind::Created, now),
            WatchEvent::new(&image, WatchEventKind::Deleted, now),
            WatchEvent::new(&image, WatchEventKind::Moved, now),
            in_dir,
        ];

        let summary = consume_all(&mut coordinator, &mut session, events).await;

        assert_eq!(summary.received, 4);
        assert_eq!(summary.ignored, 4);
        assert_eq!(summary.drawn, 0);
        assert!(handle.calls().is_empty());
        // The gate was never consulted, so it still accepts its first event
        assert!(coordinator.gate.last_accepted().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_burst_is_debounced() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "a.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let base = Instant::now();

        // t=0 and t=6 pass the gate; t=1, t=3 and t=9 do not
        let events = vec![
            modified(&image, base),
            modified(&image, base + secs(1)),
            modified(&image, base + secs(3)),
            modified(&image, base + secs(6)),
            modified(&image, base + secs(9)),
        ];
        let summary = consume_all(&mut coordinator(), &mut session, events).await;

        assert_eq!(summary.debounced, 3);
        // Both accepted events were queued together; only the latest is drawn
        assert_eq!(summary.superseded, 1);
        assert_eq!(summary.drawn, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_latest_accepted_event_wins() {
        let dir = TempDir::new().unwrap();
        let first = write_image(dir.path(), "first.png");
        let second = write_image(dir.path(), "second.png");
        let third = write_image(dir.path(), "third.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let base = Instant::now();

        // Missing file would fail to decode if it were drawn
        let events = vec![
            modified(&first, base),
            modified(&dir.path().join("missing.png"), base + secs(6)),
            modified(&second, base + secs(12)),
            modified(&third, base + secs(18)),
        ];
        let summary = consume_all(&mut coordinator(), &mut session, events).await;

        assert_eq!(summary.drawn, 1);
        assert_eq!(summary.superseded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(handle.count(Call::Sleep), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failed_draw_does_not_stop_loop() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "a.png");
        let handle = MockHandle::default();
        handle.fail(|f| f.init_part = true);
        let mut session = session(&handle);
        let mut coordinator = coordinator();
        let base = Instant::now();

        let (tx, mut rx) = broadcast::channel(4);
        tx.send(modified(&image, base)).unwrap();

        let token = CancellationToken::new();
        let consumer = coordinator.consume(&mut rx, &mut session, &token);
        let producer = async {
            // Give the consumer time to process the first event on its own
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.fail(|f| f.init_part = false);
            tx.send(modified(&image, base + secs(6))).unwrap();
            drop(tx);
        };
        let (summary, ()) = tokio::join!(consumer, producer);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.drawn, 1);
        assert_eq!(handle.count(Call::Sleep), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_full_queue_keeps_newest_event() {
        let dir = TempDir::new().unwrap();
        let old = write_image(dir.path(), "old.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let mut coordinator = WatchCoordinator::new(
            DebounceGate::new(Duration::ZERO),
            1,
            Duration::from_millis(500),
        );
        let base = Instant::now();

        // The queue holds one event; the undecodable newest one must win
        let (tx, mut rx) = broadcast::channel(coordinator.queue_capacity());
        tx.send(modified(&old, base)).unwrap();
        tx.send(modified(&dir.path().join("newest.png"), base + secs(1)))
            .unwrap();
        drop(tx);

        let summary = coordinator
            .consume(&mut rx, &mut session, &CancellationToken::new())
            .await;

        assert_eq!(summary.evicted, 1);
        assert_eq!(summary.received, 1);
        assert_eq!(summary.failed, 1, "newest event should have been drawn");
        assert_eq!(summary.drawn, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_source_overflow_delivers_newest_file() {
        let dir = TempDir::new().unwrap();
        let old = write_image(dir.path(), "old.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let mut coordinator = WatchCoordinator::new(
            DebounceGate::new(Duration::ZERO),
            1,
            Duration::from_millis(500),
        );

        let (tx, mut rx) = broadcast::channel(coordinator.queue_capacity());
        let source = FsEventSource::start(dir.path(), tx).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        write_image(dir.path(), "old.png");
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(dir.path().join("newest.png"), b"not an image").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        source.stop();

        let summary = coordinator
            .consume(&mut rx, &mut session, &CancellationToken::new())
            .await;

        assert!(old.exists());
        assert_eq!(summary.received, 1, "summary: {:?}", summary);
        assert_eq!(summary.failed, 1, "summary: {:?}", summary);
        assert!(summary.evicted >= 1);
    }

    #[test]
    fn test_zero_queue_capacity_is_raised() {
        let coordinator =
            WatchCoordinator::new(DebounceGate::default(), 0, Duration::from_millis(500));
        assert_eq!(coordinator.queue_capacity(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_with_zero_queue_capacity() {
        let dir = TempDir::new().unwrap();
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let token = CancellationToken::new();
        token.cancel();

        let summary =
            WatchCoordinator::new(DebounceGate::default(), 0, Duration::from_millis(500))
                .run(dir.path(), &mut session, &token)
                .await
                .unwrap();

        assert!(summary.cancelled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancellation_stops_idle_loop() {
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let (_tx, mut rx) = broadcast::channel::<WatchEvent>(4);
        let token = CancellationToken::new();
        token.cancel();

        let summary = coordinator().consume(&mut rx, &mut session, &token).await;

        assert!(summary.cancelled);
        assert_eq!(summary.received, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_partial_budget_holds_across_many_events() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "a.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let mut coordinator = WatchCoordinator::new(
            DebounceGate::new(Duration::ZERO),
            4,
            Duration::from_millis(500),
        );
        let base = Instant::now();

        let (tx, mut rx) = broadcast::channel(16);
        let token = CancellationToken::new();
        let consumer = coordinator.consume(&mut rx, &mut session, &token);
        let producer = async {
            for i in 0..12u64 {
                tx.send(modified(&image, base + Duration::from_millis(i)))
                    .unwrap();
                // Let each event be drawn on its own
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            drop(tx);
        };
        let (summary, ()) = tokio::join!(consumer, producer);

        assert_eq!(summary.drawn + summary.superseded + summary.evicted, 12);
        assert!(handle.count(Call::Init) >= 1, "budget should force a full refresh");
        assert!(session.partial_count() <= 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_rejects_missing_path() {
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let result = coordinator()
            .run(
                Path::new("/nonexistent/path/that/will/never/exist"),
                &mut session,
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(WatchError::PathNotFound { .. })));
        assert!(handle.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_draws_on_file_change_and_stops_on_cancel() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "frame.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let mut coordinator = coordinator();
        let token = CancellationToken::new();

        let watcher = coordinator.run(dir.path(), &mut session, &token);
        let writer = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            write_image(dir.path(), "frame.png");
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();
        };
        let (summary, ()) = tokio::join!(watcher, writer);
        let summary = summary.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.drawn, 1, "summary: {:?}", summary);
        assert!(image.exists());
        assert_eq!(handle.count(Call::Sleep), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_accepts_file_path() {
        let dir = TempDir::new().unwrap();
        let image = write_image(dir.path(), "frame.png");
        let handle = MockHandle::default();
        let mut session = session(&handle);
        let token = CancellationToken::new();
        token.cancel();

        let summary = coordinator()
            .run(&image, &mut session, &token)
            .await
            .unwrap();

        assert!(summary.cancelled);
    }
}
