//! Filesystem event source backed by `notify`.
//!
//! The watcher's callback runs on notify's own worker thread. It only
//! converts and forwards; all filtering and drawing happens on the consumer
//! side of the channel.
//!
//! The channel is a bounded ring: when it is full the oldest queued event is
//! overwritten, so the newest notification always reaches the consumer.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::broadcast;

use super::errors::WatchError;
use super::event::WatchEvent;

pub struct FsEventSource {
    /// The underlying notify watcher. Dropping it stops the worker.
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl FsEventSource {
    /// Start watching `dir` non-recursively, forwarding events into `tx`.
    ///
    /// When the channel is full the oldest queued event is evicted; the
    /// consumer sees the gap as a lag and counts it.
    pub fn start(dir: &Path, tx: broadcast::Sender<WatchEvent>) -> Result<Self, WatchError> {
        let handler = move |result: notify::Result<notify::Event>| match result {
            Ok(event) => {
                for watch_event in WatchEvent::from_notify(&event, Instant::now()) {
                    // Only fails once the consumer is gone; we are shutting down
                    let _ = tx.send(watch_event);
                }
            }
            Err(e) => {
                tracing::warn!(event = "core.watch.event_error", error = %e);
            }
        };

        let mut watcher =
            notify::recommended_watcher(handler).map_err(|source| WatchError::WatcherFailed {
                path: dir.to_path_buf(),
                source,
            })?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::WatcherFailed {
                path: dir.to_path_buf(),
                source,
            })?;

        tracing::info!(event = "core.watch.source_started", path = %dir.display());

        Ok(Self {
            watcher,
            path: dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop delivering events.
    ///
    /// The worker releases its sender asynchronously; callers wait for the
    /// channel to close to know it is gone.
    pub fn stop(self) {
        let Self { watcher, path } = self;
        drop(watcher);
        tracing::info!(event = "core.watch.source_stopped", path = %path.display());
    }
}

impl std::fmt::Debug for FsEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsEventSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
