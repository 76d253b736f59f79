//! Top-level bracket: acquire, dispatch, then always blank and sleep.

use std::path::PathBuf;
use std::time::Duration;

use surfer_config::SurferConfig;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::debounce::{DEBOUNCE_INTERVAL, DebounceGate};
use crate::display::{DisplayError, DisplaySession};
use crate::driver::{AcquisitionError, DriverFactory};
use crate::refresh::{MAX_PARTIAL, RefreshMode, RefreshPolicy};
use crate::watch::{WatchCoordinator, WatchError, WatchSummary};

/// What to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// Draw a single image once.
    Once(PathBuf),
    /// Draw every modified file in a directory until interrupted.
    Watch(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub model: String,
    pub target: RunTarget,
    pub max_partial: u32,
    pub debounce: Duration,
    pub queue_capacity: usize,
    pub join_timeout: Duration,
}

impl RunRequest {
    pub fn new(model: impl Into<String>, target: RunTarget) -> Self {
        Self {
            model: model.into(),
            target,
            max_partial: MAX_PARTIAL,
            debounce: DEBOUNCE_INTERVAL,
            queue_capacity: surfer_config::DEFAULT_QUEUE_CAPACITY,
            join_timeout: Duration::from_millis(surfer_config::DEFAULT_JOIN_TIMEOUT_MS),
        }
    }

    /// Take every setting from `config`; the caller overrides afterwards.
    pub fn from_config(config: &SurferConfig, target: RunTarget) -> Self {
        Self {
            model: config.display.model().to_string(),
            target,
            max_partial: config.refresh.max_partial(),
            debounce: config.watch.debounce_interval(),
            queue_capacity: config.watch.queue_capacity(),
            join_timeout: config.watch.join_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// One-shot image drawn with this mode.
    Displayed(RefreshMode),
    /// Watch loop ended, by interrupt or because the source closed.
    Watched(WatchSummary),
    /// Interrupted before or during the one-shot draw. A draw already in
    /// progress runs to completion first.
    Interrupted,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Draw(#[from] DisplayError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// Acquire the panel, run `request`, and release the panel.
///
/// If acquisition fails nothing else happens. Otherwise the panel is cleared
/// and put to sleep exactly once, whatever dispatch returned.
pub async fn run(
    request: &RunRequest,
    factory: &dyn DriverFactory,
    token: &CancellationToken,
) -> Result<RunOutcome, RunError> {
    info!(event = "core.run.started", model = %request.model, target = ?request.target);

    let mut session = match DisplaySession::acquire(
        factory,
        &request.model,
        RefreshPolicy::new(request.max_partial),
    ) {
        Ok(session) => session,
        Err(e) => {
            error!(event = "core.run.acquire_failed", model = %request.model, error = %e);
            return Err(e.into());
        }
    };

    let result = dispatch(request, &mut session, token).await;

    let model = session.model().to_string();
    match tokio::task::block_in_place(|| session.shutdown()) {
        Ok(()) => info!(event = "core.run.cleanup_completed", model = %model),
        Err(e) => warn!(event = "core.run.cleanup_failed", model = %model, error = %e),
    }

    match &result {
        Ok(outcome) => info!(event = "core.run.completed", outcome = ?outcome),
        Err(e) => error!(event = "core.run.failed", error = %e),
    }
    result
}

async fn dispatch(
    request: &RunRequest,
    session: &mut DisplaySession,
    token: &CancellationToken,
) -> Result<RunOutcome, RunError> {
    match &request.target {
        RunTarget::Once(image) => {
            if token.is_cancelled() {
                info!(event = "core.run.interrupted", path = %image.display());
                return Ok(RunOutcome::Interrupted);
            }
            let drawn = tokio::task::block_in_place(|| session.draw(image, false));
            let mode = match drawn {
                Ok(mode) => mode,
                Err(e) => {
                    error!(
                        event = "core.run.draw_failed",
                        path = %e.path().display(),
                        mode = %e.mode(),
                        error = %e
                    );
                    return Err(e.into());
                }
            };
            if token.is_cancelled() {
                info!(
                    event = "core.run.interrupted",
                    path = %image.display(),
                    mode = %mode,
                    "Interrupted during draw; the image was displayed"
                );
                return Ok(RunOutcome::Interrupted);
            }
            Ok(RunOutcome::Displayed(mode))
        }
        RunTarget::Watch(dir) => {
            let mut coordinator = WatchCoordinator::new(
                DebounceGate::new(request.debounce),
                request.queue_capacity,
                request.join_timeout,
            );
            let summary = coordinator.run(dir, session, token).await?;
            if summary.cancelled {
                info!(event = "core.run.interrupted", path = %dir.display());
            }
            Ok(RunOutcome::Watched(summary))
        }
    }
}
