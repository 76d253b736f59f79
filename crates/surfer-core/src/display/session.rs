//! Exclusive owner of a driver handle.
//!
//! Every `draw` ends with exactly one `sleep`, whichever step failed. The
//! panel must never be left powered between draws: an active panel ghosts and
//! can be damaged.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::display::errors::DisplayError;
use crate::driver::{AcquisitionError, DriverError, DriverFactory, EpdDriver};
use crate::refresh::{RefreshMode, RefreshPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handle acquired, nothing sent to the panel yet.
    Uninitialized,
    /// Panel woken by `init`/`init_part` during a draw.
    Ready,
    /// Panel put to sleep; the state between draws.
    Asleep,
}

pub struct DisplaySession {
    model: String,
    driver: Box<dyn EpdDriver>,
    policy: RefreshPolicy,
    state: SessionState,
    released: bool,
}

impl DisplaySession {
    pub fn new(model: impl Into<String>, driver: Box<dyn EpdDriver>, policy: RefreshPolicy) -> Self {
        Self {
            model: model.into(),
            driver,
            policy,
            state: SessionState::Uninitialized,
            released: false,
        }
    }

    /// Acquire a driver for `model` and wrap it in a session.
    pub fn acquire(
        factory: &dyn DriverFactory,
        model: &str,
        policy: RefreshPolicy,
    ) -> Result<Self, AcquisitionError> {
        let driver = factory.acquire(model)?;
        Ok(Self::new(model, driver, policy))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Consecutive partial refreshes since the last full one.
    pub fn partial_count(&self) -> u32 {
        self.policy.count()
    }

    /// Draw an image file, partially if the refresh budget allows it.
    ///
    /// Returns the refresh mode that was used. The first error wins; a sleep
    /// failure is only reported when everything before it succeeded.
    pub fn draw(&mut self, image: &Path, try_partial: bool) -> Result<RefreshMode, DisplayError> {
        let mode = self.policy.decide_mode(try_partial);
        debug!(
            event = "core.display.draw_started",
            path = %image.display(),
            mode = %mode,
            partial_count = self.policy.count()
        );

        let outcome = self.refresh(image, mode);
        let slept = self.driver.sleep();
        self.state = SessionState::Asleep;

        match (outcome, slept) {
            (Ok(()), Ok(())) => {
                info!(
                    event = "core.display.draw_completed",
                    path = %image.display(),
                    mode = %mode,
                    partial_count = self.policy.count()
                );
                Ok(mode)
            }
            (Ok(()), Err(source)) => Err(DisplayError::SleepFailed {
                path: image.to_path_buf(),
                mode,
                source,
            }),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(sleep_error)) => {
                warn!(
                    event = "core.display.sleep_failed",
                    path = %image.display(),
                    mode = %mode,
                    error = %sleep_error
                );
                Err(e)
            }
        }
    }

    /// Wake, decode, transfer. Does not sleep; `draw` does that.
    fn refresh(&mut self, image: &Path, mode: RefreshMode) -> Result<(), DisplayError> {
        let woken = match mode {
            RefreshMode::Full => self.driver.init(),
            RefreshMode::Partial => self.driver.init_part(),
        };
        woken.map_err(|source| DisplayError::InitFailed {
            path: image.to_path_buf(),
            mode,
            source,
        })?;
        self.state = SessionState::Ready;

        let buffer = image::open(image)
            .map_err(DriverError::from)
            .and_then(|decoded| self.driver.get_buffer(&decoded))
            .map_err(|source| DisplayError::DecodeFailed {
                path: image.to_path_buf(),
                mode,
                source,
            })?;

        let (width, height) = (self.driver.width(), self.driver.height());
        let sent = match mode {
            RefreshMode::Full => self.driver.display(&buffer),
            RefreshMode::Partial => self.driver.display_partial(&buffer, 0, 0, width, height),
        };
        sent.map_err(|source| DisplayError::TransferFailed {
            path: image.to_path_buf(),
            mode,
            source,
        })?;

        self.policy.record(mode);
        Ok(())
    }

    /// Blank the panel and put it to sleep for good.
    ///
    /// Sleep is attempted even when waking or clearing fails. Returns the
    /// first error.
    pub fn shutdown(mut self) -> Result<(), DriverError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), DriverError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!(event = "core.display.release_started", model = %self.model);

        let cleared = self.driver.init().and_then(|()| self.driver.clear());
        let slept = self.driver.sleep();
        self.state = SessionState::Asleep;

        cleared.and(slept)
    }
}

impl Drop for DisplaySession {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(
            event = "core.display.released_on_drop",
            model = %self.model,
            "Session dropped without shutdown; blanking panel"
        );
        if let Err(e) = self.release() {
            warn!(
                event = "core.display.release_failed",
                model = %self.model,
                error = %e
            );
        }
    }
}

impl std::fmt::Debug for DisplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySession")
            .field("model", &self.model)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
