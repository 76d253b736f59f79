use std::path::PathBuf;

use crate::driver::DriverError;
use crate::refresh::RefreshMode;

/// Failure of a single draw attempt. Never fatal on its own.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to initialise panel for {mode} refresh of '{path}': {source}")]
    InitFailed {
        path: PathBuf,
        mode: RefreshMode,
        #[source]
        source: DriverError,
    },

    #[error("Failed to decode '{path}' for {mode} refresh: {source}")]
    DecodeFailed {
        path: PathBuf,
        mode: RefreshMode,
        #[source]
        source: DriverError,
    },

    #[error("Failed to send '{path}' to the panel ({mode} refresh): {source}")]
    TransferFailed {
        path: PathBuf,
        mode: RefreshMode,
        #[source]
        source: DriverError,
    },

    #[error("Failed to put panel to sleep after {mode} refresh of '{path}': {source}")]
    SleepFailed {
        path: PathBuf,
        mode: RefreshMode,
        #[source]
        source: DriverError,
    },
}

impl DisplayError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            DisplayError::InitFailed { path, .. }
            | DisplayError::DecodeFailed { path, .. }
            | DisplayError::TransferFailed { path, .. }
            | DisplayError::SleepFailed { path, .. } => path,
        }
    }

    pub fn mode(&self) -> RefreshMode {
        match self {
            DisplayError::InitFailed { mode, .. }
            | DisplayError::DecodeFailed { mode, .. }
            | DisplayError::TransferFailed { mode, .. }
            | DisplayError::SleepFailed { mode, .. } => *mode,
        }
    }
}
