use std::error::Error;

use crate::display::DisplayError;
use crate::driver::AcquisitionError;
use crate::runner::RunError;
use crate::watch::WatchError;

/// Base trait for all application errors
pub trait SurferError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether the user can fix this by changing arguments or config
    fn is_user_error(&self) -> bool {
        false
    }
}

impl SurferError for AcquisitionError {
    fn error_code(&self) -> &'static str {
        match self {
            AcquisitionError::UnknownModel { .. } => "UNKNOWN_MODEL",
            AcquisitionError::BackendFailed { .. } => "BACKEND_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, AcquisitionError::UnknownModel { .. })
    }
}

impl SurferError for DisplayError {
    fn error_code(&self) -> &'static str {
        match self {
            DisplayError::InitFailed { .. } => "DISPLAY_INIT_FAILED",
            DisplayError::DecodeFailed { .. } => "DISPLAY_DECODE_FAILED",
            DisplayError::TransferFailed { .. } => "DISPLAY_TRANSFER_FAILED",
            DisplayError::SleepFailed { .. } => "DISPLAY_SLEEP_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        // Unreadable or wrongly sized images
        matches!(self, DisplayError::DecodeFailed { .. })
    }
}

impl SurferError for WatchError {
    fn error_code(&self) -> &'static str {
        match self {
            WatchError::PathNotFound { .. } => "WATCH_PATH_NOT_FOUND",
            WatchError::WatcherFailed { .. } => "WATCHER_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WatchError::PathNotFound { .. })
    }
}

impl SurferError for RunError {
    fn error_code(&self) -> &'static str {
        match self {
            RunError::Acquisition(e) => e.error_code(),
            RunError::Draw(e) => e.error_code(),
            RunError::Watch(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            RunError::Acquisition(e) => e.is_user_error(),
            RunError::Draw(e) => e.is_user_error(),
            RunError::Watch(e) => e.is_user_error(),
        }
    }
}

impl SurferError for surfer_config::ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            surfer_config::ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            surfer_config::ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            surfer_config::ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            surfer_config::ConfigError::ConfigParseError { .. }
                | surfer_config::ConfigError::InvalidConfiguration { .. }
        )
    }
}
