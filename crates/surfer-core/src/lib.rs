//! surfer-core: orchestration for e-paper panels
//!
//! Draws images on a panel, one at a time, choosing between full and
//! partial refreshes, and redraws whenever a file in a watched directory
//! changes. The panel is always put to sleep after each draw and blanked
//! when the run ends.
//!
//! # Main Entry Points
//!
//! - [`runner`] - Acquire a panel, dispatch a one-shot or watch run, clean up
//! - [`display`] - Draw images through a driver with the refresh budget
//! - [`watch`] - Filesystem event source and the single-consumer watch loop
//! - [`driver`] - Driver capability interface and the built-in panel catalogue

pub mod debounce;
pub mod display;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod refresh;
pub mod runner;
pub mod shutdown;
pub mod watch;

pub use debounce::{DEBOUNCE_INTERVAL, DebounceGate};
pub use display::{DisplayError, DisplaySession, SessionState};
pub use driver::{
    AcquisitionError, DriverError, DriverFactory, EmulatedPanel, EpdDriver, FrameBuffer,
    PanelRegistry, PanelSpec,
};
pub use errors::SurferError;
pub use refresh::{MAX_PARTIAL, RefreshMode, RefreshPolicy};
pub use runner::{RunError, RunOutcome, RunRequest, RunTarget};
pub use watch::{WatchCoordinator, WatchError, WatchEvent, WatchEventKind, WatchSummary};

pub use surfer_config::{ConfigError, SurferConfig};

// Re-export logging initialization
pub use logging::{LogLevel, init_logging};
pub use shutdown::ShutdownSignal;
