//! Directory watching: turns filesystem notifications into draw requests.

pub mod coordinator;
pub mod errors;
pub mod event;
pub mod source;

pub use coordinator::{WatchCoordinator, WatchSummary, resolve_directory};
pub use errors::WatchError;
pub use event::{WatchEvent, WatchEventKind};
pub use source::FsEventSource;
