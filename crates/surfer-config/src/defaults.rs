//! Built-in fallback values, used when no config file sets a field.

/// Display model specifier used when neither config nor CLI names one.
pub const DEFAULT_MODEL: &str = "epd7in5_V2";

/// Consecutive partial refreshes allowed before a full refresh is forced.
pub const DEFAULT_MAX_PARTIAL: u32 = 10;

/// Minimum seconds between two accepted change notifications.
pub const DEFAULT_DEBOUNCE_SECS: u64 = 5;

/// Capacity of the bounded channel between the event source and the coordinator.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Upper bound on waiting for the event source worker to release its callback.
pub const DEFAULT_JOIN_TIMEOUT_MS: u64 = 2000;
