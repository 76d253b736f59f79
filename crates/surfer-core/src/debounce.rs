//! Suppression of change notifications that arrive too close together.

use std::time::{Duration, Instant};

/// Minimum interval between two accepted notifications.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_secs(5);

/// Accepts an event only if `interval` has passed since the last accepted one.
///
/// Rejected events do not move the window. Timestamps earlier than the last
/// accepted one are rejected, so time never runs backwards.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl DebounceGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    pub fn accept(&mut self, event_time: Instant) -> bool {
        let accepted = match self.last_accepted {
            None => true,
            Some(last) => event_time
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        };
        if accepted {
            self.last_accepted = Some(event_time);
        }
        accepted
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEBOUNCE_INTERVAL)
    }
}
