//! Refresh mode policy.
//!
//! Partial refreshes are cheap but leave ghosting behind and wear the panel
//! faster, so they are budgeted: after `max_partial` consecutive partial
//! refreshes the next draw is forced to be full, which resets the budget.

use std::fmt;

/// Consecutive partial refreshes allowed before a full refresh is forced.
pub const MAX_PARTIAL: u32 = 10;

/// How a single draw is pushed to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Re-initialises the whole panel and clears ghosting. Slow.
    Full,
    /// Updates in place without the flashing cycle. Fast, degrades quality.
    Partial,
}

impl RefreshMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshMode::Full => "full",
            RefreshMode::Partial => "partial",
        }
    }
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks consecutive partial refreshes and decides the mode of each draw.
///
/// `decide_mode` never mutates; the caller reports what actually reached the
/// panel through `record`.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    count: u32,
    max_partial: u32,
}

impl RefreshPolicy {
    pub fn new(max_partial: u32) -> Self {
        Self {
            count: 0,
            max_partial,
        }
    }

    /// Consecutive partial refreshes since the last full refresh.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max_partial(&self) -> u32 {
        self.max_partial
    }

    pub fn decide_mode(&self, try_partial: bool) -> RefreshMode {
        if !try_partial {
            return RefreshMode::Full;
        }
        if self.count < self.max_partial {
            RefreshMode::Partial
        } else {
            RefreshMode::Full
        }
    }

    /// Record a refresh that was sent to the panel.
    ///
    /// Recording a partial refresh past the budget is a caller bug, not a
    /// runtime condition: `decide_mode` would have returned `Full`.
    pub fn record(&mut self, mode: RefreshMode) {
        match mode {
            RefreshMode::Full => self.count = 0,
            RefreshMode::Partial => {
                debug_assert!(
                    self.count < self.max_partial,
                    "partial refresh recorded past budget ({} >= {})",
                    self.count,
                    self.max_partial
                );
                self.count += 1;
            }
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(MAX_PARTIAL)
    }
}
