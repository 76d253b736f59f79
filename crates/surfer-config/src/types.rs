//! Configuration types read from `config.toml`.
//!
//! Every field is optional in the file; accessors fall back to the built-in
//! defaults so that partially-written files behave predictably when merged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_DEBOUNCE_SECS, DEFAULT_JOIN_TIMEOUT_MS, DEFAULT_MAX_PARTIAL, DEFAULT_MODEL,
    DEFAULT_QUEUE_CAPACITY,
};

/// Root of the surfer configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurferConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub panel: PanelConfig,
}

/// `[display]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Hardware model specifier, e.g. `"epd7in5_V2"`.
    #[serde(default)]
    pub model: Option<String>,
}

impl DisplayConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// `[refresh]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Consecutive partial refreshes allowed before a full refresh is forced.
    /// Default: 10
    #[serde(default)]
    pub max_partial: Option<u32>,
}

impl RefreshConfig {
    pub fn max_partial(&self) -> u32 {
        self.max_partial.unwrap_or(DEFAULT_MAX_PARTIAL)
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Minimum seconds between two accepted change notifications.
    /// Default: 5
    #[serde(default)]
    pub debounce_secs: Option<u64>,

    /// Bounded channel size between the event source and the coordinator.
    /// Default: 64
    #[serde(default)]
    pub queue_capacity: Option<usize>,

    /// Milliseconds to wait for the event source to stop on shutdown.
    /// Default: 2000
    #[serde(default)]
    pub join_timeout_ms: Option<u64>,
}

impl WatchConfig {
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_secs(self.debounce_secs.unwrap_or(DEFAULT_DEBOUNCE_SECS))
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms.unwrap_or(DEFAULT_JOIN_TIMEOUT_MS))
    }
}

/// `[panel]` section, used by the emulated panel backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Directory receiving PNG snapshots of the panel contents.
    /// Default: `~/.surfer/panel`
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl PanelConfig {
    /// Resolve the snapshot directory.
    ///
    /// Falls back to a directory under the system temp dir when `$HOME`
    /// cannot be resolved.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match surfer_paths::SurferPaths::resolve() {
            Ok(paths) => paths.panel_dir(),
            Err(e) => {
                let fallback = std::env::temp_dir().join("surfer-panel");
                tracing::warn!(
                    event = "config.panel.output_dir_fallback",
                    error = %e,
                    path = %fallback.display(),
                    "Cannot resolve ~/.surfer; panel snapshots go to the temp dir"
                );
                fallback
            }
        }
    }
}
