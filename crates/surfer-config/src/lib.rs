//! # surfer-config
//!
//! TOML configuration types, loading, and validation for surfer.
//!
//! Depends only on `surfer-paths`.

mod defaults;
mod loading;
mod validation;

pub mod errors;
pub mod types;

pub use defaults::{
    DEFAULT_DEBOUNCE_SECS, DEFAULT_JOIN_TIMEOUT_MS, DEFAULT_MAX_PARTIAL, DEFAULT_MODEL,
    DEFAULT_QUEUE_CAPACITY,
};
pub use errors::ConfigError;
pub use loading::{load_config_file, load_hierarchy, merge_configs};
pub use types::{DisplayConfig, PanelConfig, RefreshConfig, SurferConfig, WatchConfig};
pub use validation::validate_config;

impl SurferConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }
}
