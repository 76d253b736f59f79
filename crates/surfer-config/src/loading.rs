//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.surfer/config.toml` (global user preferences)
//! 3. **Project config** - `./.surfer/config.toml` (per-directory overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the CLI)

use crate::errors::ConfigError;
use crate::types::{DisplayConfig, PanelConfig, RefreshConfig, SurferConfig, WatchConfig};
use crate::validation::validate_config;
use std::fs;
use std::path::Path;
use surfer_paths::SurferPaths;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<SurferConfig, ConfigError> {
    let user_config = match SurferPaths::resolve() {
        Ok(paths) => Some(paths.user_config()),
        Err(e) => {
            tracing::debug!(
                event = "config.user_config_unresolved",
                error = %e
            );
            None
        }
    };
    let project_root = std::env::current_dir()?;
    load_hierarchy_from(
        user_config.as_deref(),
        &SurferPaths::project_config(&project_root),
    )
}

pub(crate) fn load_hierarchy_from(
    user_config: Option<&Path>,
    project_config: &Path,
) -> Result<SurferConfig, ConfigError> {
    let mut config = SurferConfig::default();

    if let Some(path) = user_config
        && let Some(user) = load_optional(path)?
    {
        config = merge_configs(config, user);
    }

    if let Some(project) = load_optional(project_config)? {
        config = merge_configs(config, project);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a config file, treating a missing file as `None`.
fn load_optional(path: &Path) -> Result<Option<SurferConfig>, ConfigError> {
    match load_config_file(path) {
        Ok(config) => {
            tracing::debug!(event = "config.file_loaded", path = %path.display());
            Ok(Some(config))
        }
        Err(ConfigError::IoError { source }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<SurferConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: SurferConfig, override_config: SurferConfig) -> SurferConfig {
    SurferConfig {
        display: DisplayConfig {
            model: override_config.display.model.or(base.display.model),
        },
        refresh: RefreshConfig {
            max_partial: override_config
                .refresh
                .max_partial
                .or(base.refresh.max_partial),
        },
        watch: WatchConfig {
            debounce_secs: override_config
                .watch
                .debounce_secs
                .or(base.watch.debounce_secs),
            queue_capacity: override_config
                .watch
                .queue_capacity
                .or(base.watch.queue_capacity),
            join_timeout_ms: override_config
                .watch
                .join_timeout_ms
                .or(base.watch.join_timeout_ms),
        },
        panel: PanelConfig {
            output_dir: override_config.panel.output_dir.or(base.panel.output_dir),
        },
    }
}
