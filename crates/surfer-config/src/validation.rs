//! Configuration validation logic.

use crate::errors::ConfigError;
use crate::types::SurferConfig;

/// Upper bound for `refresh.max_partial`; beyond this the panel would go
/// effectively without full refreshes.
const MAX_PARTIAL_LIMIT: u32 = 1000;

/// Validate a SurferConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `display.model`, if set, must not be empty
/// - `refresh.max_partial` must be at most 1000
/// - `watch.queue_capacity` must be greater than 0
/// - `watch.join_timeout_ms` must be greater than 0
pub fn validate_config(config: &SurferConfig) -> Result<(), ConfigError> {
    if let Some(ref model) = config.display.model
        && model.trim().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "display.model cannot be empty".to_string(),
        });
    }

    if config.refresh.max_partial() > MAX_PARTIAL_LIMIT {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "refresh.max_partial must be <= {} (got {})",
                MAX_PARTIAL_LIMIT,
                config.refresh.max_partial()
            ),
        });
    }

    if config.watch.queue_capacity() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "watch.queue_capacity must be > 0".to_string(),
        });
    }

    if config.watch.join_timeout_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "watch.join_timeout_ms must be > 0".to_string(),
        });
    }

    Ok(())
}
