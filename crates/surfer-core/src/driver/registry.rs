use std::path::{Path, PathBuf};

use super::emulator::EmulatedPanel;
use super::errors::{AcquisitionError, DriverError};
use super::models;
use super::{DriverFactory, EpdDriver};

/// Resolves model specifiers against the built-in panel catalogue.
///
/// Every catalogued model is served by an [`EmulatedPanel`] that writes its
/// contents to `<output_dir>/<model>.png`.
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    output_dir: PathBuf,
}

impl PanelRegistry {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl DriverFactory for PanelRegistry {
    fn acquire(&self, model: &str) -> Result<Box<dyn EpdDriver>, AcquisitionError> {
        tracing::debug!(event = "core.driver.acquire_started", model = model);

        let spec = models::find(model).ok_or_else(|| AcquisitionError::UnknownModel {
            model: model.to_string(),
            supported: models::supported_models_string(),
        })?;

        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            AcquisitionError::BackendFailed {
                model: model.to_string(),
                source: DriverError::from(e),
            }
        })?;

        let snapshot_path = self.output_dir.join(format!("{}.png", spec.model));
        tracing::info!(
            event = "core.driver.acquire_completed",
            model = spec.model,
            width = spec.width,
            height = spec.height,
            snapshot = %snapshot_path.display()
        );

        Ok(Box::new(EmulatedPanel::new(*spec, snapshot_path)))
    }
}
