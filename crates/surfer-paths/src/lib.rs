use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("home directory not found; set the $HOME environment variable")]
    HomeNotFound,
}

/// Centralized path construction for the `~/.surfer/` directory layout.
///
/// Use `resolve()` in production code and `from_dir()` in tests.
#[derive(Debug, Clone)]
pub struct SurferPaths {
    surfer_dir: PathBuf,
}

impl SurferPaths {
    /// Resolve paths from the user's home directory (`~/.surfer`).
    pub fn resolve() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeNotFound)?;
        Ok(Self {
            surfer_dir: home.join(".surfer"),
        })
    }

    /// Create paths from an explicit base directory. Use in tests.
    pub fn from_dir(surfer_dir: PathBuf) -> Self {
        Self { surfer_dir }
    }

    /// The base `~/.surfer` directory.
    pub fn surfer_dir(&self) -> &Path {
        &self.surfer_dir
    }

    /// User-level config: `~/.surfer/config.toml`.
    pub fn user_config(&self) -> PathBuf {
        self.surfer_dir.join("config.toml")
    }

    /// Snapshot directory for emulated panels: `~/.surfer/panel`.
    pub fn panel_dir(&self) -> PathBuf {
        self.surfer_dir.join("panel")
    }

    /// Project-level config: `<project_root>/.surfer/config.toml`.
    pub fn project_config(project_root: &Path) -> PathBuf {
        project_root.join(".surfer").join("config.toml")
    }
}
