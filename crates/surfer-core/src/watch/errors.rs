use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Watch path '{path}' does not exist")]
    PathNotFound { path: PathBuf },

    #[error("Cannot watch '{path}': {source}")]
    WatcherFailed {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
