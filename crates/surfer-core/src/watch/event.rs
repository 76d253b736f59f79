use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

/// One path-level notification from the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
    pub is_directory: bool,
    /// When the notification reached us, not when the file changed.
    pub timestamp: Instant,
}

impl WatchEvent {
    pub fn new(path: impl Into<PathBuf>, kind: WatchEventKind, timestamp: Instant) -> Self {
        Self {
            path: path.into(),
            kind,
            is_directory: false,
            timestamp,
        }
    }

    /// Only modifications of regular files trigger a draw.
    pub fn is_candidate(&self) -> bool {
        self.kind == WatchEventKind::Modified && !self.is_directory
    }

    /// Split a raw notify event into one event per path.
    ///
    /// Kinds we have no use for (access, metadata-only "other") yield nothing.
    pub fn from_notify(event: &Event, timestamp: Instant) -> Vec<WatchEvent> {
        let Some(kind) = classify(&event.kind) else {
            return Vec::new();
        };
        let folder_kind = matches!(
            event.kind,
            EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder)
        );

        event
            .paths
            .iter()
            .map(|path| WatchEvent {
                path: path.clone(),
                kind,
                is_directory: folder_kind || path.is_dir(),
                timestamp,
            })
            .collect()
    }
}

fn classify(kind: &EventKind) -> Option<WatchEventKind> {
    match kind {
        EventKind::Create(_) => Some(WatchEventKind::Created),
        EventKind::Modify(ModifyKind::Name(_)) => Some(WatchEventKind::Moved),
        EventKind::Modify(_) => Some(WatchEventKind::Modified),
        EventKind::Remove(_) => Some(WatchEventKind::Deleted),
        _ => None,
    }
}
