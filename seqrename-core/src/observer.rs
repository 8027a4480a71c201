use crate::RenameError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Receives the notifications of a rename run, in the order they happen
pub trait RenameObserver {
    /// 1-based index of the file just renamed, or 0 once the run is done
    fn progressed(&mut self, index: usize);

    /// Path the file was renamed to
    fn file_renamed(&mut self, path: &Path);

    /// The whole batch was renamed
    fn finished(&mut self);
}

/// Message form of the run notifications, plus the terminal states a worker reports
#[derive(Debug)]
pub enum RenameEvent {
    Progressed(usize),
    Renamed(PathBuf),
    Finished,
    Cancelled { completed: usize },
    Failed(RenameError),
}

impl RenameEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RenameEvent::Finished | RenameEvent::Cancelled { .. } | RenameEvent::Failed(_)
        )
    }
}

impl RenameObserver for Sender<RenameEvent> {
    fn progressed(&mut self, index: usize) {
        forward(self, RenameEvent::Progressed(index));
    }

    fn file_renamed(&mut self, path: &Path) {
        forward(self, RenameEvent::Renamed(path.to_path_buf()));
    }

    fn finished(&mut self) {
        forward(self, RenameEvent::Finished);
    }
}

pub(crate) fn forward(sender: &Sender<RenameEvent>, event: RenameEvent) {
    // The receiver goes away when the window drops the run; renaming carries on regardless
    if sender.send(event).is_err() {
        log::debug!("Rename event receiver dropped");
    }
}
