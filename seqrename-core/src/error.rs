use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a rename run. The run stops at the first one.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("source file does not exist: {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error(
        "destination file already exists: {}. Refusing to overwrite it with {}",
        to.display(),
        from.display()
    )]
    DestinationExists { from: PathBuf, to: PathBuf },

    #[error("file has no parent directory: {}", path.display())]
    NoParent { path: PathBuf },

    #[error("failed to rename {} to {}: {error}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to start rename worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("rename worker panicked")]
    WorkerPanicked,
}

impl RenameError {
    /// The file the failure is about, if there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            RenameError::SourceMissing { path } | RenameError::NoParent { path } => Some(path),
            RenameError::DestinationExists { to, .. } => Some(to),
            RenameError::Io { from, .. } => Some(from),
            RenameError::Spawn(_) | RenameError::WorkerPanicked => None,
        }
    }
}
