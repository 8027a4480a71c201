use std::time::Duration;

// Internal modules (private)
mod error;
mod filters;
mod observer;
mod renamer;
mod worker;

// Re-export public types
pub use error::RenameError;
pub use filters::{FileFilter, FILTERS};
pub use observer::{RenameEvent, RenameObserver};
pub use renamer::{target_path, CancelToken, RenameStep, Renamer, RunOutcome};
pub use worker::RenameWorker;

/// Pause inserted after each rename so progress stays visible to a human
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Configuration options for a rename run
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Fixed pause after every successful rename (zero disables it)
    pub delay: Duration,
}

impl RenameConfig {
    /// Configuration without any pause between renames, for tests and automation
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}
