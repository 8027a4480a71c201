use crate::picker::FilePicker;
use seqrename_core::{RenameConfig, RenameEvent, RenameWorker, Renamer, FILTERS};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Window state, independent of the widgets that display it.
///
/// Only the UI thread touches this; the worker reports through `poll`.
pub struct Session {
    // Text fields
    pub directory: String,
    pub prefix: String,
    pub filter_index: usize,

    // File lists
    pending: VecDeque<PathBuf>,
    renamed: Vec<String>,

    // Display state
    extension_label: String,
    progress: u8,
    status_message: Option<String>,
    error_message: Option<String>,

    // Processing
    config: RenameConfig,
    batch_size: usize,
    run_size: usize,
    worker: Option<RenameWorker>,
}

impl Session {
    pub fn new(config: RenameConfig) -> Self {
        Self {
            directory: String::new(),
            prefix: String::new(),
            filter_index: 0,
            pending: VecDeque::new(),
            renamed: Vec::new(),
            extension_label: String::new(),
            progress: 0,
            status_message: None,
            error_message: None,
            config,
            batch_size: 0,
            run_size: 0,
            worker: None,
        }
    }

    pub fn pending(&self) -> &VecDeque<PathBuf> {
        &self.pending
    }

    /// File names for the "pending" list, in queue order
    pub fn pending_names(&self) -> Vec<String> {
        self.pending
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect()
    }

    pub fn renamed(&self) -> &[String] {
        &self.renamed
    }

    pub fn extension_label(&self) -> &str {
        &self.extension_label
    }

    /// Percentage, 0 to 100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.worker.is_some()
    }

    pub fn can_rename(&self) -> bool {
        !self.is_busy() && !self.pending.is_empty()
    }

    fn start_directory(&self) -> PathBuf {
        let typed = self.directory.trim();
        if !typed.is_empty() {
            return PathBuf::from(typed);
        }
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Lets the user pick a new batch. Returns false when nothing changed.
    pub fn load(&mut self, picker: &dyn FilePicker) -> bool {
        if self.is_busy() {
            self.error_message = Some("Cannot load files while a rename is running".to_string());
            return false;
        }

        let filter = &FILTERS[self.filter_index.min(FILTERS.len() - 1)];
        let files = match picker.pick_files(&self.start_directory(), filter) {
            Some(files) if !files.is_empty() => files,
            _ => {
                log::debug!("File selection cancelled");
                return false;
            }
        };

        self.extension_label = filter.pattern();
        if let Some(parent) = files[0].parent() {
            self.directory = parent.display().to_string();
        }

        self.pending = files.into_iter().collect();
        self.batch_size = self.pending.len();
        self.renamed.clear();
        self.progress = 0;
        self.run_size = 0;
        self.error_message = None;
        self.status_message = Some(format!("Loaded {} files", self.pending.len()));

        log::info!(
            "Loaded {} files from {} ({})",
            self.pending.len(),
            self.directory,
            self.extension_label
        );
        true
    }

    /// Starts a run over a snapshot of the pending files. Returns false if none was started.
    pub fn rename(&mut self) -> bool {
        if !self.can_rename() {
            return false;
        }

        let snapshot: Vec<PathBuf> = self.pending.iter().cloned().collect();
        let run_size = snapshot.len();
        let renamer = Renamer::new(snapshot, self.prefix.clone(), self.config.clone());

        match RenameWorker::spawn(renamer) {
            Ok(worker) => {
                log::info!("Started renaming {} files", run_size);
                self.run_size = run_size;
                self.worker = Some(worker);
                self.error_message = None;
                self.status_message = Some(format!("Renaming {} files...", run_size));
                true
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                false
            }
        }
    }

    /// Asks the active run to stop before its next file
    pub fn cancel(&self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
        }
    }

    /// Applies everything the worker reported since the last call
    pub fn poll(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };

        // Checked before draining: once the thread has exited, all of its events are queued
        let exited = worker.is_finished();
        let events: Vec<RenameEvent> = worker.try_iter().collect();

        for event in events {
            let terminal = event.is_terminal();
            self.apply(event);
            if terminal {
                // Dropping the worker joins its thread, which has already sent its last event
                self.worker = None;
            }
        }

        // Exited without a terminal event, so the run panicked
        if exited && self.worker.is_some() {
            let message = match self.worker.take().map(RenameWorker::join) {
                Some(Err(e)) => e.to_string(),
                _ => "Rename worker stopped unexpectedly".to_string(),
            };
            log::warn!("{}", message);
            self.progress = 0;
            self.status_message = None;
            self.error_message = Some(message);
        }
    }

    fn apply(&mut self, event: RenameEvent) {
        match event {
            RenameEvent::Progressed(index) => {
                // Relative to the loaded batch, so a follow-up run continues the count
                self.progress = percent(index, self.batch_size);
            }
            RenameEvent::Renamed(path) => {
                if self.pending.pop_front().is_none() {
                    log::warn!("Renamed {} with nothing pending", path.display());
                }
                self.renamed.push(path.display().to_string());
            }
            RenameEvent::Finished => {
                log::info!("Renamed {} files", self.run_size);
                self.status_message = Some(format!("Renamed {} files", self.run_size));
            }
            RenameEvent::Cancelled { completed } => {
                log::info!("Rename cancelled after {} files", completed);
                self.progress = 0;
                self.status_message = Some(format!(
                    "Cancelled after {} of {} files",
                    completed, self.run_size
                ));
            }
            RenameEvent::Failed(e) => {
                log::warn!("Rename failed: {}", e);
                self.progress = 0;
                self.status_message = None;
                self.error_message = Some(format!("Rename failed: {}", e));
            }
        }
    }

    /// Names the next run would produce, for the current queue and prefix
    pub fn preview(&self) -> Vec<String> {
        let renamer = Renamer::new(
            self.pending.iter().cloned().collect(),
            self.prefix.clone(),
            self.config.clone(),
        );
        match renamer.plan() {
            Ok(steps) => steps
                .iter()
                .map(|s| {
                    s.to.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// `index` out of `total` as a whole percentage; an empty batch reads 0
fn percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (index.min(total) * 100 / total) as u8
}
