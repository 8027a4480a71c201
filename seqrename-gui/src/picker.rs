use seqrename_core::FileFilter;
use std::path::{Path, PathBuf};

/// Source of a file selection. `None` or an empty list means the user cancelled.
pub trait FilePicker {
    fn pick_files(&self, start_dir: &Path, filter: &FileFilter) -> Option<Vec<PathBuf>>;
}

/// Native "open files" dialog
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    fn pick_files(&self, start_dir: &Path, filter: &FileFilter) -> Option<Vec<PathBuf>> {
        rfd::FileDialog::new()
            .set_title("Choose Files to Rename")
            .set_directory(start_dir)
            .add_filter(filter.name, &[filter.extension])
            .pick_files()
    }
}
