use crate::{RenameConfig, RenameError, RenameObserver};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Shared flag used to stop a run between two files
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a run ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled { completed: usize },
}

/// One planned rename: the 1-based index, the file, and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameStep {
    pub index: usize,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Builds `<parent>/<prefix><index>.<ext>`, keeping the file's own extension.
/// Files without an extension get none.
pub fn target_path(file: &Path, prefix: &str, index: usize) -> Result<PathBuf, RenameError> {
    let parent = file.parent().ok_or_else(|| RenameError::NoParent {
        path: file.to_path_buf(),
    })?;

    let mut name = OsString::from(format!("{}{}", prefix, index));
    if let Some(extension) = file.extension() {
        name.push(".");
        name.push(extension);
    }

    Ok(parent.join(name))
}

/// One rename pass over a fixed, ordered batch with a shared prefix
#[derive(Debug)]
pub struct Renamer {
    files: Vec<PathBuf>,
    prefix: String,
    config: RenameConfig,
    cancel: CancelToken,
}

impl Renamer {
    pub fn new(files: Vec<PathBuf>, prefix: impl Into<String>, config: RenameConfig) -> Self {
        Self {
            files,
            prefix: prefix.into(),
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token that stops this run before its next file
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Target of every file, without touching the filesystem
    pub fn plan(&self) -> Result<Vec<RenameStep>, RenameError> {
        self.files
            .iter()
            .enumerate()
            .map(|(offset, from)| -> Result<RenameStep, RenameError> {
                let index = offset + 1;
                Ok(RenameStep {
                    index,
                    from: from.clone(),
                    to: target_path(from, &self.prefix, index)?,
                })
            })
            .collect()
    }

    /// Renames the batch in order, notifying the observer after each file.
    ///
    /// Stops at the first failure; files renamed before it stay renamed.
    /// Progress is reset to 0 and `finished` is sent only when every file was renamed.
    pub fn run(&self, observer: &mut dyn RenameObserver) -> Result<RunOutcome, RenameError> {
        info!(
            "Renaming {} files with prefix {:?}",
            self.files.len(),
            self.prefix
        );

        for (offset, from) in self.files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("Rename run cancelled after {} files", offset);
                return Ok(RunOutcome::Cancelled { completed: offset });
            }

            let index = offset + 1;
            let to = target_path(from, &self.prefix, index)?;

            if let Err(e) = rename_file(from, &to) {
                warn!("Stopping rename run at file {}: {}", index, e);
                return Err(e);
            }

            if !self.config.delay.is_zero() {
                thread::sleep(self.config.delay);
            }

            observer.progressed(index);
            observer.file_renamed(&to);
        }

        observer.progressed(0);
        observer.finished();
        info!("Rename run complete");

        Ok(RunOutcome::Completed)
    }
}

/// Renames a single file without ever replacing an existing one
fn rename_file(from: &Path, to: &Path) -> Result<(), RenameError> {
    // symlink_metadata so a dangling link still counts as present
    if fs::symlink_metadata(from).is_err() {
        return Err(RenameError::SourceMissing {
            path: from.to_path_buf(),
        });
    }

    if from == to {
        debug!("Already named {}, leaving it", to.display());
        return Ok(());
    }

    // A case-insensitive filesystem reports a case-only target as present: it is the source itself
    if fs::symlink_metadata(to).is_ok() && !(is_case_change(from, to) && same_file(from, to)) {
        return Err(RenameError::DestinationExists {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    fs::rename(from, to).map_err(|error| RenameError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error,
    })?;

    info!("Renamed: {} -> {}", from.display(), to.display());
    Ok(())
}

/// Same directory, file names differing only in letter case
fn is_case_change(from: &Path, to: &Path) -> bool {
    match (from.file_name(), to.file_name()) {
        (Some(a), Some(b)) => {
            from.parent() == to.parent()
                && a != b
                && a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
        }
        _ => false,
    }
}

#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        progress: Vec<usize>,
        renamed: Vec<PathBuf>,
        finished: usize,
    }

    impl RenameObserver for Recorder {
        fn progressed(&mut self, index: usize) {
            self.progress.push(index);
        }

        fn file_renamed(&mut self, path: &Path) {
            self.renamed.push(path.to_path_buf());
        }

        fn finished(&mut self) {
            self.finished += 1;
        }
    }

    fn touch(dir: &TempDir, name: &str) -> Result<PathBuf> {
        let path = dir.path().join(name);
        fs::write(&path, name)?;
        Ok(path)
    }

    #[test]
    fn test_target_path_keeps_extension() -> Result<()> {
        let to = target_path(Path::new("/photos/IMG_0042.JPG"), "holiday_", 7)?;
        assert_eq!(to, PathBuf::from("/photos/holiday_7.JPG"));

        // Only the last extension is carried over
        let to = target_path(Path::new("/docs/backup.tar.gz"), "b", 2)?;
        assert_eq!(to, PathBuf::from("/docs/b2.gz"));

        let to = target_path(Path::new("/docs/README"), "doc", 1)?;
        assert_eq!(to, PathBuf::from("/docs/doc1"));
        Ok(())
    }

    #[test]
    fn test_target_path_empty_prefix() -> Result<()> {
        let to = target_path(Path::new("/a/notes.txt"), "", 12)?;
        assert_eq!(to, PathBuf::from("/a/12.txt"));
        Ok(())
    }

    #[test]
    fn test_target_path_without_parent() {
        let err = target_path(Path::new("/"), "x", 1).unwrap_err();
        assert!(matches!(err, RenameError::NoParent { .. }));
    }

    #[test]
    fn test_run_renames_in_order() -> Result<()> {
        let dir = TempDir::new()?;
        let a = touch(&dir, "a.png")?;
        let b = touch(&dir, "b.png")?;

        let renamer = Renamer::new(vec![a.clone(), b.clone()], "img_", RenameConfig::immediate());
        let mut recorder = Recorder::default();
        let outcome = renamer.run(&mut recorder)?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(recorder.progress, vec![1, 2, 0]);
        assert_eq!(
            recorder.renamed,
            vec![dir.path().join("img_1.png"), dir.path().join("img_2.png")]
        );
        assert_eq!(recorder.finished, 1);
        assert!(!a.exists() && !b.exists());
        assert_eq!(fs::read_to_string(dir.path().join("img_1.png"))?, "a.png");
        assert_eq!(fs::read_to_string(dir.path().join("img_2.png"))?, "b.png");
        Ok(())
    }

    #[test]
    fn test_run_empty_batch() -> Result<()> {
        let renamer = Renamer::new(Vec::new(), "x", RenameConfig::immediate());
        let mut recorder = Recorder::default();

        assert_eq!(renamer.run(&mut recorder)?, RunOutcome::Completed);
        assert_eq!(recorder.progress, vec![0]);
        assert!(recorder.renamed.is_empty());
        assert_eq!(recorder.finished, 1);
        Ok(())
    }

    #[test]
    fn test_run_refuses_to_overwrite() -> Result<()> {
        let dir = TempDir::new()?;
        let a = touch(&dir, "a.txt")?;
        let b = touch(&dir, "b.txt")?;
        let blocker = touch(&dir, "n2.txt")?;

        let renamer = Renamer::new(vec![a, b.clone()], "n", RenameConfig::immediate());
        let mut recorder = Recorder::default();
        let err = renamer.run(&mut recorder).unwrap_err();

        assert!(matches!(err, RenameError::DestinationExists { .. }));
        assert_eq!(err.path(), Some(blocker.as_path()));
        // First file stays renamed, the rest is untouched, no reset or finish
        assert!(dir.path().join("n1.txt").exists());
        assert!(b.exists());
        assert_eq!(fs::read_to_string(&blocker)?, "n2.txt");
        assert_eq!(recorder.progress, vec![1]);
        assert_eq!(recorder.finished, 0);
        Ok(())
    }

    #[test]
    fn test_run_refuses_pending_source_as_target() -> Result<()> {
        let dir = TempDir::new()?;
        let first = touch(&dir, "z.png")?;
        let second = touch(&dir, "p1.png")?;

        // z.png would become p1.png, which is still waiting its turn
        let renamer = Renamer::new(vec![first.clone(), second.clone()], "p", RenameConfig::immediate());
        let err = renamer.run(&mut Recorder::default()).unwrap_err();

        assert!(matches!(err, RenameError::DestinationExists { .. }));
        assert!(first.exists());
        assert_eq!(fs::read_to_string(&second)?, "p1.png");
        Ok(())
    }

    #[test]
    fn test_run_already_named_is_noop() -> Result<()> {
        let dir = TempDir::new()?;
        let named = touch(&dir, "s1.jpg")?;

        let renamer = Renamer::new(vec![named.clone()], "s", RenameConfig::immediate());
        let mut recorder = Recorder::default();
        renamer.run(&mut recorder)?;

        assert!(named.exists());
        assert_eq!(recorder.renamed, vec![named]);
        Ok(())
    }

    #[test]
    fn test_case_change_detection() {
        assert!(is_case_change(Path::new("/p/IMG1.png"), Path::new("/p/img1.png")));
        assert!(!is_case_change(Path::new("/p/img1.png"), Path::new("/p/img1.png")));
        assert!(!is_case_change(Path::new("/p/IMG1.png"), Path::new("/q/img1.png")));
        assert!(!is_case_change(Path::new("/p/a.png"), Path::new("/p/img1.png")));
    }

    #[test]
    fn test_same_file_identity() -> Result<()> {
        let dir = TempDir::new()?;
        let a = touch(&dir, "a.txt")?;
        let b = touch(&dir, "b.txt")?;

        assert!(same_file(&a, &a));
        assert!(!same_file(&a, &b));
        assert!(!same_file(&a, &dir.path().join("missing.txt")));
        Ok(())
    }

    #[test]
    fn test_case_only_rename() -> Result<()> {
        let dir = TempDir::new()?;
        let upper = touch(&dir, "IMG1.png")?;

        let renamer = Renamer::new(vec![upper], "img", RenameConfig::immediate());
        let mut recorder = Recorder::default();
        renamer.run(&mut recorder)?;

        let names: Vec<String> = fs::read_dir(dir.path())?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec!["img1.png"]);
        assert_eq!(recorder.finished, 1);
        Ok(())
    }

    #[test]
    fn test_case_variant_of_other_file_is_still_a_collision() -> Result<()> {
        let dir = TempDir::new()?;
        let upper = touch(&dir, "IMG1.png")?;
        let lower = dir.path().join("img1.png");

        // Only a case-sensitive filesystem can hold both names as separate files
        fs::write(&lower, "other")?;
        if same_file(&upper, &lower) {
            return Ok(());
        }

        let renamer = Renamer::new(vec![upper.clone()], "img", RenameConfig::immediate());
        let err = renamer.run(&mut Recorder::default()).unwrap_err();

        assert!(matches!(err, RenameError::DestinationExists { .. }));
        assert_eq!(fs::read_to_string(&lower)?, "other");
        assert!(upper.exists());
        Ok(())
    }

    #[test]
    fn test_run_missing_source() -> Result<()> {
        let dir = TempDir::new()?;
        let ghost = dir.path().join("ghost.gif");

        let renamer = Renamer::new(vec![ghost.clone()], "g", RenameConfig::immediate());
        let err = renamer.run(&mut Recorder::default()).unwrap_err();

        assert!(matches!(err, RenameError::SourceMissing { ref path } if *path == ghost));
        Ok(())
    }

    #[test]
    fn test_run_cancelled_before_start() -> Result<()> {
        let dir = TempDir::new()?;
        let a = touch(&dir, "a.py")?;

        let renamer = Renamer::new(vec![a.clone()], "m", RenameConfig::immediate());
        renamer.cancel_token().cancel();
        let mut recorder = Recorder::default();

        assert_eq!(
            renamer.run(&mut recorder)?,
            RunOutcome::Cancelled { completed: 0 }
        );
        assert!(a.exists());
        assert!(recorder.progress.is_empty());
        assert_eq!(recorder.finished, 0);
        Ok(())
    }

    #[test]
    fn test_plan_matches_run() -> Result<()> {
        let files = vec![PathBuf::from("/x/a.png"), PathBuf::from("/x/b.jpeg")];
        let renamer = Renamer::new(files, "v", RenameConfig::immediate());

        let plan = renamer.plan()?;
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].to, PathBuf::from("/x/v1.png"));
        assert_eq!(plan[1].index, 2);
        assert_eq!(plan[1].to, PathBuf::from("/x/v2.jpeg"));
        Ok(())
    }
}
