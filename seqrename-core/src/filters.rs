/// A file-type group offered by the file picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    /// Name shown in the picker, e.g. "PNG Files"
    pub name: &'static str,
    /// Extension without the leading dot
    pub extension: &'static str,
}

/// Recognized groups, in the order the picker lists them
pub static FILTERS: [FileFilter; 6] = [
    FileFilter::new("PNG Files", "png"),
    FileFilter::new("JPEG Files", "jpeg"),
    FileFilter::new("JPG Files", "jpg"),
    FileFilter::new("GIF Files", "gif"),
    FileFilter::new("Text Files", "txt"),
    FileFilter::new("Python Files", "py"),
];

impl FileFilter {
    pub const fn new(name: &'static str, extension: &'static str) -> Self {
        Self { name, extension }
    }

    /// Glob pattern, used as the display-only extension label
    pub fn pattern(&self) -> String {
        format!("*.{}", self.extension)
    }

    pub fn by_name(name: &str) -> Option<&'static FileFilter> {
        FILTERS.iter().find(|f| f.name == name)
    }
}
