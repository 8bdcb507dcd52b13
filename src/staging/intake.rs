use crate::upload::StagedFile;
use glob::{MatchOptions, Pattern, PatternError};
use ignore::WalkBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Images, PDF and plain text.
pub const DEFAULT_ACCEPT: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.bmp", "*.svg", "*.ico", "*.tif",
    "*.tiff", "*.avif", "*.heic", "*.pdf", "*.txt",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Turns picked, dropped or walked files into [`StagedFile`]s, letting only
/// accepted kinds through.
#[derive(Debug, Clone)]
pub struct FileIntake {
    accept: Vec<Pattern>,
}

impl Default for FileIntake {
    fn default() -> Self {
        Self {
            accept: DEFAULT_ACCEPT
                .iter()
                .filter_map(|pattern| Pattern::new(pattern).ok())
                .collect(),
        }
    }
}

impl FileIntake {
    pub fn new<S: AsRef<str>>(accept: &[S]) -> Result<Self, PatternError> {
        let accept = accept
            .iter()
            .map(|pattern| Pattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { accept })
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        self.accept
            .iter()
            .any(|pattern| pattern.matches_with(file_name, MATCH_OPTIONS))
    }

    /// Extensions for the native picker filter, taken from `*.ext` patterns.
    pub fn extensions(&self) -> Vec<String> {
        self.accept
            .iter()
            .filter_map(|pattern| pattern.as_str().strip_prefix("*."))
            .filter(|ext| !ext.contains(['*', '?', '[']))
            .map(str::to_string)
            .collect()
    }

    /// Loads every accepted path, in the order given. Anything unreadable or
    /// of an unaccepted kind is logged and left out.
    pub fn load_paths<I, P>(&self, paths: I) -> Vec<StagedFile>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .filter_map(|path| self.load_path(path.as_ref()))
            .collect()
    }

    /// Loads accepted files below `dir`, skipping whatever `.gitignore` rules
    /// exclude. Entries are visited in file name order.
    pub fn load_folder(&self, dir: &Path) -> Vec<StagedFile> {
        let mut files = Vec::new();

        for entry in WalkBuilder::new(dir)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().map_or(false, |kind| kind.is_file());
                    if is_file {
                        if let Some(file) = self.load_path(entry.path()) {
                            files.push(file);
                        }
                    }
                }
                Err(e) => warn!(error = %e, dir = %dir.display(), "Error walking directory"),
            }
        }

        debug!(dir = %dir.display(), count = files.len(), "Loaded folder");
        files
    }

    /// Builds a staged file from bytes the window system already read.
    pub fn from_dropped(&self, name: &str, content: &[u8]) -> Option<StagedFile> {
        if !self.accepts(name) {
            warn!(name, "Skipping dropped file of unsupported type");
            return None;
        }

        Some(StagedFile::new(name, content.to_vec()))
    }

    fn load_path(&self, path: &Path) -> Option<StagedFile> {
        let name = path.file_name()?.to_string_lossy().into_owned();

        if !self.accepts(&name) {
            warn!(path = %path.display(), "Skipping unsupported file type");
            return None;
        }

        match fs::read(path) {
            Ok(content) => Some(StagedFile::new(name, content)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read file");
                None
            }
        }
    }
}
