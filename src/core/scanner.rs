use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::config::AnalysisConfig;

#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Absolute path of the source file.
    pub path: PathBuf,
    pub extension: String,
}

pub struct FileScanner {
    config: AnalysisConfig,
}

impl FileScanner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Absolute form of the configured root, or `None` if it does not exist.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        match self.config.root.canonicalize() {
            Ok(root) => Some(root),
            Err(err) => {
                warn!(
                    "Cannot resolve analysis root {}: {}",
                    self.config.root.display(),
                    err
                );
                None
            }
        }
    }

    /// Recursively collect source files below the root, sorted by path.
    ///
    /// Excluded and hidden directories are pruned rather than filtered, so their
    /// subtrees are never read. Unreadable entries are skipped with a warning.
    pub fn scan_directory(&self) -> Vec<FileInfo> {
        let Some(root) = self.resolved_root() else {
            return Vec::new();
        };
        self.scan_resolved(&root)
    }

    pub(crate) fn scan_resolved(&self, root: &Path) -> Vec<FileInfo> {
        let mut files: Vec<FileInfo> = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || self.is_visible(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable path during discovery: {}", err);
                    None
                }
            })
            // Symlinked files are kept; `path().is_file()` follows the link.
            .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
            .filter_map(|entry| self.source_file(entry.path()))
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Discovered {} source files under {}", files.len(), root.display());
        files
    }

    fn is_visible(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if !self.config.include_hidden && name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && self.config.is_excluded_dir(&name))
    }

    fn source_file(&self, path: &Path) -> Option<FileInfo> {
        let extension = path.extension()?.to_str()?;
        self.config
            .extensions
            .iter()
            .any(|ext| ext == extension)
            .then(|| FileInfo {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            })
    }
}
