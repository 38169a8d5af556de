use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directory names that never contain first-party sources.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".venv",
    "venv",
    "site-packages",
    "build",
    "dist",
    "__pycache__",
    ".mypy_cache",
    ".ruff_cache",
    ".pytest_cache",
    "node_modules",
];

pub const PYTHON_EXTENSIONS: &[&str] = &["py"];

/// Name of the file that turns a directory into a package.
pub const PACKAGE_INITIALIZER: &str = "__init__.py";

/// Settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub root: PathBuf,
    pub exclude_dirs: BTreeSet<String>,
    pub extensions: Vec<String>,
    /// Hidden entries are skipped unless this is set, matching `**/*.py` globbing.
    pub include_hidden: bool,
}

impl AnalysisConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            extensions: PYTHON_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if !name.is_empty() {
                self.exclude_dirs.insert(name.to_string());
            }
        }
        self
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }
}
