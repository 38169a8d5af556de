pub mod common;
pub mod python;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A function or method definition together with the names it calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    /// `<module>.<enclosing scopes>.<name>`; not unique across files.
    pub qualname: String,
    pub file_path: PathBuf,
    pub line_number: usize,
    /// Bare callee identifiers or final attribute tokens, unresolved.
    pub calls: BTreeSet<String>,
}

impl FunctionRecord {
    pub fn new(name: String, qualname: String, file_path: PathBuf, line_number: usize) -> Self {
        Self {
            name,
            qualname,
            file_path,
            line_number,
            calls: BTreeSet::new(),
        }
    }
}

/// Everything extracted from one successfully parsed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub module: String,
    pub path: PathBuf,
    /// Top-level package names of every import in the file.
    pub imports: BTreeSet<String>,
    pub functions: Vec<FunctionRecord>,
}

pub trait LanguageParser {
    /// Extract a [`ModuleInfo`] from `file_path`, or fail if it does not parse.
    fn parse_file(&self, file_path: &Path, module: &str) -> Result<ModuleInfo>;
    fn language_name(&self) -> &str;
}
