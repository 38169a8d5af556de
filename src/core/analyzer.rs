use log::{info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::config::AnalysisConfig;
use super::graph::{CallGraphBuilder, CodeGraph, ModuleGraphBuilder};
use super::module_name::module_name_from_path;
use super::scanner::{FileInfo, FileScanner};
use crate::parsers::{python::PythonParser, LanguageParser, ModuleInfo};

/// Result of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct CodebaseAnalysis {
    pub root: Option<PathBuf>,
    /// Parsed modules keyed by module identifier.
    pub modules: BTreeMap<String, ModuleInfo>,
    pub module_graph: CodeGraph,
    pub call_graph: CodeGraph,
    /// Files that were discovered but could not be parsed.
    pub skipped: Vec<PathBuf>,
}

pub struct CodebaseAnalyzer {
    file_scanner: FileScanner,
    parser: PythonParser,
}

impl CodebaseAnalyzer {
    pub fn new(config: AnalysisConfig) -> anyhow::Result<Self> {
        Ok(Self {
            file_scanner: FileScanner::new(config),
            parser: PythonParser::new()?,
        })
    }

    pub fn analyze(&self) -> CodebaseAnalysis {
        let Some(root) = self.file_scanner.resolved_root() else {
            return CodebaseAnalysis::default();
        };

        info!("Scanning {}", root.display());
        let files = self.file_scanner.scan_resolved(&root);
        info!(
            "Found {} {} files to analyze",
            files.len(),
            self.parser.language_name()
        );

        // Fan out per file; each result is independent of every other file.
        let results: Vec<(PathBuf, Option<ModuleInfo>)> = files
            .par_iter()
            .map(|file| (file.path.clone(), self.analyze_file(&root, file)))
            .collect();

        let mut modules: BTreeMap<String, ModuleInfo> = BTreeMap::new();
        let mut skipped = Vec::new();
        for (path, result) in results {
            match result {
                Some(module) => {
                    if let Some(previous) = modules.insert(module.module.clone(), module) {
                        warn!(
                            "Module name '{}' is shared by {} and {}; keeping the latter",
                            previous.module,
                            previous.path.display(),
                            path.display()
                        );
                    }
                }
                None => skipped.push(path),
            }
        }
        info!(
            "Parsed {} modules, skipped {} files",
            modules.len(),
            skipped.len()
        );

        info!("Building module graph...");
        let module_graph = ModuleGraphBuilder::new().build(modules.values());
        info!("Resolving cross-module calls...");
        let call_graph = CallGraphBuilder::new().build(modules.values());
        info!(
            "Module graph: {} nodes, {} edges; call graph: {} nodes, {} edges",
            module_graph.node_count(),
            module_graph.edge_count(),
            call_graph.node_count(),
            call_graph.edge_count()
        );

        CodebaseAnalysis {
            root: Some(root),
            modules,
            module_graph,
            call_graph,
            skipped,
        }
    }

    fn analyze_file(&self, root: &Path, file: &FileInfo) -> Option<ModuleInfo> {
        let module = module_name_from_path(root, &file.path)?;
        match self.parser.parse_file(&file.path, &module) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!("Skipping {}: {:#}", file.path.display(), err);
                None
            }
        }
    }
}
