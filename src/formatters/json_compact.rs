use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::core::{CodebaseAnalysis, CodeGraph};

/// Machine-readable dump of both graphs plus detected import cycles.
pub struct JsonCompactFormatter {
    pretty: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn format_to_file(&self, analysis: &CodebaseAnalysis, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = self.format_analysis(analysis)?;
        fs::write(output_path, content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    pub fn format_analysis(&self, analysis: &CodebaseAnalysis) -> Result<String> {
        let value = json!({
            "modules": graph_value(&analysis.module_graph),
            "calls": graph_value(&analysis.call_graph),
            "import_cycles": analysis.module_graph.cycles(),
            "skipped": analysis
                .skipped
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        });

        let content = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(content)
    }
}

fn graph_value(graph: &CodeGraph) -> Value {
    json!({
        "nodes": graph.nodes,
        "edges": graph.edges,
    })
}
