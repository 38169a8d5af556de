use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{Builder, TempPath};
use thiserror::Error;

use super::dot::{to_dot, GraphStyle};
use crate::core::CodeGraph;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Backend {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to move rendered diagram into place: {0}")]
    Persist(#[from] tempfile::PathPersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    Svg,
    Png,
    Pdf,
    /// The DOT source itself; no backend is involved.
    Dot,
}

impl DiagramFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DiagramFormat::Svg => "svg",
            DiagramFormat::Png => "png",
            DiagramFormat::Pdf => "pdf",
            DiagramFormat::Dot => "dot",
        }
    }
}

/// External program that turns a DOT file into a diagram.
pub trait DiagramBackend {
    fn render(&self, source: &Path, format: DiagramFormat, output: &Path) -> Result<()>;
}

/// Runs Graphviz (`dot -T<format> -o <output> <source>`).
#[derive(Debug, Clone)]
pub struct GraphvizBackend {
    program: PathBuf,
}

impl GraphvizBackend {
    pub fn new() -> Self {
        Self::with_program("dot")
    }

    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DiagramBackend for GraphvizBackend {
    fn render(&self, source: &Path, format: DiagramFormat, output: &Path) -> Result<()> {
        let program = self.program.display().to_string();
        let result = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .arg(source)
            .output()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(RenderError::Backend {
                program,
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Writes one diagram per call, never leaving a partial file behind.
///
/// The DOT source and the backend output both go to temporary files next to
/// the destination; the output is renamed into place only after the backend
/// succeeded, and every temporary is removed when it goes out of scope.
pub struct GraphRenderer<B: DiagramBackend = GraphvizBackend> {
    backend: B,
    format: DiagramFormat,
}

impl GraphRenderer<GraphvizBackend> {
    pub fn new(format: DiagramFormat) -> Self {
        Self::with_backend(GraphvizBackend::new(), format)
    }
}

impl<B: DiagramBackend> GraphRenderer<B> {
    pub fn with_backend(backend: B, format: DiagramFormat) -> Self {
        Self { backend, format }
    }

    pub fn format(&self) -> DiagramFormat {
        self.format
    }

    /// Render `graph` to `<output_dir>/<stem>.<ext>` and return that path.
    pub fn render_to_dir(
        &self,
        graph: &CodeGraph,
        style: &GraphStyle,
        output_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf> {
        let output = output_dir.join(format!("{}.{}", stem, self.format.extension()));
        self.render(graph, style, &output)?;
        Ok(output)
    }

    pub fn render(&self, graph: &CodeGraph, style: &GraphStyle, output: &Path) -> Result<()> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let source = write_temp(dir, "dot", &to_dot(graph, style))?;
        if self.format == DiagramFormat::Dot {
            source.persist(output)?;
            return Ok(());
        }

        let rendered = Builder::new()
            .prefix(".code_graph")
            .suffix(&format!(".{}", self.format.extension()))
            .tempfile_in(dir)?
            .into_temp_path();

        debug!(
            "Rendering {} ({} nodes, {} edges) to {}",
            style.name,
            graph.node_count(),
            graph.edge_count(),
            output.display()
        );
        self.backend.render(&source, self.format, &rendered)?;
        rendered.persist(output)?;
        Ok(())
    }
}

fn write_temp(dir: &Path, extension: &str, contents: &str) -> Result<TempPath> {
    let mut file = Builder::new()
        .prefix(".code_graph")
        .suffix(&format!(".{}", extension))
        .tempfile_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}
