use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

use code_graph::core::{AnalysisConfig, CodebaseAnalyzer};
use code_graph::formatters::{
    DiagramFormat, GraphRenderer, GraphStyle, GraphvizBackend, JsonCompactFormatter,
};
use code_graph::{CALL_DIAGRAM_STEM, MODULE_DIAGRAM_STEM};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "code-graph",
    version,
    about = "Render module dependency and cross-module call graphs of a Python tree"
)]
struct Cli {
    /// Root of the source tree to analyze
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    root: PathBuf,

    /// Directory the diagrams are written to
    #[arg(short, long, value_name = "DIR", default_value = "diagrams")]
    output_dir: PathBuf,

    /// Diagram format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Extra directory names to exclude, on top of the built-in list
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Graphviz executable used for rendering
    #[arg(long, value_name = "PROGRAM", default_value = "dot")]
    dot_program: PathBuf,

    /// Also write both graphs as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Svg,
    Png,
    Pdf,
    Dot,
}

impl From<OutputFormat> for DiagramFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Svg => DiagramFormat::Svg,
            OutputFormat::Png => DiagramFormat::Png,
            OutputFormat::Pdf => DiagramFormat::Pdf,
            OutputFormat::Dot => DiagramFormat::Dot,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        root,
        output_dir,
        format,
        exclude,
        dot_program,
        json,
    } = cli;

    let start_time = Instant::now();
    let config = AnalysisConfig::new(&root).with_excluded(exclude);
    let analyzer = CodebaseAnalyzer::new(config)?;
    let analysis = analyzer.analyze();

    for cycle in analysis.module_graph.cycles() {
        warn!("Import cycle: {}", cycle.join(" <-> "));
    }

    let renderer =
        GraphRenderer::with_backend(GraphvizBackend::with_program(dot_program), format.into());
    let modules_path = renderer
        .render_to_dir(
            &analysis.module_graph,
            &GraphStyle::modules(),
            &output_dir,
            MODULE_DIAGRAM_STEM,
        )
        .context("Failed to render module graph")?;
    info!(
        "Wrote {} ({})",
        modules_path.display(),
        renderer.format().extension()
    );

    let calls_path = renderer
        .render_to_dir(
            &analysis.call_graph,
            &GraphStyle::calls(),
            &output_dir,
            CALL_DIAGRAM_STEM,
        )
        .context("Failed to render call graph")?;
    info!("Wrote {}", calls_path.display());

    if let Some(json_path) = json {
        JsonCompactFormatter::new().format_to_file(&analysis, &json_path)?;
        println!("JSON output: {}", json_path.display());
    }

    println!("Generated diagrams in: {}", output_dir.display());
    info!(
        "Total execution time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
