pub mod analyzer;
pub mod config;
pub mod graph;
pub mod module_name;
pub mod resolver;
pub mod scanner;

pub use analyzer::{CodebaseAnalysis, CodebaseAnalyzer};
pub use config::AnalysisConfig;
pub use graph::{CallGraphBuilder, CodeGraph, ModuleGraphBuilder};
pub use module_name::module_name_from_path;
pub use resolver::FunctionResolver;
pub use scanner::FileScanner;
