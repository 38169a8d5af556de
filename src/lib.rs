//! # code-graph
//!
//! Module dependency and cross-module call graph extraction for Python codebases.
//!
//! A run walks a source tree, parses every `.py` file with tree-sitter, and
//! derives two directed graphs:
//!
//! - **Module graph**: `a -> b` when module `a` imports the top-level module `b`.
//! - **Call graph**: `a.foo -> b.helper` when `foo` calls something named
//!   `helper` and the two live in different top-level modules. Resolution is by
//!   name only, so it both over- and under-connects.
//!
//! Both graphs are rendered through Graphviz.
pub mod core;
pub mod formatters;
pub mod parsers;

/// File names (without extension) of the two diagrams.
pub const MODULE_DIAGRAM_STEM: &str = "code_graph_modules";
pub const CALL_DIAGRAM_STEM: &str = "code_graph_calls";
