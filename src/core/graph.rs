use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::resolver::FunctionResolver;
use crate::parsers::ModuleInfo;

/// Directed graph with set semantics on both nodes and edges.
///
/// Sets are ordered, so iteration (and therefore rendering) is deterministic
/// regardless of the order in which files were analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeGraph {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<(String, String)>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node<S: Into<String>>(&mut self, id: S) -> bool {
        self.nodes.insert(id.into())
    }

    /// Insert `source -> target`, adding both endpoints. Self-loops are refused.
    pub fn add_edge<S: Into<String>, T: Into<String>>(&mut self, source: S, target: T) -> bool {
        let (source, target) = (source.into(), target.into());
        if source == target {
            return false;
        }
        self.nodes.insert(source.clone());
        self.nodes.insert(target.clone());
        self.edges.insert((source, target))
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .contains(&(source.to_string(), target.to_string()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_petgraph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            index.insert(node.as_str(), graph.add_node(node.clone()));
        }
        for (source, target) in &self.edges {
            if let (Some(&a), Some(&b)) = (index.get(source.as_str()), index.get(target.as_str())) {
                graph.add_edge(a, b, ());
            }
        }
        graph
    }

    /// Strongly connected components with more than one member, each sorted,
    /// in sorted order.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let graph = self.to_petgraph();
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> =
                    component.into_iter().map(|idx| graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}

/// Builds the module dependency graph from per-file import sets.
#[derive(Debug, Default)]
pub struct ModuleGraphBuilder {
    graph: CodeGraph,
}

impl ModuleGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every module becomes a node; `m -> m2` is added for each import of `m`
    /// naming another discovered module.
    pub fn build<'a, I>(mut self, modules: I) -> CodeGraph
    where
        I: IntoIterator<Item = &'a ModuleInfo>,
        I::IntoIter: Clone,
    {
        let modules = modules.into_iter();
        for info in modules.clone() {
            self.graph.add_node(info.module.clone());
        }
        for info in modules {
            for import in &info.imports {
                if import != &info.module && self.graph.nodes.contains(import) {
                    self.graph.add_edge(info.module.clone(), import.clone());
                }
            }
        }
        self.graph
    }
}

/// Builds the cross-module call graph by name matching.
#[derive(Debug, Default)]
pub struct CallGraphBuilder {
    resolver: FunctionResolver,
    graph: CodeGraph,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only functions that take part in a cross-module call become nodes.
    pub fn build<'a, I>(mut self, modules: I) -> CodeGraph
    where
        I: IntoIterator<Item = &'a ModuleInfo>,
        I::IntoIter: Clone,
    {
        let modules = modules.into_iter();
        self.resolver.build_indexes(modules.clone());
        for info in modules {
            for call in self.resolver.resolve_calls(info) {
                self.graph.add_edge(call.caller, call.callee);
            }
        }
        self.graph
    }
}
