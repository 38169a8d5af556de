use std::collections::BTreeMap;
use std::fmt::Write;

use crate::core::CodeGraph;

/// Visual attributes of one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub name: String,
    pub rankdir: String,
    pub concentrate: bool,
    pub splines: String,
    pub nodesep: f32,
    pub ranksep: f32,
    pub node_shape: String,
    pub node_style: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub font_name: String,
    pub font_size: u32,
    pub edge_color: String,
    pub arrow_size: f32,
    /// Emit an explicit `label` attribute for every node.
    pub label_nodes: bool,
}

impl GraphStyle {
    pub fn modules() -> Self {
        Self {
            name: "modules".to_string(),
            rankdir: "LR".to_string(),
            concentrate: true,
            splines: "spline".to_string(),
            nodesep: 0.3,
            ranksep: 0.7,
            node_shape: "box".to_string(),
            node_style: "rounded,filled".to_string(),
            fill_color: "#f6f8fa".to_string(),
            stroke_color: "#d0d7de".to_string(),
            font_name: "Inter,Helvetica,Arial".to_string(),
            font_size: 10,
            edge_color: "#6e7781".to_string(),
            arrow_size: 0.6,
            label_nodes: false,
        }
    }

    pub fn calls() -> Self {
        Self {
            name: "calls".to_string(),
            nodesep: 0.2,
            node_shape: "ellipse".to_string(),
            node_style: "filled".to_string(),
            fill_color: "#eef2ff".to_string(),
            stroke_color: "#c7d2fe".to_string(),
            font_size: 9,
            edge_color: "#64748b".to_string(),
            arrow_size: 0.5,
            label_nodes: true,
            ..Self::modules()
        }
    }

    fn graph_attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("rankdir", self.rankdir.clone()),
            ("concentrate", self.concentrate.to_string()),
            ("splines", self.splines.clone()),
            ("nodesep", self.nodesep.to_string()),
            ("ranksep", self.ranksep.to_string()),
        ])
    }

    fn node_attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("shape", self.node_shape.clone()),
            ("style", self.node_style.clone()),
            ("fillcolor", self.fill_color.clone()),
            ("color", self.stroke_color.clone()),
            ("fontname", self.font_name.clone()),
            ("fontsize", self.font_size.to_string()),
        ])
    }

    fn edge_attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("color", self.edge_color.clone()),
            ("arrowsize", self.arrow_size.to_string()),
        ])
    }
}

/// Serialize `graph` as Graphviz DOT, nodes and edges in sorted order.
pub fn to_dot(graph: &CodeGraph, style: &GraphStyle) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "digraph {} {{", quote(&style.name));
    let _ = writeln!(output, "  graph [{}];", attribute_list(&style.graph_attributes()));
    let _ = writeln!(output, "  node [{}];", attribute_list(&style.node_attributes()));

    for node in &graph.nodes {
        if style.label_nodes {
            let _ = writeln!(output, "  {} [label={}];", quote(node), quote(node));
        } else {
            let _ = writeln!(output, "  {};", quote(node));
        }
    }

    let edge_attributes = attribute_list(&style.edge_attributes());
    for (source, target) in &graph.edges {
        let _ = writeln!(
            output,
            "  {} -> {} [{}];",
            quote(source),
            quote(target),
            edge_attributes
        );
    }

    output.push_str("}\n");
    output
}

fn attribute_list(attributes: &BTreeMap<&'static str, String>) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote(input: &str) -> String {
    let escaped = input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_is_a_valid_digraph() {
        let dot = to_dot(&CodeGraph::new(), &GraphStyle::modules());
        assert!(dot.starts_with("digraph \"modules\" {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(!dot.contains("->"));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn call_style_labels_nodes() {
        let mut graph = CodeGraph::new();
        graph.add_edge("a.foo", "b.helper");
        let dot = to_dot(&graph, &GraphStyle::calls());
        assert!(dot.contains("  \"a.foo\" [label=\"a.foo\"];"));
        assert!(dot.contains("\"a.foo\" -> \"b.helper\" [arrowsize=\"0.5\", color=\"#64748b\"];"));
        assert!(dot.contains("shape=\"ellipse\""));
    }
}
