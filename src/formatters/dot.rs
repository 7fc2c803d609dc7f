//! Graphviz DOT output.

use petgraph::visit::EdgeRef;
use std::fs;
use std::path::Path;

use super::GraphFormatter;
use crate::core::{ComponentGraph, EdgeType, NodeType};
use crate::error::Result;

pub struct DotFormatter {
    rankdir: &'static str,
}

impl DotFormatter {
    pub fn new() -> Self {
        Self { rankdir: "LR" }
    }

    pub fn to_dot(&self, graph: &ComponentGraph) -> String {
        let mut lines = Vec::with_capacity(graph.node_count() + graph.edge_count() + 4);

        lines.push("digraph CDG {".to_string());
        lines.push(format!("    rankdir={};", self.rankdir));

        for idx in graph.node_indices() {
            let node = &graph[idx];
            lines.push(format!(
                "    \"{}\" [label=\"{}\", shape={}];",
                escape_label(&node.id),
                escape_label(&node.label),
                node_shape(node.node_type)
            ));
        }

        for edge in graph.edge_references() {
            let style = match edge.weight().edge_type {
                EdgeType::AmbiguousCall => " [style=dashed]",
                EdgeType::Contains | EdgeType::Call => "",
            };
            lines.push(format!(
                "    \"{}\" -> \"{}\"{};",
                escape_label(&graph[edge.source()].id),
                escape_label(&graph[edge.target()].id),
                style
            ));
        }

        lines.push("}".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl GraphFormatter for DotFormatter {
    fn extension(&self) -> &str {
        "dot"
    }

    fn format_to_file(&self, graph: &ComponentGraph, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, self.to_dot(graph))?;
        Ok(())
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn node_shape(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::File => "box",
        NodeType::Class => "ellipse",
        NodeType::Method => "diamond",
        NodeType::Function => "oval",
    }
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
