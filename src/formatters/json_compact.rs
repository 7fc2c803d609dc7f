use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::GraphFormatter;
use crate::core::{ComponentGraph, EdgeType, NodeType};
use crate::error::Result;

/// JSON formatter with positional node references
pub struct JsonCompactFormatter {
    /// Ids and type codes only, no labels
    minimal: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { minimal: true }
    }

    pub fn with_labels(mut self) -> Self {
        self.minimal = false;
        self
    }

    pub fn format_graph(&self, graph: &ComponentGraph) -> Result<String> {
        let mut nodes = Vec::with_capacity(graph.node_count());
        let mut position: HashMap<NodeIndex, usize> = HashMap::with_capacity(graph.node_count());

        for (pos, idx) in graph.node_indices().enumerate() {
            let node = &graph[idx];
            position.insert(idx, pos);

            let node_json = if self.minimal {
                json!({
                    "n": node.id,
                    "t": self.type_code(node.node_type)
                })
            } else {
                json!({
                    "id": node.id,
                    "label": node.label,
                    "type": self.type_code(node.node_type)
                })
            };
            nodes.push(node_json);
        }

        let edges: Vec<_> = graph
            .edge_references()
            .filter_map(|edge_ref| {
                let src = position.get(&edge_ref.source())?;
                let tgt = position.get(&edge_ref.target())?;
                Some(json!([src, tgt, self.edge_code(edge_ref.weight().edge_type)]))
            })
            .collect();

        let output = json!({
            "meta": {
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "format": if self.minimal { "compact" } else { "full" }
            },
            "nodes": nodes,
            "edges": edges
        });

        Ok(serde_json::to_string(&output)?)
    }

    fn type_code(&self, node_type: NodeType) -> u8 {
        match node_type {
            NodeType::File => 0,
            NodeType::Class => 1,
            NodeType::Method => 2,
            NodeType::Function => 3,
        }
    }

    fn edge_code(&self, edge_type: EdgeType) -> u8 {
        match edge_type {
            EdgeType::Contains => 0,
            EdgeType::Call => 1,
            EdgeType::AmbiguousCall => 2,
        }
    }
}

impl GraphFormatter for JsonCompactFormatter {
    fn extension(&self) -> &str {
        "json"
    }

    fn format_to_file(&self, graph: &ComponentGraph, output_path: &Path) -> Result<()> {
        let json_content = self.format_graph(graph)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, json_content)?;
        Ok(())
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}
