use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::index::{qualify_member, split_qualified, MEMBER_SEPARATOR};
use super::resolver::CallResolver;
use super::DependencyIndex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum NodeType {
    File,
    Class,
    Method,
    Function,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum EdgeType {
    /// Source declares target.
    Contains,
    /// Source may invoke target; the call resolved to this target alone.
    Call,
    /// Source may invoke target; the call name matched several candidates.
    AmbiguousCall,
}

impl NodeType {
    pub fn label_prefix(self) -> &'static str {
        match self {
            NodeType::File => "File",
            NodeType::Class => "Class",
            NodeType::Method => "Method",
            NodeType::Function => "Function",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Qualified name; unique within a graph.
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub edge_type: EdgeType,
    pub source_id: String,
    pub target_id: String,
}

pub type ComponentGraph = Graph<Node, Edge, Directed>;

impl Node {
    pub fn new(id: String, label: String, node_type: NodeType) -> Self {
        Self {
            id,
            label,
            node_type,
        }
    }

    pub fn file(file_id: &str) -> Self {
        Self::labelled(file_id.to_string(), file_id, NodeType::File)
    }

    pub fn class(class_key: &str) -> Self {
        Self::labelled(class_key.to_string(), class_key, NodeType::Class)
    }

    pub fn method(class_key: &str, method: &str) -> Self {
        Self::labelled(qualify_member(class_key, method), method, NodeType::Method)
    }

    pub fn function(function_key: &str) -> Self {
        Self::labelled(function_key.to_string(), function_key, NodeType::Function)
    }

    fn labelled(id: String, name: &str, node_type: NodeType) -> Self {
        let label = format!("{}: {}", node_type.label_prefix(), name);
        Self::new(id, label, node_type)
    }
}

impl Edge {
    pub fn new(edge_type: EdgeType, source_id: String, target_id: String) -> Self {
        Self {
            edge_type,
            source_id,
            target_id,
        }
    }

    pub fn contains(source_id: &str, target_id: &str) -> Self {
        Self::new(EdgeType::Contains, source_id.to_string(), target_id.to_string())
    }
}

/// Incremental graph construction with set semantics for nodes and edges.
pub struct GraphBuilder {
    graph: ComponentGraph,
    node_map: HashMap<String, NodeIndex>,
    edge_map: HashMap<(NodeIndex, NodeIndex, EdgeType), EdgeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
            edge_map: HashMap::new(),
        }
    }

    /// Assemble the component graph for a dependency index.
    ///
    /// The first pass emits file, class, method and function nodes with their
    /// containment edges; the second resolves every recorded call target and
    /// emits call edges. Unresolved targets produce nothing.
    pub fn from_index(index: &DependencyIndex) -> ComponentGraph {
        let mut builder = Self::new();
        builder.add_declarations(index);
        builder.add_calls(index, &CallResolver::new(index));
        builder.build()
    }

    /// Add a node unless one with the same id exists; returns the node's index.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.id) {
            return index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    /// Add an edge between existing nodes. Returns `None` when an endpoint is
    /// missing; an identical edge is only stored once.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        let source_idx = *self.node_map.get(&edge.source_id)?;
        let target_idx = *self.node_map.get(&edge.target_id)?;
        let key = (source_idx, target_idx, edge.edge_type);
        if let Some(&existing) = self.edge_map.get(&key) {
            return Some(existing);
        }
        let index = self.graph.add_edge(source_idx, target_idx, edge);
        self.edge_map.insert(key, index);
        Some(index)
    }

    pub fn build(self) -> ComponentGraph {
        self.graph
    }

    pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    fn add_declarations(&mut self, index: &DependencyIndex) {
        for file in &index.files {
            self.add_node(Node::file(file));
        }

        for (class_key, methods) in &index.classes {
            self.add_node(Node::class(class_key));
            if let Some((file, _)) = split_qualified(class_key) {
                self.add_edge(Edge::contains(file, class_key));
            }

            for method in methods {
                let method_node = Node::method(class_key, method);
                let method_id = method_node.id.clone();
                self.add_node(method_node);
                self.add_edge(Edge::contains(class_key, &method_id));
            }
        }

        for function_key in index.functions.keys() {
            // A method's function entry shares the method node's id
            if self.node_map.contains_key(function_key) {
                continue;
            }
            let Some((file, name)) = split_qualified(function_key) else {
                self.add_node(Node::function(function_key));
                continue;
            };
            // Member ids with no declaring class entry are not free functions
            if name.contains(MEMBER_SEPARATOR) {
                tracing::debug!("{function_key}: no class declares this method; skipped");
                continue;
            }
            self.add_node(Node::function(function_key));
            self.add_edge(Edge::contains(file, function_key));
        }
    }

    fn add_calls(&mut self, index: &DependencyIndex, resolver: &CallResolver) {
        for (caller, targets) in &index.functions {
            for target in targets {
                let Some(resolution) = resolver.resolve(caller, target) else {
                    tracing::debug!("{caller}: unresolved call '{target}'");
                    continue;
                };
                let edge_type = if resolution.is_ambiguous() {
                    EdgeType::AmbiguousCall
                } else {
                    EdgeType::Call
                };
                for callee in resolution.targets {
                    self.add_edge(Edge::new(edge_type, caller.clone(), callee));
                }
            }
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Content of a graph as `(id, type)` nodes and `(source, target, type)` edges,
/// independent of insertion order.
pub fn graph_signature(
    graph: &ComponentGraph,
) -> (
    BTreeSet<(String, NodeType)>,
    BTreeSet<(String, String, EdgeType)>,
) {
    let nodes = graph
        .node_indices()
        .map(|idx| (graph[idx].id.clone(), graph[idx].node_type))
        .collect();
    let edges = graph
        .edge_references()
        .map(|edge| {
            (
                graph[edge.source()].id.clone(),
                graph[edge.target()].id.clone(),
                edge.weight().edge_type,
            )
        })
        .collect();
    (nodes, edges)
}
