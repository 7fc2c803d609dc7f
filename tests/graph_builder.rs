use cdgraph::core::graph::{graph_signature, Edge, EdgeType, GraphBuilder, Node, NodeType};
use cdgraph::core::{ComponentGraph, DependencyIndex};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn edge(source: &str, target: &str, edge_type: EdgeType) -> (String, String, EdgeType) {
    (source.to_string(), target.to_string(), edge_type)
}

fn edge_set(graph: &ComponentGraph) -> Vec<(String, String, EdgeType)> {
    graph_signature(graph).1.into_iter().collect()
}

fn has_edge(graph: &ComponentGraph, source: &str, target: &str, edge_type: EdgeType) -> bool {
    graph_signature(graph).1.contains(&edge(source, target, edge_type))
}

#[test]
fn graph_builder_adds_nodes_and_edges() {
    let mut gb = GraphBuilder::new();

    let file = Node::file("m.py");
    let func = Node::function("m.py:f");
    let class = Node::class("m.py:C");

    gb.add_node(file.clone());
    gb.add_node(func.clone());
    gb.add_node(class.clone());

    assert!(gb.add_edge(Edge::contains(&file.id, &func.id)).is_some());
    assert!(gb
        .add_edge(Edge::new(EdgeType::Call, func.id.clone(), class.id.clone()))
        .is_some());

    let graph = gb.build();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn add_edge_returns_none_when_missing_nodes() {
    let mut gb = GraphBuilder::new();
    let n1 = Node::function("a.py:a");
    gb.add_node(n1.clone());

    let e = Edge::new(EdgeType::Call, n1.id.clone(), "missing".to_string());
    assert!(gb.add_edge(e).is_none());
}

#[test]
fn nodes_and_edges_have_set_semantics() {
    let mut gb = GraphBuilder::new();
    let first = gb.add_node(Node::file("a.py"));
    let again = gb.add_node(Node::file("a.py"));
    assert_eq!(first, again);

    gb.add_node(Node::function("a.py:f"));
    let e1 = gb.add_edge(Edge::contains("a.py", "a.py:f"));
    let e2 = gb.add_edge(Edge::contains("a.py", "a.py:f"));
    assert_eq!(e1, e2);
    // same endpoints, different kind
    assert!(gb
        .add_edge(Edge::new(EdgeType::Call, "a.py".into(), "a.py:f".into()))
        .is_some());

    assert_eq!(gb.get_node_index("a.py"), Some(first));
    let graph = gb.build();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn node_labels_follow_kind() {
    assert_eq!(Node::file("a.py").label, "File: a.py");
    assert_eq!(Node::class("a.py:C").label, "Class: a.py:C");
    let method = Node::method("a.py:C", "run");
    assert_eq!(method.id, "a.py:C.run");
    assert_eq!(method.label, "Method: run");
    assert_eq!(method.node_type, NodeType::Method);
    assert_eq!(Node::function("a.py:f").label, "Function: a.py:f");
}

#[test]
fn empty_index_gives_empty_graph() {
    let graph = GraphBuilder::from_index(&DependencyIndex::new());
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn class_methods_are_contained_in_declaration_order() {
    let mut index = DependencyIndex::new();
    index.add_file("file.py");
    index.insert_class("file.py:C".into(), strings(&["m1", "m2"]));
    index.insert_function("file.py:C.m1".into(), Vec::new());
    index.insert_function("file.py:C.m2".into(), strings(&["m1"]));

    let graph = GraphBuilder::from_index(&index);

    let ids: Vec<_> = graph.node_indices().map(|i| graph[i].id.as_str()).collect();
    assert_eq!(ids, vec!["file.py", "file.py:C", "file.py:C.m1", "file.py:C.m2"]);

    assert_eq!(
        edge_set(&graph),
        vec![
            edge("file.py", "file.py:C", EdgeType::Contains),
            edge("file.py:C", "file.py:C.m1", EdgeType::Contains),
            edge("file.py:C", "file.py:C.m2", EdgeType::Contains),
            edge("file.py:C.m2", "file.py:C.m1", EdgeType::Call),
        ]
    );
}

#[test]
fn calls_resolve_to_functions_classes_and_methods() {
    let mut index = DependencyIndex::new();
    index.add_file("file.py");
    index.insert_class("file.py:D".into(), strings(&["h"]));
    index.insert_function("file.py:D.h".into(), Vec::new());
    index.insert_function("file.py:g".into(), Vec::new());
    index.insert_function(
        "file.py:f".into(),
        strings(&["g", "h", "D", "unknown_lib_call", "g"]),
    );

    let graph = GraphBuilder::from_index(&index);

    assert!(has_edge(&graph, "file.py:f", "file.py:g", EdgeType::Call));
    assert!(has_edge(&graph, "file.py:f", "file.py:D.h", EdgeType::Call));
    assert!(has_edge(&graph, "file.py:f", "file.py:D", EdgeType::Call));
    // repeated call target is one edge
    let calls_from_f = edge_set(&graph)
        .into_iter()
        .filter(|(s, _, kind)| s == "file.py:f" && *kind != EdgeType::Contains)
        .count();
    assert_eq!(calls_from_f, 3);
}

#[test]
fn shared_method_names_link_every_candidate() {
    let mut index = DependencyIndex::new();
    index.add_file("a.py");
    index.add_file("b.py");
    index.add_file("main.py");
    index.insert_class("a.py:ClassA".into(), strings(&["run"]));
    index.insert_class("b.py:ClassB".into(), strings(&["run"]));
    index.insert_function("main.py:start".into(), strings(&["run"]));

    let graph = GraphBuilder::from_index(&index);

    assert!(has_edge(&graph, "main.py:start", "a.py:ClassA.run", EdgeType::AmbiguousCall));
    assert!(has_edge(&graph, "main.py:start", "b.py:ClassB.run", EdgeType::AmbiguousCall));
}

#[test]
fn local_function_shadows_same_name_elsewhere() {
    let mut index = DependencyIndex::new();
    index.add_file("a.py");
    index.add_file("b.py");
    index.add_file("c.py");
    index.insert_function("a.py:g".into(), Vec::new());
    index.insert_function("b.py:g".into(), Vec::new());
    index.insert_function("a.py:f".into(), strings(&["g"]));
    index.insert_function("c.py:h".into(), strings(&["g"]));

    let graph = GraphBuilder::from_index(&index);

    assert!(has_edge(&graph, "a.py:f", "a.py:g", EdgeType::Call));
    assert!(!has_edge(&graph, "a.py:f", "b.py:g", EdgeType::Call));
    assert!(!has_edge(&graph, "a.py:f", "b.py:g", EdgeType::AmbiguousCall));

    assert!(has_edge(&graph, "c.py:h", "a.py:g", EdgeType::AmbiguousCall));
    assert!(has_edge(&graph, "c.py:h", "b.py:g", EdgeType::AmbiguousCall));
}

#[test]
fn redefined_class_leaves_no_stale_method_nodes() {
    let mut parser = cdgraph::parsers::python::PythonParser::new().unwrap();
    let code = "class C:\n    def old(self):\n        pass\n\nclass C:\n    def new(self):\n        pass\n";
    let parsed = parser
        .parse_source(code, std::path::Path::new("x.py"), "x.py")
        .unwrap();

    let graph = GraphBuilder::from_index(&parsed.index);
    let (nodes, edges) = graph_signature(&graph);

    assert!(!nodes.iter().any(|(id, _)| id == "x.py:C.old"));
    assert!(nodes.contains(&("x.py:C.new".to_string(), NodeType::Method)));
    assert!(edges.contains(&edge("x.py:C", "x.py:C.new", EdgeType::Contains)));
}

#[test]
fn method_entries_without_a_class_are_not_functions() {
    let mut index = DependencyIndex::new();
    index.add_file("x.py");
    index.insert_function("x.py:Gone.old".into(), strings(&["g"]));
    index.insert_function("x.py:g".into(), Vec::new());

    let graph = GraphBuilder::from_index(&index);
    let (nodes, _) = graph_signature(&graph);

    assert!(!nodes.iter().any(|(id, _)| id == "x.py:Gone.old"));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}
