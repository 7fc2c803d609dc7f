use cdgraph::core::{DependencyIndex, GraphBuilder};
use cdgraph::formatters::{GraphFormatter, JsonCompactFormatter};
use serde_json::{json, Value};

#[test]
fn json_compact_snapshot_small_graph() {
    let mut index = DependencyIndex::new();
    index.add_file("a.py");
    index.insert_function("a.py:f".into(), vec!["g".into()]);
    index.insert_function("a.py:g".into(), Vec::new());
    let graph = GraphBuilder::from_index(&index);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    JsonCompactFormatter::new()
        .format_to_file(&graph, &path)
        .unwrap();
    let s = std::fs::read_to_string(&path).unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();

    // node positions follow emission order: file, then functions
    let expected = json!({
        "meta": {"nodes": 3, "edges": 3, "format": "compact"},
        "nodes": [
            {"n":"a.py","t":0},
            {"n":"a.py:f","t":3},
            {"n":"a.py:g","t":3}
        ],
        "edges": [[0,1,0],[0,2,0],[1,2,1]]
    });
    assert_eq!(v, expected);
}
