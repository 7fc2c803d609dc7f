use cdgraph::core::{ComponentGraph, DependencyIndex, GraphBuilder};
use cdgraph::formatters::{GraphFormatter, GraphvizRenderer, ImageFormat};
use cdgraph::CdgError;
use std::fs;
use std::path::Path;
use std::process::Command;

fn small_graph() -> ComponentGraph {
    let mut index = DependencyIndex::new();
    index.add_file("a.py");
    index.insert_function("a.py:f".into(), vec!["g".into()]);
    index.insert_function("a.py:g".into(), Vec::new());
    GraphBuilder::from_index(&index)
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn dot_available() -> bool {
    Command::new("dot")
        .arg("-V")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[test]
fn missing_renderer_is_reported_and_leaves_nothing_behind() {
    let dir = tempfile::TempDir::new().unwrap();
    let out_dir = dir.path().join("output");
    let target = out_dir.join("graph.png");

    let renderer =
        GraphvizRenderer::new(ImageFormat::Png).with_binary("cdgraph-no-such-dot-binary");
    let err = renderer.format_to_file(&small_graph(), &target).unwrap_err();

    assert!(matches!(err, CdgError::RendererUnavailable(ref binary, _) if binary == "cdgraph-no-such-dot-binary"));
    assert_eq!(err.exit_code(), 5);
    assert!(!target.exists());
    assert!(dir_entries(&out_dir).is_empty());
}

#[cfg(unix)]
#[test]
fn failing_renderer_is_a_render_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("graph.svg");

    let renderer = GraphvizRenderer::new(ImageFormat::Svg).with_binary("false");
    let err = renderer.format_to_file(&small_graph(), &target).unwrap_err();

    assert!(matches!(err, CdgError::Render { ref path, .. } if path == &target));
    assert_eq!(err.exit_code(), 6);
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn extension_follows_image_format() {
    assert_eq!(GraphvizRenderer::new(ImageFormat::Png).extension(), "png");
    assert_eq!(GraphvizRenderer::new(ImageFormat::Svg).extension(), "svg");
    assert_eq!(GraphvizRenderer::new(ImageFormat::Pdf).extension(), "pdf");
}

#[test]
fn renders_png_when_graphviz_is_installed() {
    if !dot_available() {
        eprintln!("graphviz not installed; skipping");
        return;
    }
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("graph.png");

    GraphvizRenderer::new(ImageFormat::Png)
        .format_to_file(&small_graph(), &target)
        .unwrap();

    let bytes = fs::read(&target).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    assert_eq!(dir_entries(dir.path()), vec!["graph.png"]);
}
