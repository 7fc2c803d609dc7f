use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::error::{CdgError, Result};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| CdgError::Parser(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source`, rejecting trees that contain syntax errors.
    pub fn parse_source(&mut self, source: &str, file_path: &Path) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CdgError::Parser(format!("no tree for {}", file_path.display())))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error(&root)
                .map(|node| {
                    let pos = node.start_position();
                    (pos.row + 1, pos.column + 1)
                })
                .unwrap_or((1, 1));
            return Err(CdgError::Syntax {
                path: file_path.to_path_buf(),
                line,
                column,
            });
        }

        Ok(tree)
    }
}

/// Read a source file in full. The handle is closed before returning,
/// whether or not reading succeeded.
pub fn read_source(file_path: &Path) -> Result<String> {
    let read = || -> std::io::Result<String> {
        let file = File::open(file_path)?;
        let file_size = file.metadata()?.len() as usize;
        let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
        let mut content = String::with_capacity(file_size);
        reader.read_to_string(&mut content)?;
        Ok(content)
    };

    read().map_err(|source| CdgError::Read {
        path: file_path.to_path_buf(),
        source,
    })
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// First `ERROR` or `MISSING` node in document order.
pub fn first_error<'a>(node: &TSNode<'a>) -> Option<TSNode<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let children: Vec<TSNode<'a>> = node.children(&mut cursor).collect();
    children
        .iter()
        .filter(|child| child.has_error())
        .find_map(|child| first_error(child))
}

pub fn find_children_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Vec<TSNode<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}
