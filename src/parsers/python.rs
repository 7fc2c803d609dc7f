use std::collections::HashSet;
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{extract_text, find_children_by_kind, read_source, TreeSitterParser};
use super::{LanguageParser, ParseResult};
use crate::core::index::{qualify, qualify_member};
use crate::error::Result;

pub struct PythonParser {
    parser: TreeSitterParser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let parser = TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self { parser })
    }

    /// Extract declarations and call targets from already loaded source text.
    pub fn parse_source(
        &mut self,
        source: &str,
        file_path: &Path,
        file_id: &str,
    ) -> Result<ParseResult> {
        let tree = self.parser.parse_source(source, file_path)?;

        let mut walker = DeclarationWalker {
            source: source.as_bytes(),
            file_id,
            result: ParseResult::default(),
        };
        walker.result.index.add_file(file_id);
        walker.visit(&tree.root_node());

        Ok(walker.result)
    }
}

impl LanguageParser for PythonParser {
    fn parse_file(&mut self, file_path: &Path, file_id: &str) -> Result<ParseResult> {
        let source = read_source(file_path)?;
        self.parse_source(&source, file_path, file_id)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

/// Single pre-order pass over one file's syntax tree.
struct DeclarationWalker<'s> {
    source: &'s [u8],
    file_id: &'s str,
    result: ParseResult,
}

impl<'s> DeclarationWalker<'s> {
    fn visit(&mut self, node: &TSNode) {
        match node.kind() {
            "function_definition" => {
                self.record_function(node, None, false);
                self.visit_children(node);
            }
            "class_definition" => self.record_class(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child);
        }
    }

    fn record_class(&mut self, class_node: &TSNode) {
        let Some(class_name) = self.name_of(class_node) else {
            self.visit_children(class_node);
            return;
        };
        let class_key = qualify(self.file_id, class_name);

        let Some(body) = class_node.child_by_field_name("body") else {
            self.add_class(class_key, Vec::new());
            return;
        };

        let mut cursor = body.walk();
        let members: Vec<TSNode> = body.children(&mut cursor).collect();

        let mut methods: Vec<String> = Vec::new();
        for name in members
            .iter()
            .filter_map(method_definition)
            .filter_map(|def| self.name_of(&def))
        {
            if !methods.iter().any(|method| method == name) {
                methods.push(name.to_string());
            }
        }
        self.add_class(class_key.clone(), methods);

        let mut seen = HashSet::new();
        for member in &members {
            match method_definition(member) {
                Some(def) => {
                    let repeated = self.name_of(&def).is_some_and(|name| !seen.insert(name));
                    // Property setters and overloads extend the first definition
                    let accessor = repeated && member.kind() == "decorated_definition";
                    self.record_function(&def, Some(&class_key), accessor);
                    self.visit_children(&def);
                }
                None => self.visit(member),
            }
        }
    }

    /// Free functions are keyed `file:name`, methods `file:Class.name`.
    ///
    /// With `extend_existing`, calls are appended to an entry already
    /// recorded under the same key instead of replacing it.
    fn record_function(
        &mut self,
        func_node: &TSNode,
        class_key: Option<&str>,
        extend_existing: bool,
    ) {
        let Some(func_name) = self.name_of(func_node) else {
            return;
        };
        let key = match class_key {
            Some(class_key) => qualify_member(class_key, func_name),
            None => qualify(self.file_id, func_name),
        };

        let mut calls = Vec::new();
        if let Some(parent) = func_node.parent() {
            if parent.kind() == "decorated_definition" {
                for decorator in find_children_by_kind(&parent, "decorator") {
                    self.collect_calls(&decorator, &mut calls);
                }
            }
        }
        self.collect_calls(func_node, &mut calls);

        if extend_existing {
            if let Some(existing) = self.result.index.functions.get_mut(&key) {
                existing.extend(calls);
                return;
            }
        }
        if self.result.index.insert_function(key.clone(), calls).is_some() {
            self.result.redefinitions.push(key);
        }
    }

    /// A redefined class replaces the earlier body, including the method
    /// entries it declared.
    fn add_class(&mut self, key: String, methods: Vec<String>) {
        if let Some(previous) = self.result.index.insert_class(key.clone(), methods) {
            for method in &previous {
                self.result
                    .index
                    .functions
                    .shift_remove(&qualify_member(&key, method));
            }
            self.result.redefinitions.push(key);
        }
    }

    /// Every call below `node`, in source order. Only the trailing name of
    /// an attribute callee is kept; other callee shapes are ignored.
    fn collect_calls(&self, node: &TSNode, calls: &mut Vec<String>) {
        if node.kind() == "call" {
            if let Some(callee) = node.child_by_field_name("function") {
                let target = match callee.kind() {
                    "identifier" => Some(callee),
                    "attribute" => callee.child_by_field_name("attribute"),
                    _ => None,
                };
                if let Some(target) = target {
                    let name = extract_text(&target, self.source);
                    if !name.is_empty() {
                        calls.push(name.to_string());
                    }
                }
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(&child, calls);
        }
    }

    fn name_of(&self, node: &TSNode) -> Option<&'s str> {
        node.child_by_field_name("name")
            .map(|name| extract_text(&name, self.source))
            .filter(|name| !name.is_empty())
    }
}

/// The `def` a class-body statement declares directly, if any.
fn method_definition<'t>(member: &TSNode<'t>) -> Option<TSNode<'t>> {
    match member.kind() {
        "function_definition" => Some(*member),
        "decorated_definition" => member
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "function_definition"),
        _ => None,
    }
}
