use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::config::MergePolicy;
use crate::error::{CdgError, Result};

/// Separator between a file identifier and the declaration name.
pub const FILE_SEPARATOR: char = ':';
/// Separator between a class key and one of its methods.
pub const MEMBER_SEPARATOR: char = '.';

/// Summary of every declaration and raw call reference found in a source
/// tree. All three mappings keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyIndex {
    pub files: IndexSet<String>,
    /// `file:Class` → method names declared directly in the class body.
    pub classes: IndexMap<String, Vec<String>>,
    /// Qualified function name → unresolved call targets, in source order.
    pub functions: IndexMap<String, Vec<String>>,
}

/// `file:name`
pub fn qualify(file: &str, name: &str) -> String {
    format!("{file}{FILE_SEPARATOR}{name}")
}

/// `file:Class.method`
pub fn qualify_member(class_key: &str, member: &str) -> String {
    format!("{class_key}{MEMBER_SEPARATOR}{member}")
}

/// Split a qualified name into its file identifier and declaration name.
///
/// Declaration names never contain the separator, so the last occurrence is
/// the boundary even when a file path does.
pub fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    qualified.rsplit_once(FILE_SEPARATOR)
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.classes.is_empty() && self.functions.is_empty()
    }

    pub fn add_file(&mut self, file: impl Into<String>) {
        self.files.insert(file.into());
    }

    /// Record a class; an existing entry under the same key is replaced.
    pub fn insert_class(&mut self, key: String, methods: Vec<String>) -> Option<Vec<String>> {
        self.classes.insert(key, methods)
    }

    /// Record a function; an existing entry under the same key is replaced.
    pub fn insert_function(&mut self, key: String, calls: Vec<String>) -> Option<Vec<String>> {
        self.functions.insert(key, calls)
    }

    /// Fold a partial index into this one.
    ///
    /// Returns the qualified names that already existed. Under
    /// [`MergePolicy::Overwrite`] they are replaced by the incoming entries;
    /// under [`MergePolicy::Reject`] the first one is an error and `self` is
    /// left untouched.
    pub fn merge(&mut self, other: DependencyIndex, policy: MergePolicy) -> Result<Vec<String>> {
        let collisions: Vec<String> = other
            .classes
            .keys()
            .filter(|key| self.classes.contains_key(*key))
            .chain(
                other
                    .functions
                    .keys()
                    .filter(|key| self.functions.contains_key(*key)),
            )
            .cloned()
            .collect();

        if policy == MergePolicy::Reject {
            if let Some(first) = collisions.first() {
                return Err(CdgError::DuplicateName(first.clone()));
            }
        }

        self.files.extend(other.files);
        self.classes.extend(other.classes);
        self.functions.extend(other.functions);

        Ok(collisions)
    }

    /// Pretty-printed JSON form, written next to the graph by `--emit-index`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of method entries across all classes.
    pub fn method_count(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }
}
