use std::collections::HashMap;

use super::index::{qualify_member, split_qualified, MEMBER_SEPARATOR};
use super::DependencyIndex;

/// Which lookup table satisfied a call target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `name()` naming a free function.
    Function,
    /// `Name()` naming a class.
    Constructor,
    /// `anything.name()` or `name()` naming a method on some class.
    Method,
}

/// Qualified node ids a single call target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kind: CallKind,
    pub targets: Vec<String>,
}

impl Resolution {
    /// More than one candidate and no way to tell them apart statically.
    pub fn is_ambiguous(&self) -> bool {
        self.targets.len() > 1
    }
}

/// Name-keyed lookup tables over a [`DependencyIndex`].
///
/// Candidate lists keep the index's insertion order, so resolution is
/// deterministic for a given index.
#[derive(Debug, Clone, Default)]
pub struct CallResolver {
    /// Free function name → qualified function keys.
    function_index: HashMap<String, Vec<String>>,
    /// Class name → qualified class keys.
    class_index: HashMap<String, Vec<String>>,
    /// Method name → qualified keys of the classes declaring it.
    method_index: HashMap<String, Vec<String>>,
}

impl CallResolver {
    pub fn new(index: &DependencyIndex) -> Self {
        let mut resolver = Self::default();

        for key in index.functions.keys() {
            // Methods live under `file:Class.name` and resolve through the
            // method table instead.
            if let Some((_, name)) = split_qualified(key) {
                if !name.contains(MEMBER_SEPARATOR) {
                    push_unique(&mut resolver.function_index, name, key);
                }
            }
        }

        for (class_key, methods) in &index.classes {
            if let Some((_, name)) = split_qualified(class_key) {
                push_unique(&mut resolver.class_index, name, class_key);
            }
            for method in methods {
                push_unique(&mut resolver.method_index, method, class_key);
            }
        }

        resolver
    }

    /// Resolve a raw call target found in `caller`.
    ///
    /// Precedence: free function, then class, then method. For functions and
    /// classes a declaration in the caller's own file shadows declarations
    /// elsewhere; otherwise every candidate is returned. Method calls return
    /// every class declaring a method of that name. `None` means the target
    /// is external (builtin, library, dynamic).
    pub fn resolve(&self, caller: &str, target: &str) -> Option<Resolution> {
        let caller_file = split_qualified(caller).map(|(file, _)| file);

        if let Some(candidates) = self.function_index.get(target) {
            return Some(Resolution {
                kind: CallKind::Function,
                targets: prefer_same_file(candidates, caller_file),
            });
        }

        if let Some(candidates) = self.class_index.get(target) {
            return Some(Resolution {
                kind: CallKind::Constructor,
                targets: prefer_same_file(candidates, caller_file),
            });
        }

        self.method_index.get(target).map(|classes| Resolution {
            kind: CallKind::Method,
            targets: classes
                .iter()
                .map(|class_key| qualify_member(class_key, target))
                .collect(),
        })
    }
}

fn push_unique(index: &mut HashMap<String, Vec<String>>, name: &str, key: &str) {
    let entries = index.entry(name.to_string()).or_default();
    if !entries.iter().any(|existing| existing == key) {
        entries.push(key.to_string());
    }
}

fn prefer_same_file(candidates: &[String], caller_file: Option<&str>) -> Vec<String> {
    let local: Vec<String> = candidates
        .iter()
        .filter(|key| split_qualified(key).map(|(file, _)| file) == caller_file)
        .cloned()
        .collect();

    if local.is_empty() {
        candidates.to_vec()
    } else {
        local
    }
}
