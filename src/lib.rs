//! # CDGRAPH
//!
//! Component dependency graphs for Python codebases.
//!
//! A source tree is scanned for Python files, each file is parsed with
//! tree-sitter into a partial [`core::DependencyIndex`] of files, classes,
//! methods, functions and raw call targets, and the merged index is turned
//! into a directed graph of containment and call edges.
//!
//! ## Output Formats
//!
//! - **PNG / SVG / PDF**: rendered by the Graphviz `dot` executable
//! - **DOT**: Graphviz source text
//! - **JSON-Compact**: positional node/edge lists for programmatic consumption

pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod parsers;

pub use error::{CdgError, Result};
