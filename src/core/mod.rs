pub mod extractor;
pub mod graph;
pub mod index;
pub mod resolver;
pub mod scanner;

pub use extractor::{Extraction, Extractor, FileFailure};
pub use graph::{ComponentGraph, Edge, EdgeType, GraphBuilder, Node, NodeType};
pub use index::DependencyIndex;
pub use resolver::{CallKind, CallResolver, Resolution};
pub use scanner::FileScanner;
