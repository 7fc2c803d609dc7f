pub mod dot;
pub mod graphviz;
pub mod json_compact;

use std::path::Path;

use crate::core::ComponentGraph;
use crate::error::Result;

pub use dot::DotFormatter;
pub use graphviz::{GraphvizRenderer, ImageFormat};
pub use json_compact::JsonCompactFormatter;

/// Writes a component graph to a file.
pub trait GraphFormatter {
    /// Extension (without the dot) of the files this formatter produces.
    fn extension(&self) -> &str;
    fn format_to_file(&self, graph: &ComponentGraph, output_path: &Path) -> Result<()>;
}
