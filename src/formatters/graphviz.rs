//! Image rendering through the Graphviz `dot` executable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{DotFormatter, GraphFormatter};
use crate::core::ComponentGraph;
use crate::error::{CdgError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

pub struct GraphvizRenderer {
    dot_binary: String,
    format: ImageFormat,
}

impl GraphvizRenderer {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            dot_binary: "dot".to_string(),
            format,
        }
    }

    pub fn with_binary(mut self, dot_binary: impl Into<String>) -> Self {
        self.dot_binary = dot_binary.into();
        self
    }

    /// Render `graph` into `output_path`.
    ///
    /// The DOT source and the image are produced as temporary files next to
    /// the destination. The image is moved into place only after `dot`
    /// succeeds; both temporaries are removed on every path.
    fn render(&self, graph: &ComponentGraph, output_path: &Path) -> Result<()> {
        let render_error = |reason: String| CdgError::Render {
            path: output_path.to_path_buf(),
            reason,
        };

        let out_dir = output_dir(output_path);
        fs::create_dir_all(&out_dir).map_err(|err| render_error(err.to_string()))?;

        let mut source = tempfile::Builder::new()
            .prefix(".cdgraph-")
            .suffix(".gv")
            .tempfile_in(&out_dir)
            .map_err(|err| render_error(err.to_string()))?;
        source
            .write_all(DotFormatter::new().to_dot(graph).as_bytes())
            .and_then(|()| source.flush())
            .map_err(|err| render_error(err.to_string()))?;
        let source = source.into_temp_path();

        let image = tempfile::Builder::new()
            .prefix(".cdgraph-")
            .suffix(&format!(".{}", self.format.as_str()))
            .tempfile_in(&out_dir)
            .map_err(|err| render_error(err.to_string()))?
            .into_temp_path();

        tracing::debug!(
            "Running {} -T{} on {}",
            self.dot_binary,
            self.format.as_str(),
            source.display()
        );
        let output = Command::new(&self.dot_binary)
            .arg(format!("-T{}", self.format.as_str()))
            .arg("-o")
            .arg(&*image)
            .arg(&*source)
            .output()
            .map_err(|err| CdgError::RendererUnavailable(self.dot_binary.clone(), err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", self.dot_binary, output.status),
                message => message.to_string(),
            };
            return Err(render_error(reason));
        }

        image
            .persist(output_path)
            .map_err(|err| render_error(err.error.to_string()))?;
        Ok(())
    }
}

impl GraphFormatter for GraphvizRenderer {
    fn extension(&self) -> &str {
        self.format.as_str()
    }

    fn format_to_file(&self, graph: &ComponentGraph, output_path: &Path) -> Result<()> {
        self.render(graph, output_path)
    }
}

fn output_dir(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
