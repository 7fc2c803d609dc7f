use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdgError>;

#[derive(Error, Debug)]
pub enum CdgError {
    #[error("The folder '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid output name '{0}': {1}")]
    InvalidName(String, &'static str),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error in {} at line {line}, column {column}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("Parser initialisation failed: {0}")]
    Parser(String),

    #[error("Duplicate qualified name '{0}'")]
    DuplicateName(String),

    #[error("Graphviz executable '{0}' could not be started: {1}")]
    RendererUnavailable(String, #[source] std::io::Error),

    #[error("Rendering {} failed: {reason}", path.display())]
    Render { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CdgError {
    /// Process exit code reported by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CdgError::InvalidName(..) => 2,
            CdgError::InputNotFound(_) => 3,
            CdgError::DuplicateName(_) => 4,
            CdgError::RendererUnavailable(..) => 5,
            CdgError::Render { .. } => 6,
            CdgError::Syntax { .. } | CdgError::Read { .. } => 7,
            CdgError::Parser(_) | CdgError::Io(_) | CdgError::Json(_) => 1,
        }
    }

    /// Whether this failure concerns a single source file and can be skipped.
    pub fn is_per_file(&self) -> bool {
        matches!(self, CdgError::Syntax { .. } | CdgError::Read { .. })
    }
}
