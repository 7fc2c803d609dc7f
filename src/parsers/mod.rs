pub mod common;
pub mod python;

use std::path::Path;

use crate::core::DependencyIndex;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Partial index whose qualified names are prefixed with the file id.
    pub index: DependencyIndex,
    /// Qualified names declared more than once in the file; the index keeps
    /// the last declaration.
    pub redefinitions: Vec<String>,
}

pub trait LanguageParser {
    fn parse_file(&mut self, file_path: &Path, file_id: &str) -> Result<ParseResult>;
    fn language_name(&self) -> &str;
}
