use std::path::{Path, PathBuf};

use super::{DependencyIndex, FileScanner};
use crate::config::{ExtractorConfig, FailurePolicy, MergePolicy};
use crate::error::{CdgError, Result};
use crate::parsers::python::PythonParser;
use crate::parsers::LanguageParser;

/// A source file left out of the index, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub index: DependencyIndex,
    /// Files skipped because they could not be read or parsed.
    pub failures: Vec<FileFailure>,
    /// Qualified names whose earlier declaration was overwritten.
    pub collisions: Vec<String>,
    pub files_scanned: usize,
}

pub struct Extractor {
    config: ExtractorConfig,
    file_scanner: FileScanner,
    parser: Box<dyn LanguageParser>,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let parser = PythonParser::new()?;
        Ok(Self::with_parser(config, Box::new(parser)))
    }

    pub fn with_parser(config: ExtractorConfig, parser: Box<dyn LanguageParser>) -> Self {
        let file_scanner = FileScanner::new(config.extensions.iter().cloned())
            .with_follow_links(config.follow_links);
        Self {
            config,
            file_scanner,
            parser,
        }
    }

    /// Build one dependency index for every eligible file under `root_path`.
    pub fn extract(&mut self, root_path: &Path) -> Result<Extraction> {
        if !root_path.is_dir() {
            return Err(CdgError::InputNotFound(root_path.to_path_buf()));
        }

        let files = self.file_scanner.scan_directory(root_path);
        tracing::info!(
            "Found {} {} files under {}",
            files.len(),
            self.parser.language_name(),
            root_path.display()
        );

        let mut extraction = Extraction {
            files_scanned: files.len(),
            ..Extraction::default()
        };

        for file_info in &files {
            let parsed = match self.parser.parse_file(&file_info.path, &file_info.file_id) {
                Ok(parsed) => parsed,
                Err(err) if err.is_per_file() => {
                    if self.config.failure_policy == FailurePolicy::FailFast {
                        return Err(err);
                    }
                    tracing::warn!("Skipping {}: {}", file_info.path.display(), err);
                    extraction.failures.push(FileFailure {
                        path: file_info.path.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            tracing::debug!(
                "{}: {} classes, {} functions",
                file_info.file_id,
                parsed.index.classes.len(),
                parsed.index.functions.len()
            );

            if let Some(name) = parsed.redefinitions.first() {
                if self.config.merge_policy == MergePolicy::Reject {
                    return Err(CdgError::DuplicateName(name.clone()));
                }
            }

            let mut collisions = parsed.redefinitions;
            collisions.extend(
                extraction
                    .index
                    .merge(parsed.index, self.config.merge_policy)?,
            );
            for name in &collisions {
                tracing::warn!(
                    "'{}' declared more than once ({}); keeping the last one",
                    name,
                    file_info.path.display()
                );
            }
            extraction.collisions.extend(collisions);
        }

        Ok(extraction)
    }
}
