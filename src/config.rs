//! Extraction settings shared by the library and the CLI.

use crate::error::{CdgError, Result};

/// What the extractor does when a single file cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and keep going with the remaining files.
    #[default]
    SkipAndContinue,
    /// Abort the whole run on the first failing file.
    FailFast,
}

/// How partial indexes are folded into the running index when a qualified
/// name is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Last processed entry wins; collisions are reported.
    #[default]
    Overwrite,
    /// Duplicate qualified names abort the run.
    Reject,
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// File extensions (without the dot) treated as source files.
    pub extensions: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub merge_policy: MergePolicy,
    pub follow_links: bool,
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            failure_policy: FailurePolicy::default(),
            merge_policy: MergePolicy::default(),
            follow_links: false,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(Into::into)
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an output base name: non-empty after trimming, no path
/// separators, not a relative path component.
pub fn validate_output_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CdgError::InvalidName(name.to_string(), "name is empty"));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(CdgError::InvalidName(
            name.to_string(),
            "name must not contain path separators",
        ));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(CdgError::InvalidName(name.to_string(), "name is a path component"));
    }
    Ok(trimmed)
}
