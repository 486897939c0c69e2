//! Configuration types for analysis runs

use std::path::PathBuf;

/// Include pattern used when none are configured.
pub const DEFAULT_INCLUDE_PATTERN: &str = "**/*";

/// Immutable settings for one analysis run.
///
/// Shared by reference with the filter, walker and metadata collector.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Apply the root `.gitignore`, if present.
    pub use_gitignore: bool,
    /// Apply the built-in ignore list.
    pub use_default_patterns: bool,
    /// User ignore globs (gitignore syntax).
    pub ignore_patterns: Vec<String>,
    /// Discovery globs; empty means [`DEFAULT_INCLUDE_PATTERN`].
    pub include_patterns: Vec<String>,
    /// Include dotfiles and dot-directories.
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    /// Deepest level rendered; the walker reads one level further.
    pub max_depth: Option<usize>,
    /// Drop directories with no children at stat time.
    pub exclude_empty: bool,
    /// Query git for per-path status.
    pub git_status: bool,
    /// Report destination; never part of its own report.
    pub output_file: Option<PathBuf>,
    /// Config file name to hide at the root level.
    pub exclude_config_file: Option<String>,
}

impl AnalysisConfig {
    /// Include globs in effect, falling back to [`DEFAULT_INCLUDE_PATTERN`].
    pub fn include_globs(&self) -> Vec<&str> {
        if self.include_patterns.is_empty() {
            vec![DEFAULT_INCLUDE_PATTERN]
        } else {
            self.include_patterns.iter().map(String::as_str).collect()
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            use_default_patterns: true,
            ignore_patterns: Vec::new(),
            include_patterns: Vec::new(),
            include_hidden: false,
            follow_symlinks: false,
            max_depth: None,
            exclude_empty: false,
            git_status: false,
            output_file: None,
            exclude_config_file: None,
        }
    }
}
