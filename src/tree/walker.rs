//! FileWalker - discovers filtered paths under an analysis root

use std::path::{Component, Path};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;

use crate::diagnostics::Diagnostics;

use super::config::{AnalysisConfig, DEFAULT_INCLUDE_PATTERN};
use super::filter::PatternFilter;

/// Include globs match whole relative paths; `*` stays within one segment
/// and `**` spans segments.
const INCLUDE_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Walker that produces root-relative paths of files and directories.
///
/// Ignored directories are pruned rather than descended. Traversal errors
/// (unreadable directories, broken or looping symlinks) are recorded as
/// warnings and the walk continues.
pub struct FileWalker<'a> {
    config: &'a AnalysisConfig,
    filter: Arc<PatternFilter>,
    include: Vec<Pattern>,
}

impl<'a> FileWalker<'a> {
    pub fn new(
        config: &'a AnalysisConfig,
        filter: PatternFilter,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut include = Vec::new();
        for glob in config.include_globs() {
            match Pattern::new(glob) {
                Ok(pattern) => include.push(pattern),
                Err(err) => {
                    diagnostics.error(format!("Invalid include pattern '{}': {}", glob, err))
                }
            }
        }
        if include.is_empty() {
            include.extend(Pattern::new(DEFAULT_INCLUDE_PATTERN));
        }

        Self {
            config,
            filter: Arc::new(filter),
            include,
        }
    }

    /// Walk `root` and return the surviving relative paths in file-name order.
    ///
    /// Depth is bounded to `max_depth + 1` segments so renderers can tell
    /// when a truncated directory had more content. A limit of 0 still
    /// reads two levels, since top-level entries are always shown.
    pub fn walk(&self, root: &Path, diagnostics: &mut Diagnostics) -> Vec<String> {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.map(|depth| depth.max(1) + 1))
            .sort_by_file_name(|a, b| a.cmp(b));

        let filter = Arc::clone(&self.filter);
        let filter_root = root.to_path_buf();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            match to_relative(&filter_root, entry.path()) {
                Some(rel) => !filter.is_ignored(&rel, is_dir),
                None => true,
            }
        });

        let mut paths = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    diagnostics.warn(format!("Could not read {}", err));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let Some(rel) = to_relative(root, entry.path()) else {
                continue;
            };

            if self.matches_include(&rel) {
                paths.push(rel);
            }
        }

        tracing::debug!(count = paths.len(), "walk finished");
        paths
    }

    /// Check if a relative path matches at least one include glob.
    pub fn matches_include(&self, relative_path: &str) -> bool {
        self.include
            .iter()
            .any(|pattern| pattern.matches_with(relative_path, INCLUDE_MATCH_OPTIONS))
    }
}

/// Express `path` relative to `root` with `/` separators.
///
/// Returns `None` for the root itself and for paths outside it.
pub(crate) fn to_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
