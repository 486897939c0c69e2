//! Ignore-pattern filtering for discovered paths
//!
//! A path is ignored when any of the rule sets below matches it:
//! built-in defaults, the root `.gitignore`, user patterns, and exact
//! excluded paths (the report output file and the config file). Each rule
//! set is a separate gitignore matcher, so a `!` negation only re-includes
//! paths within its own set.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::diagnostics::Diagnostics;

use super::config::AnalysisConfig;
use super::walker::to_relative;

/// Patterns ignored unless default patterns are disabled.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git/",
    ".svn/",
    ".hg/",
    "node_modules/",
    "bower_components/",
    "dist/",
    "build/",
    "target/",
    "out/",
    "coverage/",
    "__pycache__/",
    ".cache/",
    ".next/",
    ".nuxt/",
    ".idea/",
    ".vscode/",
    "*.log",
    "*.pyc",
    ".DS_Store",
    "Thumbs.db",
];

/// Combined ignore predicate over root-relative paths.
pub struct PatternFilter {
    defaults: Option<Gitignore>,
    gitignore: Option<Gitignore>,
    user: Option<Gitignore>,
    excluded_paths: HashSet<String>,
}

impl PatternFilter {
    /// Build the filter for `root`.
    ///
    /// Malformed rules are recorded as errors and skipped; the filter is
    /// always constructed.
    pub fn new(root: &Path, config: &AnalysisConfig, diagnostics: &mut Diagnostics) -> Self {
        let defaults = if config.use_default_patterns {
            build_matcher(
                root,
                "default patterns",
                DEFAULT_IGNORE_PATTERNS.iter().copied(),
                diagnostics,
            )
        } else {
            None
        };

        let gitignore = if config.use_gitignore {
            load_gitignore(root, diagnostics)
        } else {
            None
        };

        let user = build_matcher(
            root,
            "ignore patterns",
            config.ignore_patterns.iter().map(String::as_str),
            diagnostics,
        );

        let mut excluded_paths = HashSet::new();
        if let Some(output) = &config.output_file {
            if let Some(rel) = output_relative_to(root, output) {
                excluded_paths.insert(rel);
            }
        }
        if let Some(name) = &config.exclude_config_file {
            excluded_paths.insert(name.clone());
        }

        Self {
            defaults,
            gitignore,
            user,
            excluded_paths,
        }
    }

    /// Check if a root-relative path is excluded by any rule set.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.excluded_paths.contains(relative_path) {
            return true;
        }

        let path = Path::new(relative_path);
        [&self.defaults, &self.gitignore, &self.user]
            .into_iter()
            .flatten()
            .any(|matcher| matcher.matched_path_or_any_parents(path, is_dir).is_ignore())
    }

    /// Whether a root `.gitignore` was loaded.
    pub fn has_gitignore(&self) -> bool {
        self.gitignore.is_some()
    }
}

/// Compile one rule set. Returns `None` when no rule survived.
fn build_matcher<'a>(
    root: &Path,
    source: &str,
    lines: impl IntoIterator<Item = &'a str>,
    diagnostics: &mut Diagnostics,
) -> Option<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for line in lines {
        if let Err(err) = builder.add_line(None, line) {
            diagnostics.error(format!("Invalid pattern '{}' in {}: {}", line, source, err));
        }
    }

    match builder.build() {
        Ok(matcher) if matcher.is_empty() => None,
        Ok(matcher) => Some(matcher),
        Err(err) => {
            diagnostics.error(format!("Could not compile {}: {}", source, err));
            None
        }
    }
}

/// Load the root `.gitignore`. A missing file is not an error.
fn load_gitignore(root: &Path, diagnostics: &mut Diagnostics) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no .gitignore at {}", root.display());
            return None;
        }
        Err(err) => {
            diagnostics.error(format!("Could not read {}: {}", path.display(), err));
            return None;
        }
    };

    build_matcher(root, ".gitignore", content.lines(), diagnostics)
}

/// Express the output file as a root-relative path, if it lies under root.
fn output_relative_to(root: &Path, output: &Path) -> Option<String> {
    if output.is_relative() {
        return to_relative(Path::new(""), output);
    }

    // The file may not exist yet; canonicalize its parent instead.
    let resolved: PathBuf = match (output.parent(), output.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| output.to_path_buf()),
        _ => output.to_path_buf(),
    };
    to_relative(root, &resolved)
}
