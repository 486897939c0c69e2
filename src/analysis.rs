//! Analysis entry point
//!
//! Runs the filter, walker and metadata collector in sequence and returns
//! everything the renderers need.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::git::{Git2Status, GitStatusMap, GitStatusProvider};
use crate::metadata::{Entry, MetadataCollector};
use crate::stats::Statistics;
use crate::tree::{AnalysisConfig, FileWalker, PatternFilter, StructureTree};

/// Output of one analysis run.
#[derive(Debug)]
pub struct AnalysisResult {
    /// Canonical analysis root.
    pub root: PathBuf,
    /// Accepted relative paths, in walker order.
    pub filtered_paths: Vec<String>,
    pub statistics: Statistics,
    pub structure: StructureTree,
    pub entries: HashMap<String, Entry>,
    pub git_status: GitStatusMap,
    pub diagnostics: Diagnostics,
}

impl AnalysisResult {
    /// Display name of the root directory.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}

/// Analyze `root` using libgit2 for status lookups.
pub fn analyze(root: &Path, config: &AnalysisConfig) -> Result<AnalysisResult> {
    analyze_with(root, config, &Git2Status)
}

/// Analyze `root` with an explicit git status provider.
///
/// Fails only when the root is missing, not a directory, or unreadable.
pub fn analyze_with(
    root: &Path,
    config: &AnalysisConfig,
    git: &dyn GitStatusProvider,
) -> Result<AnalysisResult> {
    let root = resolve_root(root)?;
    tracing::debug!(root = %root.display(), "starting analysis");

    let mut diagnostics = Diagnostics::new();
    let filter = PatternFilter::new(&root, config, &mut diagnostics);

    let git_status = if config.git_status {
        match git.status(&root) {
            Ok(map) => map,
            Err(err) => {
                diagnostics.warn(format!("Git status unavailable: {}", err));
                GitStatusMap::new()
            }
        }
    } else {
        GitStatusMap::new()
    };

    let walker = FileWalker::new(config, filter, &mut diagnostics);
    let paths = walker.walk(&root, &mut diagnostics);

    let collected =
        MetadataCollector::new(&root, config, &git_status).collect(&paths, &mut diagnostics);

    tracing::debug!(
        files = collected.statistics.total_files,
        dirs = collected.statistics.total_dirs,
        errors = diagnostics.errors().len(),
        warnings = diagnostics.warnings().len(),
        "analysis finished"
    );

    Ok(AnalysisResult {
        root,
        filtered_paths: collected.paths,
        statistics: collected.statistics,
        structure: collected.structure,
        entries: collected.entries,
        git_status,
        diagnostics,
    })
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(Error::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    let canonical = root.canonicalize().map_err(|e| Error::io(root, e))?;
    if !canonical.is_dir() {
        return Err(Error::NotADirectory { path: canonical });
    }
    fs::read_dir(&canonical).map_err(|e| Error::io(&canonical, e))?;
    Ok(canonical)
}
