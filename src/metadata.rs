//! Per-entry metadata collection
//!
//! Turns walker output into [`Entry`] records and, in the same pass, folds
//! each accepted path into the statistics and the structure tree.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local};

use crate::diagnostics::Diagnostics;
use crate::git::{GitStatus, GitStatusMap};
use crate::stats::Statistics;
use crate::tree::{AnalysisConfig, StructureTree};

/// Metadata for one surviving path.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Path relative to the analysis root, `/`-separated.
    pub path: String,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub modified: DateTime<Local>,
    /// Raw mode bits.
    pub permissions: u32,
    pub git_status: Option<GitStatus>,
    /// Link target, for symlinks whose target could be read.
    pub symlink_target: Option<String>,
}

/// Everything the collector produced for one run.
#[derive(Debug, Default)]
pub struct Collected {
    /// Accepted paths, in walker order.
    pub paths: Vec<String>,
    pub entries: HashMap<String, Entry>,
    pub statistics: Statistics,
    pub structure: StructureTree,
}

/// Stats walker results and builds the per-path entry map.
pub struct MetadataCollector<'a> {
    root: &'a Path,
    config: &'a AnalysisConfig,
    git_status: &'a GitStatusMap,
}

impl<'a> MetadataCollector<'a> {
    pub fn new(root: &'a Path, config: &'a AnalysisConfig, git_status: &'a GitStatusMap) -> Self {
        Self {
            root,
            config,
            git_status,
        }
    }

    /// Collect entries for `paths`.
    ///
    /// Paths that cannot be stat'ed are skipped with a warning. With
    /// `exclude_empty`, directories with no children are dropped.
    pub fn collect(&self, paths: &[String], diagnostics: &mut Diagnostics) -> Collected {
        let mut collected = Collected::default();

        for path in paths {
            let entry = match self.stat(path) {
                Ok(entry) => entry,
                Err(err) => {
                    diagnostics.warn(format!("Could not stat file {}: {}", path, err));
                    continue;
                }
            };

            if self.config.exclude_empty
                && entry.is_directory
                && self.is_empty_dir(path, diagnostics)
            {
                tracing::debug!(%path, "dropping empty directory");
                continue;
            }

            collected.statistics.record(&entry);
            collected.structure.insert(path);
            collected.paths.push(path.clone());
            collected.entries.insert(path.clone(), entry);
        }

        collected
    }

    /// Build an [`Entry`] for a relative path.
    pub fn stat(&self, path: &str) -> io::Result<Entry> {
        let absolute = self.root.join(path);
        let link_meta = fs::symlink_metadata(&absolute)?;
        let is_symlink = link_meta.file_type().is_symlink();

        let (meta, symlink_target) = if is_symlink {
            let target = fs::read_link(&absolute)
                .ok()
                .map(|t| t.to_string_lossy().into_owned());
            // A dangling link still gets an entry, described by the link itself.
            (fs::metadata(&absolute).unwrap_or(link_meta), target)
        } else {
            (link_meta, None)
        };

        let is_directory = meta.is_dir();
        let modified = meta
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| DateTime::<Local>::from(UNIX_EPOCH));

        Ok(Entry {
            path: path.to_string(),
            size: if is_directory { 0 } else { meta.len() },
            is_directory,
            is_symlink,
            modified,
            permissions: mode_bits(&meta),
            git_status: self.git_status.get(path).copied(),
            symlink_target,
        })
    }

    /// True when a directory has no children. A listing failure is reported
    /// and the directory is kept.
    fn is_empty_dir(&self, path: &str, diagnostics: &mut Diagnostics) -> bool {
        match fs::read_dir(self.root.join(path)) {
            Ok(mut children) => children.next().is_none(),
            Err(err) => {
                diagnostics.warn(format!("Could not read directory {}: {}", path, err));
                false
            }
        }
    }
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
