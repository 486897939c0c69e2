//! Git repository integration
//!
//! Status lookup is a capability passed into analysis so tests can use a
//! fake instead of a real repository.

use std::collections::HashMap;
use std::path::Path;

use git2::{Repository, Status, StatusOptions};
use serde::Serialize;
use termcolor::Color;

use crate::error::Result;
use crate::tree::to_relative;

/// Per-path working tree status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GitStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Untracked,
    Ignored,
    Unknown,
}

impl GitStatus {
    /// Single-letter badge shown next to an entry.
    pub fn badge(&self) -> char {
        match self {
            GitStatus::Modified => 'M',
            GitStatus::Added => 'A',
            GitStatus::Deleted => 'D',
            GitStatus::Renamed => 'R',
            GitStatus::Copied => 'C',
            GitStatus::Untracked => '?',
            GitStatus::Ignored => '!',
            GitStatus::Unknown => 'U',
        }
    }

    /// Badge colour for console output.
    pub fn color(&self) -> Color {
        match self {
            GitStatus::Modified => Color::Yellow,
            GitStatus::Added => Color::Green,
            GitStatus::Deleted => Color::Red,
            GitStatus::Renamed | GitStatus::Copied => Color::Cyan,
            GitStatus::Untracked => Color::Magenta,
            GitStatus::Ignored | GitStatus::Unknown => Color::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GitStatus::Modified => "modified",
            GitStatus::Added => "added",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::Copied => "copied",
            GitStatus::Untracked => "untracked",
            GitStatus::Ignored => "ignored",
            GitStatus::Unknown => "unknown",
        }
    }

    /// Map libgit2 status flags. Clean entries yield `None`.
    ///
    /// libgit2 does not report copies in a plain status query, so
    /// [`GitStatus::Copied`] never comes from here.
    pub fn from_git2(status: Status) -> Option<Self> {
        if status.is_empty() {
            return None;
        }
        let mapped = if status.contains(Status::WT_NEW) {
            GitStatus::Untracked
        } else if status.contains(Status::IGNORED) {
            GitStatus::Ignored
        } else if status.contains(Status::INDEX_NEW) {
            GitStatus::Added
        } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
            GitStatus::Deleted
        } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
            GitStatus::Renamed
        } else if status.intersects(
            Status::INDEX_MODIFIED
                | Status::WT_MODIFIED
                | Status::INDEX_TYPECHANGE
                | Status::WT_TYPECHANGE,
        ) {
            GitStatus::Modified
        } else {
            GitStatus::Unknown
        };
        Some(mapped)
    }
}

/// Status of every changed path, keyed by path relative to the analysis root.
pub type GitStatusMap = HashMap<String, GitStatus>;

/// Source of per-path git status.
pub trait GitStatusProvider {
    fn status(&self, root: &Path) -> Result<GitStatusMap>;
}

impl<F> GitStatusProvider for F
where
    F: Fn(&Path) -> Result<GitStatusMap>,
{
    fn status(&self, root: &Path) -> Result<GitStatusMap> {
        self(root)
    }
}

/// Status provider backed by libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Status;

impl GitStatusProvider for Git2Status {
    fn status(&self, root: &Path) -> Result<GitStatusMap> {
        let repo = Repository::discover(root)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working directory"))?;
        let workdir = workdir
            .canonicalize()
            .unwrap_or_else(|_| workdir.to_path_buf());

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(true);

        let mut map = GitStatusMap::new();
        for entry in repo.statuses(Some(&mut options))?.iter() {
            let Some(status) = GitStatus::from_git2(entry.status()) else {
                continue;
            };
            let Some(path) = entry.path() else {
                continue;
            };
            let absolute = workdir.join(path.trim_end_matches('/'));
            if let Some(rel) = to_relative(root, &absolute) {
                map.insert(rel, status);
            }
        }

        tracing::debug!(count = map.len(), "git status collected");
        Ok(map)
    }
}

/// Check whether `path` lies inside a git working tree.
pub fn is_repository(path: &Path) -> bool {
    Repository::discover(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestRepo;

    #[test]
    fn test_from_git2_mapping() {
        assert_eq!(GitStatus::from_git2(Status::CURRENT), None);
        assert_eq!(
            GitStatus::from_git2(Status::WT_NEW),
            Some(GitStatus::Untracked)
        );
        assert_eq!(
            GitStatus::from_git2(Status::INDEX_NEW),
            Some(GitStatus::Added)
        );
        assert_eq!(
            GitStatus::from_git2(Status::INDEX_NEW | Status::WT_MODIFIED),
            Some(GitStatus::Added)
        );
        assert_eq!(
            GitStatus::from_git2(Status::WT_MODIFIED),
            Some(GitStatus::Modified)
        );
        assert_eq!(
            GitStatus::from_git2(Status::WT_DELETED),
            Some(GitStatus::Deleted)
        );
        assert_eq!(
            GitStatus::from_git2(Status::INDEX_RENAMED),
            Some(GitStatus::Renamed)
        );
        assert_eq!(
            GitStatus::from_git2(Status::IGNORED),
            Some(GitStatus::Ignored)
        );
        assert_eq!(
            GitStatus::from_git2(Status::CONFLICTED),
            Some(GitStatus::Unknown)
        );
    }

    #[test]
    fn test_badges_are_unique() {
        let all = [
            GitStatus::Modified,
            GitStatus::Added,
            GitStatus::Deleted,
            GitStatus::Renamed,
            GitStatus::Copied,
            GitStatus::Untracked,
            GitStatus::Ignored,
            GitStatus::Unknown,
        ];
        let badges: std::collections::HashSet<char> = all.iter().map(|s| s.badge()).collect();
        assert_eq!(badges.len(), all.len());
    }

    #[test]
    fn test_git2_status_reports_added_and_untracked() {
        let repo = TestRepo::with_git();
        repo.add_file("staged.rs", "fn staged() {}");
        repo.add_untracked("loose.rs", "fn loose() {}");

        let root = repo.path().canonicalize().unwrap();
        let map = Git2Status.status(&root).unwrap();

        assert_eq!(map.get("staged.rs"), Some(&GitStatus::Added));
        assert_eq!(map.get("loose.rs"), Some(&GitStatus::Untracked));
    }

    #[test]
    fn test_git2_status_reports_modified_after_commit() {
        let repo = TestRepo::with_git();
        repo.add_file("lib.rs", "pub fn a() {}");
        repo.commit("initial");
        repo.add_untracked("lib.rs", "pub fn b() {}");

        let root = repo.path().canonicalize().unwrap();
        let map = Git2Status.status(&root).unwrap();

        assert_eq!(map.get("lib.rs"), Some(&GitStatus::Modified));
    }

    #[test]
    fn test_git2_status_outside_repository_fails() {
        let repo = TestRepo::new();
        assert!(Git2Status.status(repo.path()).is_err());
        assert!(!is_repository(repo.path()));
    }
}
