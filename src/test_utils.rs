//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks. Repositories are
//! created through libgit2, so no `git` binary is needed.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

/// A temporary directory, optionally a git repository.
///
/// The directory is removed when dropped.
pub struct TestRepo {
    dir: TempDir,
    repo: Option<Repository>,
}

impl TestRepo {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir, repo: None }
    }

    /// Create a new temporary directory with git initialized.
    pub fn with_git() -> Self {
        let mut repo = Self::new();
        repo.init_git();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Initialize a git repository with a local identity for commits.
    pub fn init_git(&mut self) {
        let repo = Repository::init(self.dir.path()).expect("Failed to init git");
        {
            let mut config = repo.config().expect("Failed to open git config");
            config
                .set_str("user.email", "test@test.com")
                .expect("Failed to set git email");
            config
                .set_str("user.name", "Test")
                .expect("Failed to set git name");
        }
        self.repo = Some(repo);
    }

    /// Write a file and stage it if git is initialized.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.add_untracked(path, content);

        if let Some(repo) = &self.repo {
            let mut index = repo.index().expect("Failed to open index");
            index
                .add_path(Path::new(path))
                .expect("Failed to stage file");
            index.write().expect("Failed to write index");
        }

        full_path
    }

    /// Write a file without staging it.
    ///
    /// Creates parent directories as needed.
    pub fn add_untracked(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write a file of `size` bytes.
    pub fn add_sized(&self, path: &str, size: usize) -> PathBuf {
        self.add_untracked(path, &"x".repeat(size))
    }

    /// Create a directory (and parents) with no files in it.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a symlink at `link` pointing to `target`.
    #[cfg(unix)]
    pub fn add_symlink(&self, target: &str, link: &str) -> PathBuf {
        let full_path = self.dir.path().join(link);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Stage everything in the working tree.
    pub fn stage_all(&self) {
        if let Some(repo) = &self.repo {
            let mut index = repo.index().expect("Failed to open index");
            index
                .add_all(["*"], IndexAddOption::DEFAULT, None)
                .expect("Failed to stage files");
            index.write().expect("Failed to write index");
        }
    }

    /// Commit the current index.
    pub fn commit(&self, message: &str) {
        let repo = self.repo.as_ref().expect("Git not initialized");
        let mut index = repo.index().expect("Failed to open index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature = Signature::now("Test", "test@test.com").expect("Failed to sign");

        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .expect("Failed to commit");
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
