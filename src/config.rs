//! Persisted configuration file
//!
//! A single JSON record in the working directory. Missing keys take their
//! built-in defaults; command-line flags are merged on top by the binary.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::git;
use crate::output::{Format, OutputConfig};
use crate::tree::AnalysisConfig;

/// Well-known config file name.
pub const CONFIG_FILE_NAME: &str = ".dirscope.json";

const WRITE_PROBE_NAME: &str = ".dirscope-write-check";

/// On-disk configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigFile {
    /// Report destination, relative to the working directory.
    pub output: Option<String>,
    pub stats: bool,
    pub files: bool,
    pub sizes: bool,
    pub gitignore: bool,
    pub hidden: bool,
    pub depth: Option<usize>,
    pub format: Format,
    pub group_by_type: bool,
    pub timestamps: bool,
    pub permissions: bool,
    pub exclude_empty: bool,
    pub follow_symlinks: bool,
    pub git_status: bool,
    pub color: bool,
    pub ignore: Vec<String>,
    pub include: Vec<String>,
    pub no_default_patterns: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            output: None,
            stats: false,
            files: false,
            sizes: false,
            gitignore: true,
            hidden: false,
            depth: None,
            format: Format::Text,
            group_by_type: false,
            timestamps: false,
            permissions: false,
            exclude_empty: false,
            follow_symlinks: false,
            git_status: false,
            color: true,
            ignore: Vec::new(),
            include: Vec::new(),
            no_default_patterns: false,
        }
    }
}

impl ConfigFile {
    /// Path of the config file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Load the config file from `dir`; `Ok(None)` when there is none.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(path, e)),
        };

        let config =
            serde_json::from_str(&content).map_err(|source| Error::Config { path, source })?;
        tracing::debug!(dir = %dir.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Write the record as pretty JSON into `dir`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(dir);
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Config {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json + "\n").map_err(|e| Error::io(&path, e))?;
        tracing::debug!(path = %path.display(), "saved config file");
        Ok(path)
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            use_gitignore: self.gitignore,
            use_default_patterns: !self.no_default_patterns,
            ignore_patterns: self.ignore.clone(),
            include_patterns: self.include.clone(),
            include_hidden: self.hidden,
            follow_symlinks: self.follow_symlinks,
            max_depth: self.depth,
            exclude_empty: self.exclude_empty,
            git_status: self.git_status,
            output_file: self.output.as_ref().map(PathBuf::from),
            exclude_config_file: None,
        }
    }

    /// Display options; `use_color` is the configured preference only.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            show_stats: self.stats,
            show_files: self.files,
            show_sizes: self.sizes,
            show_timestamps: self.timestamps,
            show_permissions: self.permissions,
            show_git_status: self.git_status,
            group_by_type: self.group_by_type,
            use_color: self.color,
            max_depth: self.depth,
            ..Default::default()
        }
    }
}

/// Result of [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Write a default config file into `dir` unless one is already there.
pub fn init(dir: &Path) -> Result<InitOutcome> {
    let path = ConfigFile::path_in(dir);
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists(path));
    }
    ConfigFile::default().save(dir).map(InitOutcome::Created)
}

/// State of the config file as seen by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigState {
    Missing,
    Valid,
    Invalid(String),
}

/// Advisory environment report.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub directory: PathBuf,
    pub config: ConfigState,
    pub has_gitignore: bool,
    pub is_git_repository: bool,
    pub writable: bool,
}

impl CheckReport {
    /// Whether every check came back clean.
    pub fn is_healthy(&self) -> bool {
        self.config == ConfigState::Valid && self.writable
    }
}

/// Inspect `dir` without modifying it. Never fails.
pub fn check(dir: &Path) -> CheckReport {
    let config = match ConfigFile::load(dir) {
        Ok(Some(_)) => ConfigState::Valid,
        Ok(None) => ConfigState::Missing,
        Err(e) => ConfigState::Invalid(e.to_string()),
    };

    CheckReport {
        directory: dir.to_path_buf(),
        config,
        has_gitignore: dir.join(".gitignore").is_file(),
        is_git_repository: git::is_repository(dir),
        writable: is_writable(dir),
    }
}

fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(WRITE_PROBE_NAME);
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(_) => {
            if let Err(e) = fs::remove_file(&probe) {
                tracing::warn!(path = %probe.display(), "could not remove write probe: {}", e);
            }
            true
        }
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "write probe failed: {}", e);
            false
        }
    }
}

fn mark(ok: bool) -> &'static str {
    if ok { "ok" } else { "!!" }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checking {}", self.directory.display())?;
        match &self.config {
            ConfigState::Valid => writeln!(f, "  [ok] {} is valid", CONFIG_FILE_NAME)?,
            ConfigState::Missing => writeln!(
                f,
                "  [--] {} not found (run `dirscope init` to create one)",
                CONFIG_FILE_NAME
            )?,
            ConfigState::Invalid(reason) => writeln!(f, "  [!!] {}", reason)?,
        }
        writeln!(
            f,
            "  [{}] .gitignore {}",
            mark(self.has_gitignore),
            if self.has_gitignore { "found" } else { "not found" }
        )?;
        writeln!(
            f,
            "  [{}] {}",
            mark(self.is_git_repository),
            if self.is_git_repository {
                "inside a git repository"
            } else {
                "not a git repository (--git-status unavailable)"
            }
        )?;
        write!(
            f,
            "  [{}] {}",
            mark(self.writable),
            if self.writable {
                "directory is writable"
            } else {
                "directory is not writable"
            }
        )
    }
}
