//! Error types for fatal failures
//!
//! Per-entry problems during a scan are not errors in this sense; they are
//! recorded in [`crate::Diagnostics`] and the scan continues. The variants
//! here abort an invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised by analysis, configuration or git access.
#[derive(Debug, Error)]
pub enum Error {
    /// The analysis root does not exist.
    #[error("cannot access '{}': No such file or directory", path.display())]
    RootNotFound { path: PathBuf },

    /// The analysis root exists but is not a directory.
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// I/O failure with path context.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but could not be parsed or written.
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Repository discovery or status query failed.
    #[error("git: {0}")]
    Git(#[from] git2::Error),
}

impl Error {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
