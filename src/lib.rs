//! Dirscope - directory structure reports that respect .gitignore

pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod git;
pub mod metadata;
pub mod output;
pub mod stats;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{AnalysisResult, analyze, analyze_with};
pub use config::{CONFIG_FILE_NAME, CheckReport, ConfigFile, InitOutcome};
pub use diagnostics::Diagnostics;
pub use error::{Error, Result};
pub use git::{Git2Status, GitStatus, GitStatusMap, GitStatusProvider};
pub use metadata::Entry;
pub use output::{Format, OutputConfig, render};
pub use stats::{Category, Statistics};
pub use tree::{AnalysisConfig, StructureTree};
