//! Output configuration types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Format {
    #[default]
    #[serde(rename = "txt", alias = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "markdown", alias = "md")]
    Markdown,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            other => Err(format!(
                "unknown format '{}' (expected txt, json or markdown)",
                other
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Text => "txt",
            Format::Json => "json",
            Format::Markdown => "markdown",
        })
    }
}

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub show_stats: bool,
    /// Append a flat (or grouped) list of files.
    pub show_files: bool,
    pub show_sizes: bool,
    pub show_timestamps: bool,
    pub show_permissions: bool,
    pub show_git_status: bool,
    /// Group the file list by category.
    pub group_by_type: bool,
    pub use_color: bool,
    /// Deepest level rendered before a `...` placeholder.
    pub max_depth: Option<usize>,
    /// Report timestamp, fixed once so every format agrees.
    pub generated: DateTime<Local>,
}

impl OutputConfig {
    /// Whether any optional section or annotation is enabled.
    pub fn is_detailed(&self) -> bool {
        self.show_stats
            || self.show_files
            || self.show_sizes
            || self.show_timestamps
            || self.show_permissions
            || self.show_git_status
            || self.group_by_type
    }

    /// Grouping implies a file list even without `show_files`.
    pub fn show_file_list(&self) -> bool {
        self.show_files || self.group_by_type
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_stats: false,
            show_files: false,
            show_sizes: false,
            show_timestamps: false,
            show_permissions: false,
            show_git_status: false,
            group_by_type: false,
            use_color: false,
            max_depth: None,
            generated: Local::now(),
        }
    }
}
