//! Report rendering
//!
//! This module provides formatters for an analysis result in three formats:
//! - Text with optional colors
//! - JSON
//! - Markdown
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `utils` - Shared sort contract, depth-limited traversal and formatters
//! - `tree` - Text formatter
//! - `json` - JSON output
//! - `markdown` - Markdown output formatter

mod config;
mod json;
mod markdown;
mod tree;
mod utils;

use std::io;

use crate::analysis::AnalysisResult;

pub use config::{Format, OutputConfig};
pub use json::format_json;
pub use markdown::MarkdownFormatter;
pub use tree::TreeFormatter;
pub use utils::{continuation_prefix, format_size, sort_entries};

/// Render an analysis result in the requested format.
pub fn render(result: &AnalysisResult, format: Format, config: &OutputConfig) -> io::Result<String> {
    tracing::debug!(%format, "rendering report");
    match format {
        Format::Text => TreeFormatter::new(config).format(result),
        Format::Json => format_json(result, config),
        Format::Markdown => Ok(MarkdownFormatter::new(config).format(result)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::analysis::analyze_with;
    use crate::git::GitStatusMap;
    use crate::tree::AnalysisConfig;

    fn no_git(_: &Path) -> crate::Result<GitStatusMap> {
        Ok(GitStatusMap::new())
    }

    fn sample() -> (TempDir, AnalysisResult) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/util")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("src/util/mod.rs"), "pub mod a;").unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# guide").unwrap();
        fs::write(dir.path().join("z.txt"), "").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        let result = analyze_with(dir.path(), &AnalysisConfig::default(), &no_git).unwrap();
        (dir, result)
    }

    /// Every path in the JSON structure.
    fn json_paths(node: &Value, parent: &str, out: &mut Vec<String>) {
        if let Some(children) = node.as_object() {
            for (name, child) in children {
                let path = if parent.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", parent, name)
                };
                out.push(path.clone());
                json_paths(&child["children"], &path, out);
            }
        }
    }

    /// Paths rebuilt from the text tree, in display order.
    fn text_paths(output: &str) -> Vec<String> {
        let mut stack: Vec<String> = Vec::new();
        let mut paths = Vec::new();
        for line in output.lines().skip(1) {
            let Some(at) = line.find("── ") else {
                continue;
            };
            let depth = line[..at].chars().count() / 4 + 1;
            stack.truncate(depth - 1);
            stack.push(line[at + "── ".len()..].to_string());
            paths.push(stack.join("/"));
        }
        paths
    }

    /// Paths rebuilt from the markdown bullet list, in display order.
    fn markdown_paths(output: &str) -> Vec<String> {
        let mut stack: Vec<String> = Vec::new();
        let mut paths = Vec::new();
        for line in output.lines() {
            let trimmed = line.trim_start();
            let indent = line.len() - trimmed.len();
            if indent == 0 || !trimmed.starts_with("- ") {
                continue;
            }
            let name = trimmed
                .trim_start_matches("- ")
                .trim_matches(|c| c == '*' || c == '`')
                .trim_end_matches('/');
            stack.truncate(indent / 4 - 1);
            stack.push(name.to_string());
            paths.push(stack.join("/"));
        }
        paths
    }

    #[test]
    fn test_formats_agree_on_paths_and_order() {
        let (_dir, result) = sample();
        let config = OutputConfig::default();

        let json: Value =
            serde_json::from_str(&render(&result, Format::Json, &config).unwrap()).unwrap();
        let mut from_json = Vec::new();
        json_paths(&json["structure"], "", &mut from_json);
        from_json.sort();
        assert_eq!(from_json, result.structure.paths());

        let text = render(&result, Format::Text, &config).unwrap();
        let markdown = render(&result, Format::Markdown, &config).unwrap();
        let from_text = text_paths(&text);
        assert_eq!(markdown_paths(&markdown), from_text);

        let mut sorted = from_text;
        sorted.sort();
        assert_eq!(sorted, from_json);
    }

    #[test]
    fn test_directories_listed_first() {
        let (_dir, result) = sample();
        let text = render(&result, Format::Text, &OutputConfig::default()).unwrap();
        assert_eq!(
            text_paths(&text),
            vec![
                "docs",
                "docs/guide.md",
                "src",
                "src/util",
                "src/util/mod.rs",
                "src/main.rs",
                "Cargo.toml",
                "z.txt",
            ]
        );
    }

    #[test]
    fn test_depth_limit_in_every_format() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/c"), "").unwrap();
        let result = analyze_with(dir.path(), &AnalysisConfig::default(), &no_git).unwrap();
        let config = OutputConfig {
            max_depth: Some(1),
            ..Default::default()
        };

        let text = render(&result, Format::Text, &config).unwrap();
        assert_eq!(text_paths(&text), vec!["a", "a/..."]);

        let markdown = render(&result, Format::Markdown, &config).unwrap();
        assert_eq!(markdown_paths(&markdown), vec!["a", "a/..."]);

        let json = render(&result, Format::Json, &config).unwrap();
        assert!(!json.contains("\"b\""));
        assert!(!json.contains("\"c\""));
    }

    #[test]
    fn test_diagnostics_surface_everywhere() {
        let (_dir, mut result) = sample();
        result.diagnostics.warn("Could not stat file gone.txt: not found");
        let config = OutputConfig::default();

        for format in [Format::Text, Format::Json, Format::Markdown] {
            let output = render(&result, format, &config).unwrap();
            assert!(
                output.contains("Could not stat file gone.txt"),
                "missing warning in {} output",
                format
            );
        }
    }
}
