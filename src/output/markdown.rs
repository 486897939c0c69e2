//! Markdown output formatting
//!
//! This module provides `MarkdownFormatter` which outputs the analysis as a
//! document: the tree as a nested markdown list, then optional statistics,
//! file list and issues sections.

use crate::analysis::AnalysisResult;
use crate::metadata::Entry;

use super::config::OutputConfig;
use super::utils::{
    TRUNCATION_MARKER, TreeRow, files_by_category, format_date, format_permissions, format_size,
    format_timestamp, sorted_files, tree_rows,
};

const INDENT: &str = "    ";

/// Markdown output formatter.
pub struct MarkdownFormatter<'a> {
    config: &'a OutputConfig,
    output: String,
}

impl<'a> MarkdownFormatter<'a> {
    pub fn new(config: &'a OutputConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    /// Render the whole document.
    pub fn format(mut self, result: &AnalysisResult) -> String {
        self.push_line("# Directory Structure");
        self.push_line("");
        self.push_line(&format!(
            "Generated: {}",
            format_timestamp(&self.config.generated)
        ));
        self.push_line("");
        self.push_line(&format!(
            "Directory: {}",
            code(&result.root.display().to_string())
        ));

        self.section("Structure");
        self.push_tree(result);

        if self.config.show_stats {
            self.push_statistics(result);
        }
        if self.config.show_file_list() {
            self.push_files(result);
        }
        if !result.diagnostics.is_empty() {
            self.push_issues(result);
        }
        self.output
    }

    fn push_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.push_line("");
        self.push_line(&format!("## {}", title));
        self.push_line("");
    }

    fn subsection(&mut self, title: &str) {
        self.push_line("");
        self.push_line(&format!("### {}", title));
        self.push_line("");
    }

    fn push_tree(&mut self, result: &AnalysisResult) {
        self.push_line(&format!("- **{}/**", escape(&result.root_name())));

        for row in tree_rows(result, self.config.max_depth) {
            match row {
                TreeRow::Node(node) => {
                    let mut line = INDENT.repeat(node.depth);
                    if node.is_dir {
                        line.push_str(&format!("- **{}/**", escape(node.name)));
                    } else {
                        line.push_str(&format!("- {}", code(node.name)));
                    }
                    if let Some(entry) = node.entry {
                        line.push_str(&self.annotations(entry));
                    }
                    self.push_line(&line);
                }
                TreeRow::Truncated { depth, .. } => {
                    self.push_line(&format!("{}- {}", INDENT.repeat(depth), TRUNCATION_MARKER));
                }
            }
        }
    }

    fn annotations(&self, entry: &Entry) -> String {
        let mut parts = String::new();
        if self.config.show_sizes && !entry.is_directory {
            parts.push_str(&format!(" *{}*", format_size(entry.size)));
        }
        if self.config.show_timestamps {
            parts.push_str(&format!(" `{}`", format_date(&entry.modified)));
        }
        if self.config.show_permissions {
            parts.push_str(&format!(" `{}`", format_permissions(entry.permissions)));
        }
        if self.config.show_git_status
            && let Some(status) = entry.git_status
        {
            parts.push_str(&format!(" `{}`", status.badge()));
        }
        if self.config.is_detailed()
            && let Some(target) = &entry.symlink_target
        {
            parts.push_str(&format!(" -> {}", code(target)));
        }
        parts
    }

    fn push_statistics(&mut self, result: &AnalysisResult) {
        let stats = &result.statistics;

        self.section("Statistics");
        self.push_line(&format!("- **Total files:** {}", stats.total_files));
        self.push_line(&format!("- **Total directories:** {}", stats.total_dirs));
        self.push_line(&format!("- **Total size:** {}", format_size(stats.total_size)));

        let categories = stats.categories_by_count();
        if !categories.is_empty() {
            self.subsection("By Category");
            self.push_line("| Category | Files | Size |");
            self.push_line("|----------|------:|-----:|");
            for (category, tally) in categories {
                self.push_line(&format!(
                    "| {} | {} | {} |",
                    category,
                    tally.count,
                    format_size(tally.size)
                ));
            }
        }

        let extensions = stats.top_extensions(10);
        if !extensions.is_empty() {
            self.subsection("Top Extensions");
            self.push_line("| Extension | Files | Size |");
            self.push_line("|-----------|------:|-----:|");
            for (extension, tally) in extensions {
                self.push_line(&format!(
                    "| {} | {} | {} |",
                    table_cell(extension),
                    tally.count,
                    format_size(tally.size)
                ));
            }
        }

        if !stats.largest_files.is_empty() {
            self.subsection("Largest Files");
            self.push_line("| File | Size |");
            self.push_line("|------|-----:|");
            for file in &stats.largest_files {
                self.push_line(&format!(
                    "| {} | {} |",
                    table_cell(&code(&file.path)),
                    format_size(file.size)
                ));
            }
        }
    }

    fn push_files(&mut self, result: &AnalysisResult) {
        self.section("Files");

        if self.config.group_by_type {
            let mut first = true;
            for (category, files) in files_by_category(result) {
                if !first {
                    self.push_line("");
                }
                first = false;
                self.push_line(&format!("### {} ({})", category, files.len()));
                self.push_line("");
                for file in files {
                    let line = self.file_item(file);
                    self.push_line(&line);
                }
            }
        } else {
            for file in sorted_files(result) {
                let line = self.file_item(file);
                self.push_line(&line);
            }
        }
    }

    fn file_item(&self, file: &Entry) -> String {
        if self.config.show_sizes {
            format!("- {} *{}*", code(&file.path), format_size(file.size))
        } else {
            format!("- {}", code(&file.path))
        }
    }

    fn push_issues(&mut self, result: &AnalysisResult) {
        self.section("Issues");
        for error in result.diagnostics.errors() {
            self.push_line(&format!("- **Error:** {}", error));
        }
        for warning in result.diagnostics.warnings() {
            self.push_line(&format!("- **Warning:** {}", warning));
        }
    }
}

/// Inline code span, widening the fence when the text holds a backtick.
fn code(text: &str) -> String {
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

/// Backslash-escape characters that would change emphasis or links.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
