//! Plain text tree formatter
//!
//! Simple mode prints the root name and a box-drawing tree. Detailed mode
//! adds a header, per-entry annotations and the optional summary blocks.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::analysis::AnalysisResult;
use crate::metadata::Entry;

use super::config::OutputConfig;
use super::utils::{
    TRUNCATION_MARKER, TreeRow, connector, files_by_category, format_date, format_permissions,
    format_size, format_timestamp, sorted_files, tree_rows,
};

const BANNER: &str = "Directory Structure";

/// Formatter for text output.
pub struct TreeFormatter<'a> {
    config: &'a OutputConfig,
}

impl<'a> TreeFormatter<'a> {
    pub fn new(config: &'a OutputConfig) -> Self {
        Self { config }
    }

    /// Render to a string, with ANSI escapes only when colour is enabled.
    pub fn format(&self, result: &AnalysisResult) -> io::Result<String> {
        let mut out = if self.config.use_color {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        };
        self.write(result, &mut out)?;
        String::from_utf8(out.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the report to any colour-capable writer.
    pub fn write<W: WriteColor>(&self, result: &AnalysisResult, out: &mut W) -> io::Result<()> {
        let detailed = self.config.is_detailed();

        if detailed {
            self.write_header(result, out)?;
        }

        self.write_directory_name(out, &result.root_name())?;
        writeln!(out)?;
        self.write_tree(result, out, detailed)?;

        if self.config.show_stats {
            self.write_statistics(result, out)?;
        }
        if self.config.show_file_list() {
            self.write_files(result, out)?;
        }
        if !result.diagnostics.is_empty() {
            write_issues(result, out)?;
        }
        Ok(())
    }

    fn write_header<W: WriteColor>(&self, result: &AnalysisResult, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", BANNER)?;
        writeln!(out, "{}", "=".repeat(BANNER.len()))?;
        writeln!(out, "Generated: {}", format_timestamp(&self.config.generated))?;
        writeln!(out, "Directory: {}", result.root.display())?;
        writeln!(out)
    }

    fn write_directory_name<W: WriteColor>(&self, out: &mut W, name: &str) -> io::Result<()> {
        if self.config.use_color {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        }
        write!(out, "{}", name)?;
        out.reset()
    }

    fn write_tree<W: WriteColor>(
        &self,
        result: &AnalysisResult,
        out: &mut W,
        detailed: bool,
    ) -> io::Result<()> {
        for row in tree_rows(result, self.config.max_depth) {
            match row {
                TreeRow::Node(node) => {
                    write!(out, "{}{}", node.prefix, connector(node.is_last))?;
                    if node.is_dir {
                        self.write_directory_name(out, node.name)?;
                    } else {
                        write!(out, "{}", node.name)?;
                    }
                    if detailed && let Some(entry) = node.entry {
                        self.write_annotations(out, entry)?;
                    }
                    writeln!(out)?;
                }
                TreeRow::Truncated { prefix, .. } => {
                    writeln!(out, "{}{}{}", prefix, connector(true), TRUNCATION_MARKER)?;
                }
            }
        }
        Ok(())
    }

    fn write_annotations<W: WriteColor>(&self, out: &mut W, entry: &Entry) -> io::Result<()> {
        if self.config.show_sizes && !entry.is_directory {
            write!(out, "  {}", format_size(entry.size))?;
        }
        if self.config.show_timestamps {
            write!(out, "  {}", format_date(&entry.modified))?;
        }
        if self.config.show_permissions {
            write!(out, "  {}", format_permissions(entry.permissions))?;
        }
        if self.config.show_git_status
            && let Some(status) = entry.git_status
        {
            write!(out, "  ")?;
            if self.config.use_color {
                out.set_color(ColorSpec::new().set_fg(Some(status.color())).set_bold(true))?;
            }
            write!(out, "{}", status.badge())?;
            out.reset()?;
        }
        if let Some(target) = &entry.symlink_target {
            write!(out, " -> {}", target)?;
        }
        Ok(())
    }

    fn write_statistics<W: WriteColor>(
        &self,
        result: &AnalysisResult,
        out: &mut W,
    ) -> io::Result<()> {
        let stats = &result.statistics;

        write_section(out, "Statistics")?;
        writeln!(out, "Total files: {}", stats.total_files)?;
        writeln!(out, "Total directories: {}", stats.total_dirs)?;
        writeln!(out, "Total size: {}", format_size(stats.total_size))?;

        let categories = stats.categories_by_count();
        if !categories.is_empty() {
            writeln!(out)?;
            writeln!(out, "By category:")?;
            for (category, tally) in categories {
                writeln!(
                    out,
                    "  {:<10} {:>6} files  {}",
                    category.as_str(),
                    tally.count,
                    format_size(tally.size)
                )?;
            }
        }

        let extensions = stats.top_extensions(10);
        if !extensions.is_empty() {
            writeln!(out)?;
            writeln!(out, "Top extensions:")?;
            for (extension, tally) in extensions {
                writeln!(
                    out,
                    "  {:<16} {:>6} files  {}",
                    extension,
                    tally.count,
                    format_size(tally.size)
                )?;
            }
        }

        if !stats.largest_files.is_empty() {
            writeln!(out)?;
            writeln!(out, "Largest files:")?;
            for file in &stats.largest_files {
                writeln!(out, "  {:>10}  {}", format_size(file.size), file.path)?;
            }
        }
        Ok(())
    }

    fn write_files<W: WriteColor>(&self, result: &AnalysisResult, out: &mut W) -> io::Result<()> {
        write_section(out, "Files")?;

        if self.config.group_by_type {
            for (category, files) in files_by_category(result) {
                writeln!(out, "{} ({}):", category, files.len())?;
                for file in files {
                    self.write_file_line(out, file, "  ")?;
                }
            }
        } else {
            for file in sorted_files(result) {
                self.write_file_line(out, file, "")?;
            }
        }
        Ok(())
    }

    fn write_file_line<W: WriteColor>(
        &self,
        out: &mut W,
        file: &Entry,
        indent: &str,
    ) -> io::Result<()> {
        write!(out, "{}{}", indent, file.path)?;
        if self.config.show_sizes {
            write!(out, " ({})", format_size(file.size))?;
        }
        writeln!(out)
    }
}

fn write_section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

/// Every error, then every warning.
fn write_issues<W: WriteColor>(result: &AnalysisResult, out: &mut W) -> io::Result<()> {
    write_section(out, "Issues")?;
    for error in result.diagnostics.errors() {
        writeln!(out, "Error: {}", error)?;
    }
    for warning in result.diagnostics.warnings() {
        writeln!(out, "Warning: {}", warning)?;
    }
    Ok(())
}
