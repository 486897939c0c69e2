//! Shared utility functions for output formatting
//!
//! Holds the sibling sort contract and the depth-limited traversal that
//! every format renders from, so all formats list the same paths in the
//! same order.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local};

use crate::analysis::AnalysisResult;
use crate::metadata::Entry;
use crate::stats::{Category, category_for, extension_of};
use crate::tree::NodeId;

/// Placeholder shown in place of children below the depth limit.
pub const TRUNCATION_MARKER: &str = "...";

/// Calculate the prefix for children of an entry.
pub fn continuation_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

/// Tree connector for an entry.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// Join a parent path and a child segment.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Order siblings: directories first, then by name.
///
/// A sibling counts as a directory only if its entry says so; a path with
/// no entry sorts as a file.
pub fn sort_entries<'a>(
    parent: &str,
    siblings: impl IntoIterator<Item = (&'a str, NodeId)>,
    entries: &HashMap<String, Entry>,
) -> Vec<(&'a str, NodeId)> {
    let mut keyed: Vec<(bool, &'a str, NodeId)> = siblings
        .into_iter()
        .map(|(name, id)| {
            let is_dir = entries
                .get(&join_path(parent, name))
                .is_some_and(|e| e.is_directory);
            (is_dir, name, id)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    keyed.into_iter().map(|(_, name, id)| (name, id)).collect()
}

/// Whether children of a node at `depth` are cut off.
pub fn is_truncated_at(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.is_some_and(|max| depth >= max)
}

/// One displayed tree node.
#[derive(Debug, Clone)]
pub struct NodeRow<'a> {
    pub name: &'a str,
    /// Segment count; top-level entries are at depth 1.
    pub depth: usize,
    pub is_dir: bool,
    pub is_last: bool,
    /// Box-drawing prefix contributed by ancestors.
    pub prefix: String,
    pub entry: Option<&'a Entry>,
}

/// A line of the rendered tree.
#[derive(Debug, Clone)]
pub enum TreeRow<'a> {
    Node(NodeRow<'a>),
    /// Stands in for the children of a node at the depth limit.
    Truncated { prefix: String, depth: usize },
}

/// Flatten the structure into display order.
pub fn tree_rows(result: &AnalysisResult, max_depth: Option<usize>) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    push_children(result, result.structure.root(), "", "", 1, max_depth, &mut rows);
    rows
}

fn push_children<'a>(
    result: &'a AnalysisResult,
    id: NodeId,
    parent_path: &str,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    rows: &mut Vec<TreeRow<'a>>,
) {
    let children = sort_entries(parent_path, result.structure.children(id), &result.entries);
    let count = children.len();

    for (index, (name, child)) in children.into_iter().enumerate() {
        let is_last = index + 1 == count;
        let path = join_path(parent_path, name);
        let entry = result.entries.get(&path);
        let has_children = result.structure.has_children(child);
        let child_prefix = continuation_prefix(prefix, is_last);

        rows.push(TreeRow::Node(NodeRow {
            name,
            depth,
            is_dir: is_directory(entry, has_children),
            is_last,
            prefix: prefix.to_string(),
            entry,
        }));

        if is_truncated_at(depth, max_depth) {
            if has_children {
                rows.push(TreeRow::Truncated {
                    prefix: child_prefix,
                    depth: depth + 1,
                });
            }
            continue;
        }

        push_children(result, child, &path, &child_prefix, depth + 1, max_depth, rows);
    }
}

/// Display classification: directory if the entry says so or it has children.
pub fn is_directory(entry: Option<&Entry>, has_children: bool) -> bool {
    has_children || entry.is_some_and(|e| e.is_directory)
}

/// All accepted files, sorted by path.
pub fn sorted_files(result: &AnalysisResult) -> Vec<&Entry> {
    let mut files: Vec<&Entry> = result
        .entries
        .values()
        .filter(|e| !e.is_directory)
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Accepted files grouped by category; each group sorted by path.
pub fn files_by_category(result: &AnalysisResult) -> BTreeMap<Category, Vec<&Entry>> {
    let mut groups: BTreeMap<Category, Vec<&Entry>> = BTreeMap::new();
    for file in sorted_files(result) {
        groups
            .entry(category_for(&extension_of(&file.path)))
            .or_default()
            .push(file);
    }
    groups
}

/// Format a size in bytes with base-1024 units, up to two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// `YYYY-MM-DD`.
pub fn format_date(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Report header timestamp.
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Permission bits as three octal digits.
pub fn format_permissions(mode: u32) -> String {
    format!("{:03o}", mode & 0o777)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StructureTree;
    use std::time::UNIX_EPOCH;

    fn entry(path: &str, is_directory: bool) -> Entry {
        Entry {
            path: path.to_string(),
            size: 0,
            is_directory,
            is_symlink: false,
            modified: DateTime::<Local>::from(UNIX_EPOCH),
            permissions: 0o644,
            git_status: None,
            symlink_target: None,
        }
    }

    #[test]
    fn test_continuation_prefix_last_item() {
        assert_eq!(continuation_prefix("", true), "    ");
        assert_eq!(continuation_prefix("│   ", true), "│       ");
    }

    #[test]
    fn test_continuation_prefix_not_last_item() {
        assert_eq!(continuation_prefix("", false), "│   ");
        assert_eq!(continuation_prefix("│   ", false), "│   │   ");
    }

    #[test]
    fn test_sort_directories_first() {
        let mut tree = StructureTree::new();
        let z = tree.insert("z");
        let a = tree.insert("a");
        let mut entries = HashMap::new();
        entries.insert("z".to_string(), entry("z", false));
        entries.insert("a".to_string(), entry("a", true));

        let sorted = sort_entries("", [("z", z), ("a", a)], &entries);
        assert_eq!(sorted, vec![("a", a), ("z", z)]);

        // Still first when the directory name sorts later
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), entry("a", false));
        entries.insert("z".to_string(), entry("z", true));
        let sorted = sort_entries("", [("a", a), ("z", z)], &entries);
        assert_eq!(sorted, vec![("z", z), ("a", a)]);
    }

    #[test]
    fn test_sort_files_by_name() {
        let mut tree = StructureTree::new();
        let b = tree.insert("dir/b.txt");
        let a = tree.insert("dir/a.txt");
        let mut entries = HashMap::new();
        entries.insert("dir/a.txt".to_string(), entry("dir/a.txt", false));
        entries.insert("dir/b.txt".to_string(), entry("dir/b.txt", false));

        let sorted = sort_entries("dir", [("b.txt", b), ("a.txt", a)], &entries);
        assert_eq!(sorted, vec![("a.txt", a), ("b.txt", b)]);
    }

    #[test]
    fn test_sort_missing_entry_counts_as_file() {
        let mut tree = StructureTree::new();
        let orphan = tree.insert("orphan");
        let real = tree.insert("real");
        let mut entries = HashMap::new();
        entries.insert("real".to_string(), entry("real", true));

        let sorted = sort_entries("", [("orphan", orphan), ("real", real)], &entries);
        assert_eq!(sorted[0].0, "real");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(120), "120 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1234), "1.21 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5 GB");
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2 TB");
    }

    #[test]
    fn test_format_permissions() {
        assert_eq!(format_permissions(0o100644), "644");
        assert_eq!(format_permissions(0o40755), "755");
        assert_eq!(format_permissions(0o7), "007");
    }

    #[test]
    fn test_truncation_rule() {
        assert!(!is_truncated_at(5, None));
        assert!(!is_truncated_at(1, Some(2)));
        assert!(is_truncated_at(2, Some(2)));
    }
}
