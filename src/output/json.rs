//! JSON output formatting

use std::collections::BTreeMap;
use std::io;

use serde::{Serialize, Serializer};

use crate::analysis::AnalysisResult;
use crate::git::GitStatus;
use crate::stats::{Category, Statistics};
use crate::tree::NodeId;

use super::config::OutputConfig;
use super::utils::{
    files_by_category, format_permissions, is_directory, is_truncated_at, join_path,
    sort_entries, sorted_files,
};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    directory: String,
    structure: JsonChildren<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a Statistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<JsonFiles<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    errors: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    warnings: &'a [String],
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonFiles<'a> {
    Flat(Vec<&'a str>),
    Grouped(BTreeMap<Category, Vec<&'a str>>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<JsonChildren<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_status: Option<GitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symlink_target: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    truncated: bool,
}

/// Children keyed by name, kept in display order.
struct JsonChildren<'a>(Vec<(&'a str, JsonNode<'a>)>);

impl Serialize for JsonChildren<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, node)| (name, node)))
    }
}

/// Render the analysis as pretty-printed JSON.
pub fn format_json(result: &AnalysisResult, config: &OutputConfig) -> io::Result<String> {
    let report = JsonReport {
        generated: config.generated.to_rfc3339(),
        directory: result.root.display().to_string(),
        structure: build_children(result, config, result.structure.root(), "", 1),
        stats: config.show_stats.then_some(&result.statistics),
        files: config.show_file_list().then(|| file_list(result, config)),
        errors: result.diagnostics.errors(),
        warnings: result.diagnostics.warnings(),
    };

    serde_json::to_string_pretty(&report).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn build_children<'a>(
    result: &'a AnalysisResult,
    config: &OutputConfig,
    id: NodeId,
    parent_path: &str,
    depth: usize,
) -> JsonChildren<'a> {
    let children = sort_entries(parent_path, result.structure.children(id), &result.entries);

    JsonChildren(
        children
            .into_iter()
            .map(|(name, child)| {
                let path = join_path(parent_path, name);
                (name, build_node(result, config, child, &path, depth))
            })
            .collect(),
    )
}

fn build_node<'a>(
    result: &'a AnalysisResult,
    config: &OutputConfig,
    id: NodeId,
    path: &str,
    depth: usize,
) -> JsonNode<'a> {
    let entry = result.entries.get(path);
    let has_children = result.structure.has_children(id);
    let is_dir = is_directory(entry, has_children);
    let truncated = has_children && is_truncated_at(depth, config.max_depth);

    let children = (is_dir && !truncated)
        .then(|| build_children(result, config, id, path, depth + 1));

    JsonNode {
        kind: if is_dir { "directory" } else { "file" },
        children,
        size: entry
            .filter(|e| config.show_sizes && !e.is_directory)
            .map(|e| e.size),
        modified: entry
            .filter(|_| config.show_timestamps)
            .map(|e| e.modified.to_rfc3339()),
        permissions: entry
            .filter(|_| config.show_permissions)
            .map(|e| format_permissions(e.permissions)),
        git_status: entry
            .filter(|_| config.show_git_status)
            .and_then(|e| e.git_status),
        symlink_target: entry
            .filter(|_| config.is_detailed())
            .and_then(|e| e.symlink_target.as_deref()),
        truncated,
    }
}

fn file_list<'a>(result: &'a AnalysisResult, config: &OutputConfig) -> JsonFiles<'a> {
    if config.group_by_type {
        JsonFiles::Grouped(
            files_by_category(result)
                .into_iter()
                .map(|(category, files)| {
                    let paths = files.into_iter().map(|f| f.path.as_str()).collect::<Vec<_>>();
                    (category, paths)
                })
                .collect(),
        )
    } else {
        JsonFiles::Flat(
            sorted_files(result)
                .into_iter()
                .map(|f| f.path.as_str())
                .collect(),
        )
    }
}
