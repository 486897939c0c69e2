//! Aggregate statistics over accepted entries
//!
//! Counts files and directories, totals sizes, and breaks files down by
//! extension and by coarse category. Directories only contribute to
//! `total_dirs`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::metadata::Entry;

/// Number of entries kept in [`Statistics::largest_files`].
pub const LARGEST_FILES_LIMIT: usize = 10;

/// Extension key for files without a dotted suffix.
pub const NO_EXTENSION: &str = "(no extension)";

/// Coarse file classification derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Web,
    Data,
    Docs,
    Config,
    Image,
    Media,
    Archive,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Web => "web",
            Category::Data => "data",
            Category::Docs => "docs",
            Category::Config => "config",
            Category::Image => "image",
            Category::Media => "media",
            Category::Archive => "archive",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File count and byte total for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub count: usize,
    pub size: u64,
}

impl Tally {
    fn add(&mut self, size: u64) {
        self.count += 1;
        self.size += size;
    }
}

/// A file path with its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizedPath {
    pub path: String,
    pub size: u64,
}

/// Aggregate counters for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_files: usize,
    pub total_dirs: usize,
    pub total_size: u64,
    pub by_extension: BTreeMap<String, Tally>,
    pub by_category: BTreeMap<Category, Tally>,
    /// Up to [`LARGEST_FILES_LIMIT`] files, largest first, ties by path.
    pub largest_files: Vec<SizedPath>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted entry.
    pub fn record(&mut self, entry: &Entry) {
        if entry.is_directory {
            self.total_dirs += 1;
        } else {
            self.record_file(&entry.path, entry.size);
        }
    }

    /// Record a file by path and size.
    pub fn record_file(&mut self, path: &str, size: u64) {
        self.total_files += 1;
        self.total_size += size;

        let extension = extension_of(path);
        let category = category_for(&extension);
        self.by_extension.entry(extension).or_default().add(size);
        self.by_category.entry(category).or_default().add(size);

        self.largest_files.push(SizedPath {
            path: path.to_string(),
            size,
        });
        self.largest_files
            .sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        self.largest_files.truncate(LARGEST_FILES_LIMIT);
    }

    /// Extensions by file count descending, then name, at most `limit`.
    pub fn top_extensions(&self, limit: usize) -> Vec<(&str, Tally)> {
        let mut extensions: Vec<(&str, Tally)> = self
            .by_extension
            .iter()
            .map(|(ext, tally)| (ext.as_str(), *tally))
            .collect();
        extensions.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        extensions.truncate(limit);
        extensions
    }

    /// Categories by file count descending, then table order.
    pub fn categories_by_count(&self) -> Vec<(Category, Tally)> {
        let mut categories: Vec<(Category, Tally)> =
            self.by_category.iter().map(|(c, t)| (*c, *t)).collect();
        categories.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
        categories
    }
}

/// Dotted suffix of the file name, or [`NO_EXTENSION`].
pub fn extension_of(path: &str) -> String {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Map an extension (with or without the leading dot) to its category.
pub fn category_for(extension: &str) -> Category {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "py" | "pyw" | "rb" | "java" | "kt"
        | "kts" | "scala" | "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hh" | "cs" | "go"
        | "rs" | "php" | "swift" | "m" | "sh" | "bash" | "zsh" | "fish" | "ps1" | "lua"
        | "pl" | "pm" | "r" | "dart" | "ex" | "exs" | "erl" | "hs" | "clj" | "ml" | "zig"
        | "vue" | "svelte" => Category::Code,
        "html" | "htm" | "css" | "scss" | "sass" | "less" | "styl" => Category::Web,
        "json" | "jsonl" | "csv" | "tsv" | "xml" | "sql" | "db" | "sqlite" | "parquet"
        | "proto" | "graphql" | "gql" => Category::Data,
        "md" | "markdown" | "mdx" | "txt" | "rst" | "adoc" | "pdf" | "doc" | "docx" | "odt"
        | "rtf" | "tex" => Category::Docs,
        "yml" | "yaml" | "toml" | "ini" | "cfg" | "conf" | "env" | "properties" | "lock"
        | "editorconfig" => Category::Config,
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" | "bmp" | "tiff" | "avif" => {
            Category::Image
        }
        "mp3" | "mp4" | "wav" | "flac" | "ogg" | "avi" | "mov" | "mkv" | "webm" | "m4a" => {
            Category::Media
        }
        "zip" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "7z" | "rar" | "zst" => Category::Archive,
        _ => Category::Other,
    }
}
