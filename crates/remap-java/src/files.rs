//! Java file collection.
//!
//! Walks a source root and returns every `.java` file in sorted relative-path
//! order, so file ids (and therefore reports) are stable across runs.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{JavaError, JavaResult};

/// Directory names never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "build", "target", ".gradle"];

/// A collected source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// `/`-separated path relative to the source root.
    pub rel_path: String,
    pub content: String,
}

/// Compile user exclusion globs, matched against source-relative paths.
pub fn build_excludes(patterns: &[String]) -> JavaResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| JavaError::Pattern {
            pattern: pattern.clone(),
            message: e.kind().to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| JavaError::Pattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}

fn is_default_excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| DEFAULT_EXCLUDED_DIRS.contains(&name))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Collect `.java` files under `root`, skipping default and user exclusions.
///
/// Unreadable directory entries are logged and skipped; an unreadable
/// `.java` file is an error.
pub fn collect_java_files(root: &Path, excludes: &GlobSet) -> JavaResult<Vec<SourceFile>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_default_excluded(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "java") {
            continue;
        }
        let Some(rel_path) = relative_path(root, path) else {
            continue;
        };
        if excludes.is_match(&rel_path) {
            debug!(path = %rel_path, "excluded");
            continue;
        }

        let content = fs::read_to_string(path).map_err(|source| JavaError::Read {
            path: rel_path.clone(),
            source,
        })?;
        files.push(SourceFile { rel_path, content });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}
