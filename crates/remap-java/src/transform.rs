//! Source-tree transform: collect, parse, remap, render, write.
//!
//! All files are parsed before anything is written, so a syntax error anywhere
//! in the tree leaves the target directory untouched. Signatures are resolved
//! only after every file is parsed, against the types the whole tree declares. One engine run covers
//! the whole tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use remap_core::cache::KeyCacheStats;
use remap_core::engine::{RemapEngine, RunStats};
use remap_core::output::FileReport;
use remap_core::patch::{ContentHash, FileId};

use crate::error::{JavaError, JavaResult};
use crate::files::{build_excludes, collect_java_files};
use crate::resolve::TypeIndex;
use crate::unit::{JavaUnit, ParsedFile};

/// Inputs for one transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Root of the input tree.
    pub source_dir: PathBuf,
    /// Root of the output tree. Relative paths are preserved, except that a
    /// file follows its renamed primary type.
    pub target_dir: PathBuf,
    /// Globs (source-relative) to leave out.
    pub excludes: Vec<String>,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl TransformConfig {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        TransformConfig {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            excludes: Vec::new(),
            dry_run: false,
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What a transform did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformReport {
    /// One entry per collected file, sorted by path.
    pub files: Vec<FileReport>,
    pub stats: RunStats,
    pub cache: KeyCacheStats,
    /// Files written to the target (zero on a dry run).
    pub written: usize,
}

/// Rewrite every Java file under `config.source_dir` into `config.target_dir`.
pub fn transform_tree(config: &TransformConfig, engine: &RemapEngine) -> JavaResult<TransformReport> {
    let excludes = build_excludes(&config.excludes)?;
    let sources = collect_java_files(&config.source_dir, &excludes)?;
    debug!(files = sources.len(), root = %config.source_dir.display(), "collected sources");

    let parsed = sources
        .into_iter()
        .map(|file| ParsedFile::parse(file.rel_path, file.content))
        .collect::<JavaResult<Vec<_>>>()?;
    let index: TypeIndex = parsed.iter().map(ParsedFile::syntax).collect();
    debug!(types = index.len(), "indexed declared types");
    let mut units: Vec<JavaUnit> = parsed
        .into_iter()
        .enumerate()
        .map(|(idx, file)| JavaUnit::resolve(FileId::new(idx as u32), file, &index))
        .collect();

    let mut run = engine.begin_run();
    let mut files = Vec::with_capacity(units.len());
    let mut rendered = Vec::with_capacity(units.len());
    for unit in &mut units {
        let renames = run.remap(unit);
        let output = unit.render()?;
        files.push(FileReport {
            path: unit.path().to_string(),
            output_path: unit.output_path(),
            input_hash: ContentHash::compute(unit.source().as_bytes()),
            output_hash: ContentHash::compute(output.as_bytes()),
            renames,
        });
        rendered.push(output);
    }
    let report = run.finish();
    check_output_paths(&files)?;

    let mut written = 0;
    if !config.dry_run {
        for (file, text) in files.iter().zip(&rendered) {
            write_output(&config.target_dir, &file.output_path, text)?;
            written += 1;
        }
        info!(
            files = written,
            target = %config.target_dir.display(),
            "wrote transformed sources"
        );
    }

    Ok(TransformReport {
        files,
        stats: report.stats,
        cache: report.cache,
        written,
    })
}

/// Two inputs may not land on the same output file.
fn check_output_paths(files: &[FileReport]) -> JavaResult<()> {
    let mut claimed: BTreeMap<&str, &str> = BTreeMap::new();
    for file in files {
        if let Some(previous) = claimed.insert(&file.output_path, &file.path) {
            return Err(JavaError::Conflict {
                path: file.output_path.clone(),
                message: format!(
                    "both {} and {} would be written to {}",
                    previous, file.path, file.output_path
                ),
            });
        }
        if file.moved() {
            debug!(from = %file.path, to = %file.output_path, "file follows renamed type");
        }
    }
    Ok(())
}

fn write_output(target_dir: &Path, rel_path: &str, text: &str) -> JavaResult<()> {
    let path = target_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| JavaError::Write {
            path: rel_path.to_string(),
            source,
        })?;
    }
    fs::write(&path, text).map_err(|source| JavaError::Write {
        path: rel_path.to_string(),
        source,
    })
}
