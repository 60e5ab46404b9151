//! Command implementations behind the `remap` binary.
//!
//! - `transform` - remap a source tree into a target tree
//! - `check` - load and validate a mapping file
//!
//! Configuration is validated before the mapping table is loaded, and the
//! table is loaded before any source file is read. Every function returns
//! `Result<T, RemapError>` so `main` can map failures onto stable exit codes.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use remap_core::engine::RemapEngine;
use remap_core::error::RemapError;
use remap_core::output::{CheckResponse, TransformResponse};
use remap_java::{transform_tree, TransformConfig};

// ============================================================================
// Options
// ============================================================================

/// Inputs for `remap transform`, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub source: PathBuf,
    pub target: PathBuf,
    pub mappings: PathBuf,
    pub excludes: Vec<String>,
    pub dry_run: bool,
}

// ============================================================================
// Validation
// ============================================================================

/// The mapping path must name an existing regular file.
pub fn validate_mappings_path(path: &Path) -> Result<(), RemapError> {
    if !path.exists() {
        return Err(RemapError::file_not_found(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(RemapError::invalid_args_with_details(
            format!("mappings path is not a file: {}", path.display()),
            serde_json::json!({ "mappings": path.display().to_string() }),
        ));
    }
    Ok(())
}

fn require_dir(flag: &str, path: &Path) -> Result<PathBuf, RemapError> {
    if !path.exists() {
        return Err(RemapError::file_not_found(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(RemapError::invalid_args_with_details(
            format!("--{} is not a directory: {}", flag, path.display()),
            serde_json::json!({ flag: path.display().to_string() }),
        ));
    }
    path.canonicalize().map_err(|e| {
        RemapError::invalid_args(format!("cannot resolve --{} {}: {}", flag, path.display(), e))
    })
}

/// Check the transform configuration surface.
///
/// Source and target must be existing directories, and the target may not be
/// the source or lie inside it.
pub fn validate_transform(options: &TransformOptions) -> Result<(), RemapError> {
    validate_mappings_path(&options.mappings)?;
    let source = require_dir("source", &options.source)?;
    let target = require_dir("target", &options.target)?;
    if target.starts_with(&source) {
        return Err(RemapError::invalid_args_with_details(
            "target directory must not be the source directory or inside it",
            serde_json::json!({
                "source": source.display().to_string(),
                "target": target.display().to_string(),
            }),
        ));
    }
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

/// Validate, load the table, then transform the tree.
pub fn run_transform(options: &TransformOptions) -> Result<TransformResponse, RemapError> {
    validate_transform(options)?;
    let engine = RemapEngine::load(&options.mappings)?;
    let mappings = engine.table().summary();
    info!(
        types = mappings.types,
        fields = mappings.fields,
        methods = mappings.methods,
        "loaded mappings"
    );

    let config = TransformConfig::new(&options.source, &options.target)
        .with_excludes(options.excludes.clone())
        .with_dry_run(options.dry_run);
    let report = transform_tree(&config, &engine)?;

    Ok(TransformResponse::new(
        options.dry_run,
        mappings,
        report.files,
        report.stats,
        report.cache,
    ))
}

/// Load and validate a mapping file without touching any source.
pub fn run_check(mappings: &Path) -> Result<CheckResponse, RemapError> {
    validate_mappings_path(mappings)?;
    let engine = RemapEngine::load(mappings)?;
    Ok(CheckResponse::new(
        mappings.display().to_string(),
        engine.table().summary(),
    ))
}

// ============================================================================
// Text Output
// ============================================================================

/// Human-readable summary of a transform.
pub fn transform_summary(response: &TransformResponse) -> String {
    let summary = &response.summary;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} file(s), {} changed, {} rename(s){}",
        if response.dry_run { "Would remap" } else { "Remapped" },
        summary.files,
        summary.changed_files,
        summary.stats.renamed,
        if summary.stats.skipped > 0 {
            format!(", {} declaration(s) skipped", summary.stats.skipped)
        } else {
            String::new()
        }
    );
    for file in response.files.iter().filter(|f| !f.renames.is_empty()) {
        if file.moved() {
            let _ = writeln!(out, "  {} -> {}", file.path, file.output_path);
        } else {
            let _ = writeln!(out, "  {}", file.path);
        }
        for record in &file.renames {
            let _ = write!(
                out,
                "    {} {} -> {}",
                record.kind, record.old_name, record.new_name
            );
            if let Some(loc) = &record.location {
                let _ = write!(out, " ({}:{})", loc.line, loc.col);
            }
            out.push('\n');
        }
    }
    out
}

/// Human-readable summary of a mapping check.
pub fn check_summary(response: &CheckResponse) -> String {
    let m = &response.mappings;
    format!(
        "{}: ok ({} class, {} field, {} method, {} package entries)\n",
        response.mappings_file, m.types, m.fields, m.methods, m.packages
    )
}
