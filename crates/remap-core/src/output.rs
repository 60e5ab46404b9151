//! JSON output types for CLI responses.
//!
//! Every response carries `status` first and a `schema_version`, so success
//! and error output share one envelope. Field order and array order are
//! deterministic: the same input tree produces byte-identical JSON.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cache::KeyCacheStats;
use crate::engine::RunStats;
use crate::error::{OutputErrorCode, RemapError};
use crate::mapping::MappingSummary;
use crate::patch::ContentHash;
use crate::processor::RenameRecord;

pub use crate::types::Location;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Per-file Reports
// ============================================================================

/// Outcome for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    /// Path written under the target root. Differs from `path` when the
    /// file's primary type was renamed.
    pub output_path: String,
    /// SHA-256 of the input text.
    pub input_hash: ContentHash,
    /// SHA-256 of the rendered text.
    pub output_hash: ContentHash,
    /// Renames applied in this file.
    pub renames: Vec<RenameRecord>,
}

impl FileReport {
    /// Whether the rendered text differs from the input.
    pub fn changed(&self) -> bool {
        self.input_hash != self.output_hash
    }

    /// Whether the file is written under a new name.
    pub fn moved(&self) -> bool {
        self.path != self.output_path
    }
}

/// Totals over a transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    /// Java files processed.
    pub files: usize,
    /// Files whose text changed.
    pub changed_files: usize,
    /// Declaration outcome counters.
    #[serde(flatten)]
    pub stats: RunStats,
}

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
///
/// - `code`: numeric error code (also the exit code)
/// - `message`: human-readable message
/// - `details`: error-specific structured data (optional)
/// - `location`: where the error occurred (optional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from a RemapError.
    pub fn from_error(err: &RemapError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, location) = match err {
            RemapError::InvalidArguments { details, .. } => (details.clone(), None),
            RemapError::FileNotFound { path } => (Some(serde_json::json!({ "path": path })), None),
            RemapError::MappingLoad { path, line, .. } => {
                let details = match line {
                    Some(line) => serde_json::json!({ "path": path, "line": line }),
                    None => serde_json::json!({ "path": path }),
                };
                (Some(details), None)
            }
            RemapError::MappingConsistency { path, violations } => (
                Some(serde_json::json!({ "path": path, "violations": violations })),
                None,
            ),
            RemapError::Parse {
                file, line, col, ..
            } => (None, Some(Location::new(file.clone(), *line, *col))),
            RemapError::ApplyError { file, .. } => {
                let details = file.as_ref().map(|f| serde_json::json!({ "file": f }));
                (details, None)
            }
            RemapError::InternalError { .. } => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            location,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a RemapError.
    pub fn from_error(err: &RemapError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }

    /// Create an error response with just code and message.
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code,
                message: message.into(),
                details: None,
                location: None,
            },
        }
    }
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for `remap transform`.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// True when nothing was written.
    pub dry_run: bool,
    /// Loaded table counts.
    pub mappings: MappingSummary,
    /// Totals.
    pub summary: TransformSummary,
    /// Cache counters for the run.
    pub cache: KeyCacheStats,
    /// Per-file reports, sorted by path.
    pub files: Vec<FileReport>,
}

impl TransformResponse {
    /// Build a success response; totals are derived from `files` and `stats`.
    pub fn new(
        dry_run: bool,
        mappings: MappingSummary,
        files: Vec<FileReport>,
        stats: RunStats,
        cache: KeyCacheStats,
    ) -> Self {
        let summary = TransformSummary {
            files: files.len(),
            changed_files: files.iter().filter(|f| f.changed()).count(),
            stats,
        };
        TransformResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            mappings,
            summary,
            cache,
            files,
        }
    }
}

/// Response for `remap check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// The mapping file checked.
    pub mappings_file: String,
    /// Effective entry counts.
    pub mappings: MappingSummary,
}

impl CheckResponse {
    /// Build a success response.
    pub fn new(mappings_file: impl Into<String>, mappings: MappingSummary) -> Self {
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            mappings_file: mappings_file.into(),
            mappings,
        }
    }
}

// ============================================================================
// Emit
// ============================================================================

/// Emit a response as pretty JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SymbolKind;

    fn record() -> RenameRecord {
        RenameRecord {
            kind: SymbolKind::Class,
            old_key: "a.b.Old".to_string(),
            new_key: "a.b.New".to_string(),
            old_name: "Old".to_string(),
            new_name: "New".to_string(),
            location: Some(Location::new("a/b/Old.java", 3, 14)),
        }
    }

    fn file(path: &str, before: &str, after: &str, renames: Vec<RenameRecord>) -> FileReport {
        FileReport {
            path: path.to_string(),
            output_path: path.replace("Old", "New"),
            input_hash: ContentHash::compute(before.as_bytes()),
            output_hash: ContentHash::compute(after.as_bytes()),
            renames,
        }
    }

    mod error_response {
        use super::*;

        #[test]
        fn parse_error_carries_location() {
            let err = RemapError::Parse {
                file: "A.java".to_string(),
                line: 2,
                col: 5,
                message: "unexpected end of input".to_string(),
            };
            let json = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
            assert_eq!(json["status"], "error");
            assert_eq!(json["schema_version"], SCHEMA_VERSION);
            assert_eq!(json["error"]["code"], 7);
            assert_eq!(json["error"]["location"]["line"], 2);
            assert!(json["error"].get("details").is_none());
        }

        #[test]
        fn consistency_error_lists_violations() {
            let err = RemapError::MappingConsistency {
                path: "m.srg".to_string(),
                violations: vec!["v1".to_string()],
            };
            let json = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
            assert_eq!(json["error"]["code"], 6);
            assert_eq!(json["error"]["details"]["violations"][0], "v1");
        }

        #[test]
        fn status_is_first_field() {
            let mut out = Vec::new();
            emit_response(&ErrorResponse::new(10, "boom"), &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            let status = text.find("\"status\"").unwrap();
            let version = text.find("\"schema_version\"").unwrap();
            assert!(status < version);
            assert!(text.ends_with("}\n"));
        }
    }

    mod transform_response {
        use super::*;

        #[test]
        fn summary_counts_changed_files() {
            let files = vec![
                file("a/b/Old.java", "class Old {}", "class New {}", vec![record()]),
                file("a/b/Other.java", "class Other {}", "class Other {}", vec![]),
            ];
            let stats = RunStats {
                visited: 2,
                renamed: 1,
                unchanged: 1,
                skipped: 0,
            };
            let response = TransformResponse::new(
                false,
                MappingSummary::default(),
                files,
                stats,
                KeyCacheStats::default(),
            );
            assert_eq!(response.summary.files, 2);
            assert_eq!(response.summary.changed_files, 1);
            assert!(response.files[0].moved());
            assert!(!response.files[1].moved());

            let json = serde_json::to_value(&response).unwrap();
            assert_eq!(json["status"], "ok");
            assert_eq!(json["summary"]["renamed"], 1);
            assert_eq!(json["files"][0]["renames"][0]["kind"], "class");
            assert_eq!(json["files"][0]["renames"][0]["new_name"], "New");
            assert_eq!(json["files"][0]["output_path"], "a/b/New.java");
        }

        #[test]
        fn check_response_shape() {
            let json =
                serde_json::to_value(CheckResponse::new("m.srg", MappingSummary::default()))
                    .unwrap();
            assert_eq!(json["mappings_file"], "m.srg");
            assert_eq!(json["mappings"]["types"], 0);
        }
    }
}
