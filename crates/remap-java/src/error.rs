//! Error types for the Java front end and the source-tree driver.

use std::io;

use thiserror::Error;

use remap_core::error::RemapError;

/// A lexing or parsing failure at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {offset})")]
pub struct SyntaxError {
    /// Byte offset into the source.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            offset,
            message: message.into(),
        }
    }
}

/// Errors from parsing, rendering and writing Java sources.
#[derive(Debug, Error)]
pub enum JavaError {
    /// A source file could not be parsed.
    #[error("{path}:{line}:{col}: {message}")]
    Parse {
        path: String,
        line: u32,
        col: u32,
        message: String,
    },

    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A rewritten file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The source directory could not be walked.
    #[error("failed to walk {path}: {message}")]
    Walk { path: String, message: String },

    /// An `--exclude` glob is malformed.
    #[error("invalid exclude pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Rename edits for a file could not be applied.
    #[error("conflicting edits in {path}: {message}")]
    Conflict { path: String, message: String },
}

/// Result type for Java operations.
pub type JavaResult<T> = Result<T, JavaError>;

// ============================================================================
// Bridge: JavaError -> RemapError
// ============================================================================

impl From<JavaError> for RemapError {
    fn from(err: JavaError) -> Self {
        match err {
            JavaError::Parse {
                path,
                line,
                col,
                message,
            } => RemapError::Parse {
                file: path,
                line,
                col,
                message,
            },
            JavaError::Read { path, source } => {
                if source.kind() == io::ErrorKind::NotFound {
                    RemapError::file_not_found(path)
                } else {
                    RemapError::internal(format!("failed to read {}: {}", path, source))
                }
            }
            JavaError::Write { path, source } => {
                RemapError::apply(format!("failed to write: {}", source), path)
            }
            JavaError::Walk { path, message } => {
                RemapError::internal(format!("failed to walk {}: {}", path, message))
            }
            JavaError::Pattern { pattern, message } => RemapError::invalid_args_with_details(
                format!("invalid exclude pattern '{}': {}", pattern, message),
                serde_json::json!({ "pattern": pattern }),
            ),
            JavaError::Conflict { path, message } => RemapError::apply(message, path),
        }
    }
}
