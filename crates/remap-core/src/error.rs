//! Error types and exit codes for remap.
//!
//! `RemapError` is the single error type the CLI renders. Subsystem errors
//! (mapping load, Java parsing, file output) are bridged into it with `From`
//! impls, and every variant maps to a stable [`OutputErrorCode`].
//!
//! ## Exit codes
//!
//! - `2`: invalid arguments
//! - `3`: file not found
//! - `4`: apply errors (writing the target tree)
//! - `6`: mapping table could not be loaded or is inconsistent
//! - `7`: a Java source file could not be parsed
//! - `10`: internal errors

use std::fmt;

use thiserror::Error;

use crate::mapping::{MappingError, Violation};

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes, used as process exit codes and in JSON error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// A named input path does not exist.
    FileNotFound = 3,
    /// Failed to write the rewritten tree.
    ApplyError = 4,
    /// Mapping file unreadable, malformed or inconsistent.
    MappingError = 6,
    /// Java source failed to parse.
    ParseError = 7,
    /// Bugs, unexpected state.
    InternalError = 10,
}

impl OutputErrorCode {
    /// Numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum RemapError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Input path does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The mapping file could not be read or parsed.
    #[error("cannot load mappings from {path}: {message}")]
    MappingLoad {
        path: String,
        message: String,
        line: Option<usize>,
    },

    /// The mapping file parsed but breaks consistency rules.
    #[error("inconsistent mappings in {path}: {} violation(s)", .violations.len())]
    MappingConsistency {
        path: String,
        violations: Vec<String>,
    },

    /// A source file could not be parsed.
    #[error("parse error at {file}:{line}:{col}: {message}")]
    Parse {
        file: String,
        line: u32,
        col: u32,
        message: String,
    },

    /// Failed to write output.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&RemapError> for OutputErrorCode {
    fn from(err: &RemapError) -> Self {
        match err {
            RemapError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            RemapError::FileNotFound { .. } => OutputErrorCode::FileNotFound,
            RemapError::MappingLoad { .. } => OutputErrorCode::MappingError,
            RemapError::MappingConsistency { .. } => OutputErrorCode::MappingError,
            RemapError::Parse { .. } => OutputErrorCode::ParseError,
            RemapError::ApplyError { .. } => OutputErrorCode::ApplyError,
            RemapError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<RemapError> for OutputErrorCode {
    fn from(err: RemapError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: MappingError -> RemapError
// ============================================================================

impl From<MappingError> for RemapError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::Io { path, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    RemapError::FileNotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    RemapError::MappingLoad {
                        path: path.display().to_string(),
                        message: source.to_string(),
                        line: None,
                    }
                }
            }
            MappingError::Parse { path, source } => RemapError::MappingLoad {
                path: path.display().to_string(),
                message: source.kind.to_string(),
                line: Some(source.line),
            },
            MappingError::Consistency { path, source } => RemapError::MappingConsistency {
                path: path.display().to_string(),
                violations: source.violations.iter().map(Violation::to_string).collect(),
            },
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl RemapError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        RemapError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        RemapError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        RemapError::FileNotFound { path: path.into() }
    }

    /// Create an apply error for one output file.
    pub fn apply(message: impl Into<String>, file: impl Into<String>) -> Self {
        RemapError::ApplyError {
            message: message.into(),
            file: Some(file.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        RemapError::InternalError {
            message: message.into(),
        }
    }

    /// Error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
