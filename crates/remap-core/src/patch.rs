//! Patch IR: spans, name edits, and conflict-checked application.
//!
//! Renames are expressed as byte-span replacements over the original file
//! text. Everything outside an edited span is copied through unchanged, which
//! is what lets the printer preserve formatting, comments and bodies exactly.
//!
//! - Edits carry the text they expect to replace (checked before apply)
//! - Overlapping edits are reported as conflicts
//! - Apply is all-or-nothing per file

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash type for content verification (SHA-256, stored as hex string for JSON compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        ContentHash(hex::encode(result))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Core Types
// ============================================================================

/// Stable file identifier within a run.
///
/// Assigned by the source-tree driver in sorted path order, so the same tree
/// always produces the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new file ID.
    pub fn new(id: u32) -> Self {
        FileId(id)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file_{}", self.0)
    }
}

/// Byte offsets into file content.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u64,
    /// End byte offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice `content` by this span, if it is in bounds and on char boundaries.
    pub fn slice<'a>(&self, content: &'a str) -> Option<&'a str> {
        content.get(self.start as usize..self.end as usize)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Edits
// ============================================================================

/// A single replacement of an identifier in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// The file this edit applies to.
    pub file_id: FileId,
    /// Bytes to replace.
    pub span: Span,
    /// Text expected at `span` before the edit applies.
    pub old_text: String,
    /// Replacement text.
    pub new_text: String,
}

impl Edit {
    /// Create a replace edit.
    pub fn replace(
        file_id: FileId,
        span: Span,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        Edit {
            file_id,
            span,
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }

    /// Net change in byte length after this edit applies.
    pub fn delta(&self) -> i64 {
        self.new_text.len() as i64 - self.old_text.len() as i64
    }
}

// ============================================================================
// Conflicts
// ============================================================================

/// A detected overlap or invalidation that prevents apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conflict {
    /// Two edits have overlapping spans in the same file.
    OverlappingSpans {
        file_id: FileId,
        edit1_span: Span,
        edit2_span: Span,
    },

    /// The text at the span no longer matches what the edit expects.
    TextMismatch {
        file_id: FileId,
        span: Span,
        expected: String,
        actual: String,
    },

    /// Span is out of bounds for the file.
    SpanOutOfBounds {
        file_id: FileId,
        span: Span,
        file_len: u64,
    },

    /// Edit addressed to a different file than the one being applied.
    WrongFile { expected: FileId, actual: FileId },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::OverlappingSpans {
                file_id,
                edit1_span,
                edit2_span,
            } => write!(
                f,
                "{}: overlapping edits at {} and {}",
                file_id, edit1_span, edit2_span
            ),
            Conflict::TextMismatch {
                file_id,
                span,
                expected,
                actual,
            } => write!(
                f,
                "{}: expected '{}' at {}, found '{}'",
                file_id, expected, span, actual
            ),
            Conflict::SpanOutOfBounds {
                file_id,
                span,
                file_len,
            } => write!(
                f,
                "{}: span {} out of bounds (file length {})",
                file_id, span, file_len
            ),
            Conflict::WrongFile { expected, actual } => {
                write!(f, "edit for {} applied to {}", actual, expected)
            }
        }
    }
}

/// Detect conflicts among edits for one file's content.
///
/// Returns every conflict found. An empty list means the edits can apply.
#[must_use]
pub fn detect_conflicts(file_id: FileId, content: &str, edits: &[Edit]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let file_len = content.len() as u64;

    for edit in edits {
        if edit.file_id != file_id {
            conflicts.push(Conflict::WrongFile {
                expected: file_id,
                actual: edit.file_id,
            });
            continue;
        }
        match edit.span.slice(content) {
            None => conflicts.push(Conflict::SpanOutOfBounds {
                file_id,
                span: edit.span,
                file_len,
            }),
            Some(actual) if actual != edit.old_text => conflicts.push(Conflict::TextMismatch {
                file_id,
                span: edit.span,
                expected: edit.old_text.clone(),
                actual: actual.to_string(),
            }),
            Some(_) => {}
        }
    }

    for i in 0..edits.len() {
        for j in (i + 1)..edits.len() {
            if edits[i].span.overlaps(&edits[j].span) {
                conflicts.push(Conflict::OverlappingSpans {
                    file_id,
                    edit1_span: edits[i].span,
                    edit2_span: edits[j].span,
                });
            }
        }
    }

    conflicts
}

/// Apply edits to one file's content atomically.
///
/// Either every edit applies, or the conflicts are returned and nothing is
/// changed. Edits are applied in reverse offset order so earlier spans stay
/// valid. With no edits, the content is returned unchanged.
pub fn apply_edits(file_id: FileId, content: &str, edits: &[Edit]) -> Result<String, Vec<Conflict>> {
    let conflicts = detect_conflicts(file_id, content, edits);
    if !conflicts.is_empty() {
        return Err(conflicts);
    }

    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    let mut result = content.to_string();
    for edit in ordered {
        result.replace_range(edit.span.start as usize..edit.span.end as usize, &edit.new_text);
    }
    Ok(result)
}

// ============================================================================
// Tests
// ============================================================================
