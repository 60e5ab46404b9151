//! Common types shared between the engine, error and output modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Location Type
// ============================================================================

/// Location of a declaration name in a source file.
///
/// - `file`: path relative to the source root
/// - `line`: 1-indexed line number
/// - `col`: 1-indexed column, UTF-8 bytes
/// - `byte_start` / `byte_end`: byte span of the name (optional)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path (source-root relative).
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, UTF-8 bytes).
    pub col: u32,
    /// Byte offset from file start (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<u64>,
    /// Byte offset end, exclusive (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<u64>,
}

impl Location {
    /// Create a new location without byte offsets.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: None,
            byte_end: None,
        }
    }

    /// Create a location with full byte span.
    pub fn with_span(
        file: impl Into<String>,
        line: u32,
        col: u32,
        byte_start: u64,
        byte_end: u64,
    ) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: Some(byte_start),
            byte_end: Some(byte_end),
        }
    }

    /// Comparison key for deterministic sorting: (file, line, col).
    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_new_serializes_without_byte_offsets() {
        let loc = Location::new("a/b/Old.java", 42, 8);
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("byte_start"));
        assert!(!json.contains("byte_end"));
        assert!(json.contains("\"file\":\"a/b/Old.java\""));
        assert!(json.contains("\"line\":42"));
    }

    #[test]
    fn location_with_span_serializes_all_fields() {
        let loc = Location::with_span("Old.java", 3, 14, 120, 123);
        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.contains("\"byte_start\":120"));
        assert!(json.contains("\"byte_end\":123"));
    }

    #[test]
    fn locations_sort_by_file_then_position() {
        let mut locs = vec![
            Location::new("b.java", 1, 1),
            Location::new("a.java", 9, 1),
            Location::new("a.java", 2, 5),
        ];
        locs.sort();
        assert_eq!(locs[0].to_string(), "a.java:2:5");
        assert_eq!(locs[1].to_string(), "a.java:9:1");
        assert_eq!(locs[2].to_string(), "b.java:1:1");
    }
}
