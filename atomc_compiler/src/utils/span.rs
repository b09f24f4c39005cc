//! Source location tracking for the AtomC front end
//!
//! The tokenizer works on raw bytes, so spans are byte ranges into the
//! source buffer. Line/column positions are derived on demand through a
//! [`SourceMap`], which keeps the hot path free of column bookkeeping.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved position in source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, counted in bytes)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `[start, end)` of the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The bytes covered by this span; out-of-range spans are clamped
    pub fn slice<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        let end = self.end.min(source.len());
        let start = self.start.min(end);
        &source[start..end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line index over a source buffer for offset -> position lookup
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: Vec<u8>,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .iter()
                .enumerate()
                .filter(|(_, &b)| b == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            source: source.to_vec(),
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column for a byte offset; offsets past the end clamp to the end
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let column = offset - self.line_starts[line];
        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Text of a line by number (1-based), without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<String> {
        let index = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let text = String::from_utf8_lossy(&self.source[start..end]);
        Some(text.trim_end_matches('\r').to_string())
    }

    /// Render a message with the offending line and a caret under `span`
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let start = self.position_at(span.start);
        let mut result = format!("error: {}\n  --> {}\n", message, start);

        if let Some(line) = self.get_line(start.line) {
            let gutter = start.line.to_string();
            let padding = " ".repeat(gutter.len());
            let width = span.len().clamp(1, line.len().saturating_sub(start.column as usize - 1).max(1));

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", gutter, line));
            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(start.column as usize - 1),
                "^".repeat(width)
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup() {
        let map = SourceMap::new(b"int x;\nvoid main() {}\n");

        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(4), Position::new(4, 1, 5));
        assert_eq!(map.position_at(7), Position::new(7, 2, 1));
        assert_eq!(map.position_at(12), Position::new(12, 2, 6));
        assert_eq!(map.line_count(), 3);
    }

    #[test]
    fn test_position_past_end_is_clamped() {
        let map = SourceMap::new(b"ab");
        assert_eq!(map.position_at(99), Position::new(2, 1, 3));
    }

    #[test]
    fn test_get_line() {
        let map = SourceMap::new(b"first\r\nsecond");
        assert_eq!(map.get_line(1).as_deref(), Some("first"));
        assert_eq!(map.get_line(2).as_deref(), Some("second"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(3), None);
    }

    #[test]
    fn test_span_helpers() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);

        assert_eq!(a.len(), 3);
        assert!(a.contains(4));
        assert!(!a.contains(5));
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert!(Span::empty(3).is_empty());
        assert_eq!(Span::new(1, 3).slice(b"abcd"), b"bc");
        assert_eq!(Span::new(3, 10).slice(b"abcd"), b"d");
    }

    #[test]
    fn test_format_error_points_at_column() {
        let map = SourceMap::new(b"int x\nint 0x;\n");
        let rendered = map.format_error(&Span::new(10, 12), "malformed number");

        assert!(rendered.starts_with("error: malformed number\n  --> 2:5\n"));
        assert!(rendered.contains("2 | int 0x;"));
        assert!(rendered.contains("  |     ^^"));
    }
}
