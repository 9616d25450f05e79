//! Logical positions and character ranges.
//!
//! All offsets in this crate are **character** offsets (not bytes), and all
//! ranges are half-open `[start, end)`. [`Position`] is the line/column view
//! of the same coordinate space; the document file format stores positions in
//! `"line.column"` notation where the line is 1-based and the column 0-based.

use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Render this position in file notation: 1-based line, a dot, then the
    /// 0-based column (`Position::new(0, 4)` becomes `"1.4"`).
    pub fn to_notation(&self) -> String {
        format!("{}.{}", self.line + 1, self.column)
    }

    /// Parse file notation produced by [`Position::to_notation`].
    ///
    /// Returns `None` for anything that is not `<line>.<column>` with a
    /// 1-based line number.
    pub fn parse_notation(s: &str) -> Option<Self> {
        let (line, column) = s.split_once('.')?;
        let line: usize = line.parse().ok()?;
        let column: usize = column.parse().ok()?;
        if line == 0 {
            return None;
        }
        Some(Self::new(line - 1, column))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharRange {
    /// Start offset in characters.
    pub start: usize,
    /// End offset (exclusive) in characters.
    pub end: usize,
}

impl CharRange {
    /// Create a new range with `[start, end)` character offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty range collapsed at `offset`.
    pub fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no characters (empty or inverted).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if the range contains a specific position.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two ranges overlap.
    pub fn overlaps(&self, other: &CharRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Return a copy with `start <= end` guaranteed, swapping if needed.
    pub fn ordered(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Self::new(self.end, self.start)
        }
    }
}
