//! Plain text storage.
//!
//! Provides character-offset editing and line/column conversion on top of a
//! Rope, with O(log N) access and editing. The buffer knows nothing about
//! styling; attribute ranges live in [`crate::overlay::RangeOverlay`] and are
//! kept in sync by [`crate::document::Document`].

use crate::position::{CharRange, Position};
use ropey::Rope;

/// Text buffer backed by a Rope.
///
/// All public offsets are character offsets. Out-of-range offsets are clamped
/// to the end of the buffer rather than rejected, mirroring how interactive
/// editors treat indexes past the end of a line or document.
pub struct TextBuffer {
    /// Rope data structure that automatically manages line indexing
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from existing text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get total line count. An empty buffer still has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Whether the buffer contains no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get text of the specified line (excluding the trailing newline).
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();

        // Remove trailing newline
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }

    /// Copy the text covered by `range` (clamped to the buffer).
    pub fn slice(&self, range: CharRange) -> String {
        let range = range.ordered();
        let start = range.start.min(self.rope.len_chars());
        let end = range.end.min(self.rope.len_chars());
        self.rope.slice(start..end).to_string()
    }

    /// Insert text at the specified character offset (clamped).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete the text covered by `range` (clamped; empty ranges are no-ops).
    pub fn delete(&mut self, range: CharRange) {
        let range = range.ordered();
        let start = range.start.min(self.rope.len_chars());
        let end = range.end.min(self.rope.len_chars());

        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Get the line/column position for a character offset (clamped).
    ///
    /// The offset just past a line's trailing newline maps to column 0 of the
    /// next line, so an exclusive range end that covers a whole line reads as
    /// the start of the line after it.
    pub fn offset_to_position(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line = self.rope.char_to_line(char_offset);
        let line_start = self.rope.line_to_char(line);

        Position::new(line, char_offset - line_start)
    }

    /// Get the character offset for a line/column position.
    ///
    /// Lines past the end map to the end of the buffer; columns past the end
    /// of a line clamp to the line's character count.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        if pos.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start = self.rope.line_to_char(pos.line);
        line_start + pos.column.min(self.line_len(pos.line))
    }

    /// Character offset of the first character of `line` (clamped).
    pub fn line_start_offset(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Character offset just past the last character of `line`, before its
    /// newline if one is present (clamped).
    pub fn line_end_offset(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + self.line_len(line)
    }

    /// Character count of `line` excluding its trailing newline.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }

        let line_start = self.rope.line_to_char(line);
        if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - line_start - 1 // -1 for newline
        } else {
            self.rope.len_chars() - line_start
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
