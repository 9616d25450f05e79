//! Line-scoped formatting: alignment, headings, bullets, and indentation.
//!
//! These operations act on whole lines. The selection (or caret) is first
//! expanded to full line boundaries, with one wrinkle inherited from how
//! selections behave in practice: a selection ending at column 0 of a later
//! line visually ends on the previous line, so that final line is excluded.

use crate::document::{ChangeKind, Document};
use crate::position::CharRange;
use crate::tags::{Alignment, AttributePayload, HeadingLevel, MAX_INDENT_LEVEL, TagId, TagKind};

/// Prefix inserted at the start of bulleted lines.
pub const BULLET_PREFIX: &str = "\u{2022} ";

impl Document {
    /// Line numbers touched by `range`, after the column-0 exclusion.
    fn expanded_line_span(&self, range: CharRange) -> (usize, usize) {
        let range = range.ordered();
        let len = self.buffer().char_count();
        let start_line = self.buffer().offset_to_position(range.start.min(len)).line;
        let end_pos = self.buffer().offset_to_position(range.end.min(len));
        let mut end_line = end_pos.line;
        if end_pos.column == 0 && end_line > start_line {
            end_line -= 1;
        }
        (start_line, end_line)
    }

    /// Expand a range to full lines, including each line's trailing newline.
    pub fn expand_to_lines(&self, range: CharRange) -> CharRange {
        let (start_line, end_line) = self.expanded_line_span(range);
        let start = self.buffer().line_start_offset(start_line);
        let end = (self.buffer().line_end_offset(end_line) + 1).min(self.buffer().char_count());
        CharRange::new(start, end)
    }

    /// Set paragraph alignment over the lines touched by `range`.
    ///
    /// The three alignment tags are mutually exclusive per line, so the other
    /// two are cleared from the expanded range first.
    pub fn apply_alignment(&mut self, range: CharRange, align: Alignment) {
        let expanded = self.expand_to_lines(range);
        if expanded.is_empty() {
            return;
        }
        for other in [Alignment::Left, Alignment::Center, Alignment::Right] {
            if other != align {
                let id = self.intern(AttributePayload::Align { align: other });
                self.overlay_mut().remove(id, expanded);
            }
        }
        let chosen = self.intern(AttributePayload::Align { align });
        self.overlay_mut().add(chosen, expanded);
        self.after_mutation(ChangeKind::StyleChanged, Some(expanded));
    }

    /// Set a heading level over the lines touched by `range`.
    ///
    /// Applying H1 to an H2 line replaces it; headings do not toggle off.
    pub fn apply_heading(&mut self, range: CharRange, level: HeadingLevel) {
        let expanded = self.expand_to_lines(range);
        if expanded.is_empty() {
            return;
        }
        for other in [HeadingLevel::H1, HeadingLevel::H2] {
            if other != level {
                let id = self.intern(AttributePayload::Heading { level: other });
                self.overlay_mut().remove(id, expanded);
            }
        }
        let chosen = self.intern(AttributePayload::Heading { level });
        self.overlay_mut().add(chosen, expanded);
        self.after_mutation(ChangeKind::StyleChanged, Some(expanded));
    }

    /// Toggle bullet prefixes on the lines touched by `range`.
    ///
    /// The block acts as a unit: if every non-blank line already carries a
    /// bullet the prefixes are removed, otherwise the missing ones are added.
    /// Blank lines are left alone either way.
    pub fn toggle_bullets(&mut self, range: CharRange) {
        let (start_line, end_line) = self.expanded_line_span(range);

        let mut all_bulleted = true;
        for line in start_line..=end_line {
            let Some(text) = self.buffer().line_text(line) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            if !text.starts_with(BULLET_PREFIX) {
                all_bulleted = false;
                break;
            }
        }

        let prefix_len = BULLET_PREFIX.chars().count();
        let mut changed = false;
        for line in start_line..=end_line {
            let Some(text) = self.buffer().line_text(line) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            let line_start = self.buffer().line_start_offset(line);
            if all_bulleted {
                if text.starts_with(BULLET_PREFIX) {
                    self.delete_raw(CharRange::new(line_start, line_start + prefix_len));
                    changed = true;
                }
            } else if !text.starts_with(BULLET_PREFIX) {
                self.insert_raw(line_start, BULLET_PREFIX);
                changed = true;
            }
        }

        if changed {
            let affected = CharRange::new(
                self.buffer().line_start_offset(start_line),
                self.buffer().line_end_offset(end_line),
            );
            self.after_mutation(ChangeKind::DocumentModified, Some(affected));
        }
    }

    /// Adjust the indent level of each line touched by `range` by `delta`
    /// steps, clamping to `0..=MAX_INDENT_LEVEL` per line.
    ///
    /// Every processed line ends up carrying exactly one indent tag, level 0
    /// included, so the level survives serialization explicitly.
    pub fn change_indent(&mut self, range: CharRange, delta: i32) {
        let (start_line, end_line) = self.expanded_line_span(range);
        let mut changed = false;

        for line in start_line..=end_line {
            let line_start = self.buffer().line_start_offset(line);
            let line_range = CharRange::new(
                line_start,
                (self.buffer().line_end_offset(line) + 1).min(self.buffer().char_count()),
            );
            if line_range.is_empty() {
                continue;
            }

            let current = i32::from(self.indent_level_at(line_start));
            let level = current.saturating_add(delta).clamp(0, i32::from(MAX_INDENT_LEVEL)) as u8;

            let indents: Vec<TagId> = self
                .overlay()
                .tags()
                .filter(|&id| self.registry().kind(id) == Some(TagKind::Indent))
                .collect();
            for id in indents {
                self.overlay_mut().remove(id, line_range);
            }
            let tag = self.intern(AttributePayload::Indent { level });
            self.overlay_mut().add(tag, line_range);
            changed = true;
        }

        if changed {
            let affected = self.expand_to_lines(range);
            self.after_mutation(ChangeKind::StyleChanged, Some(affected));
        }
    }

    /// Indent level in effect at a character offset (0 when untagged).
    pub fn indent_level_at(&self, offset: usize) -> u8 {
        for id in self.overlay().tags_at(offset) {
            if let Some(AttributePayload::Indent { level }) = self.registry().payload(id) {
                return *level;
            }
        }
        0
    }

    /// Alignment in effect at a character offset (left when untagged).
    pub fn alignment_at(&self, offset: usize) -> Alignment {
        for id in self.overlay().tags_at(offset) {
            if let Some(AttributePayload::Align { align }) = self.registry().payload(id) {
                return *align;
            }
        }
        Alignment::Left
    }
}
