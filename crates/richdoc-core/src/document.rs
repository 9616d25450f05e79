//! Document state: text, attribute ranges, comments, and change tracking.
//!
//! [`Document`] is the single entry point frontends talk to. It owns the
//! [`TextBuffer`], the [`RangeOverlay`], the [`TagRegistry`], and the
//! [`CommentStore`], and keeps them consistent across edits: every text
//! change is mirrored into the overlay and the comment anchors before
//! subscribers are notified.

use crate::buffer::TextBuffer;
use crate::comments::{Comment, CommentStore};
use crate::overlay::RangeOverlay;
use crate::position::CharRange;
use crate::tags::{
    AttributePayload, COMMENT_ACTIVE_BACKGROUND, COMMENT_HIGHLIGHT_TAG, RenderStyle, TagId,
    TagRegistry,
};
use std::path::{Path, PathBuf};

/// Sentinel line content marking a manual page break.
///
/// The token occupies a line of its own in the plain text and is interpreted
/// by print rendering; the editing model treats it as ordinary text.
pub const PAGE_BREAK_TOKEN: &str = "<<PAGE_BREAK>>";

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Document text modified
    DocumentModified,
    /// Attribute ranges changed
    StyleChanged,
    /// Comments added, edited, or removed
    CommentsChanged,
    /// The set of tags under the caret changed
    CaretStyleChanged,
    /// The whole document was replaced or cleared
    DocumentReplaced,
}

/// State change record
#[derive(Debug, Clone)]
pub struct DocChange {
    /// Change type
    pub kind: ChangeKind,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Affected region (character offset range)
    pub affected_region: Option<CharRange>,
}

impl DocChange {
    /// Create a new change record without an affected region.
    pub fn new(kind: ChangeKind, old_version: u64, new_version: u64) -> Self {
        Self {
            kind,
            old_version,
            new_version,
            affected_region: None,
        }
    }

    /// Attach the affected character range to this change record.
    pub fn with_region(mut self, region: CharRange) -> Self {
        self.affected_region = Some(region);
        self
    }
}

/// State change callback function type
pub type ChangeCallback = Box<dyn FnMut(&DocChange) + Send>;

/// A rich-text document.
///
/// `Document` provides the following features:
///
/// - **Text Editing**: Insert and delete text by character offset, with
///   attribute ranges and comment anchors kept in sync
/// - **Styling**: Composite font, color, alignment, heading, bullet, and
///   indent operations (see the styling and line operation methods)
/// - **Comments**: Range-anchored margin comments with a transient highlight
/// - **Version Tracking**: A version number incremented on every mutation,
///   plus a modified flag for save prompts
/// - **Change Notifications**: Subscribed callbacks fire after each change
///
/// # Architecture Notes
///
/// The document adopts a "unidirectional data flow" pattern:
///
/// 1. Frontend calls a mutating method in response to user input
/// 2. The document validates, mutates all affected stores, and bumps its
///    version
/// 3. Subscribed callbacks receive a [`DocChange`] describing what happened
/// 4. Frontend re-reads the state it renders (text, tags at caret, comments)
///
/// Rendering is entirely the frontend's job; the document only reports which
/// tags cover which ranges and what each tag means.
///
/// # Example
///
/// ```rust
/// use richdoc_core::Document;
///
/// let mut doc = Document::new();
/// doc.subscribe(|change| {
///     println!("{:?}: v{} -> v{}", change.kind, change.old_version, change.new_version);
/// });
///
/// doc.insert_text(0, "Hello, world\n");
/// assert_eq!(doc.text(), "Hello, world\n");
/// assert!(doc.is_modified());
/// ```
pub struct Document {
    buffer: TextBuffer,
    overlay: RangeOverlay,
    registry: TagRegistry,
    comments: CommentStore,
    path: Option<PathBuf>,
    selection: Option<CharRange>,
    cursor: usize,
    highlighted: Option<String>,
    state_version: u64,
    is_modified: bool,
    callbacks: Vec<ChangeCallback>,
    caret_tags: Vec<TagId>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            overlay: RangeOverlay::new(),
            registry: TagRegistry::new(),
            comments: CommentStore::new(),
            path: None,
            selection: None,
            cursor: 0,
            highlighted: None,
            state_version: 0,
            is_modified: false,
            callbacks: Vec::new(),
            caret_tags: Vec::new(),
        }
    }

    /// Create a document from plain text with no attributes.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.buffer = TextBuffer::from_text(text);
        doc
    }

    /// Assemble a document from parts produced by the file codec.
    pub(crate) fn from_loaded(
        buffer: TextBuffer,
        overlay: RangeOverlay,
        registry: TagRegistry,
        comments: CommentStore,
    ) -> Self {
        let mut doc = Self::new();
        doc.buffer = buffer;
        doc.overlay = overlay;
        doc.registry = registry;
        doc.comments = comments;
        doc
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// The text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The attribute range overlay.
    pub fn overlay(&self) -> &RangeOverlay {
        &self.overlay
    }

    /// The tag registry.
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// All comments in creation order.
    pub fn comments(&self) -> &[Comment] {
        self.comments.comments()
    }

    /// Look up a comment by id.
    pub fn comment(&self, id: &str) -> Option<&Comment> {
        self.comments.get(id)
    }

    /// Complete document text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Text of one line without its newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.buffer.line_text(line)
    }

    /// The file this document was loaded from or saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current state version. Increments on every mutation.
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Whether anything changed since the document was created, loaded, or
    /// last saved.
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Whether the state version has advanced past `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// All tags covering `offset`, in tag id order.
    pub fn tags_at(&self, offset: usize) -> Vec<TagId> {
        self.overlay.tags_at(offset)
    }

    /// Canonical names of all tags covering `offset`.
    pub fn tag_names_at(&self, offset: usize) -> Vec<String> {
        self.overlay
            .tags_at(offset)
            .into_iter()
            .filter_map(|id| self.registry.name(id).map(str::to_string))
            .collect()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Subscribe to state changes. Callbacks fire after every mutation.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&DocChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    // ------------------------------------------------------------------
    // Selection and caret
    // ------------------------------------------------------------------

    /// Current selection, if any.
    pub fn selection(&self) -> Option<CharRange> {
        self.selection
    }

    /// Set or clear the selection. Ranges are ordered and clamped; empty
    /// ranges clear the selection.
    pub fn set_selection(&mut self, selection: Option<CharRange>) {
        let len = self.buffer.char_count();
        self.selection = selection
            .map(|r| {
                let r = r.ordered();
                CharRange::new(r.start.min(len), r.end.min(len))
            })
            .filter(|r| !r.is_empty());
    }

    /// Current caret offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret (clamped to the document).
    ///
    /// Fires [`ChangeKind::CaretStyleChanged`] if the set of tags under the
    /// caret changed, so toolbars can refresh their toggle state.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.char_count());
        self.refresh_caret_tags();
    }

    /// The selection if one exists, otherwise an empty range at the caret.
    ///
    /// Line operations accept this directly: an empty range expands to the
    /// caret's whole line.
    pub fn selection_or_cursor(&self) -> CharRange {
        self.selection
            .unwrap_or_else(|| CharRange::empty_at(self.cursor))
    }

    // ------------------------------------------------------------------
    // Text editing
    // ------------------------------------------------------------------

    /// Insert text at a character offset (clamped).
    ///
    /// Attribute ranges and comment anchors shift to keep covering the same
    /// characters. Inserting the empty string is a no-op.
    pub fn insert_text(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.buffer.char_count());
        let delta = self.insert_raw(offset, text);
        self.after_mutation(
            ChangeKind::DocumentModified,
            Some(CharRange::new(offset, offset + delta)),
        );
    }

    /// Delete a character range (clamped). Empty and inverted ranges are
    /// no-ops.
    pub fn delete_range(&mut self, range: CharRange) {
        if let Some(deleted) = self.delete_raw(range) {
            self.after_mutation(
                ChangeKind::DocumentModified,
                Some(CharRange::empty_at(deleted.start)),
            );
        }
    }

    /// Insert a manual page break at a character offset.
    ///
    /// The break is the [`PAGE_BREAK_TOKEN`] sentinel on a line of its own.
    pub fn insert_page_break(&mut self, offset: usize) {
        let token = format!("\n{PAGE_BREAK_TOKEN}\n");
        self.insert_text(offset, &token);
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// Attach a comment to a text range, returning its id.
    ///
    /// The range is highlighted with the persistent comment tag. Fails with
    /// [`DocError::InvalidRange`](crate::error::DocError::InvalidRange) if
    /// the range is empty.
    pub fn add_comment(
        &mut self,
        range: CharRange,
        text: &str,
    ) -> Result<String, crate::error::DocError> {
        let range = self.validated_range(range)?;
        let id = self.comments.add(range, text.to_string()).id.clone();
        let tag = self.registry.intern(AttributePayload::Comment);
        self.overlay.add(tag, range);
        self.after_mutation(ChangeKind::CommentsChanged, Some(range));
        Ok(id)
    }

    /// Replace the body of a comment. Returns false for unknown ids.
    pub fn edit_comment(&mut self, id: &str, text: &str) -> bool {
        if self.comments.edit(id, text.to_string()) {
            self.after_mutation(ChangeKind::CommentsChanged, None);
            true
        } else {
            false
        }
    }

    /// Remove a comment record. Returns false for unknown ids.
    ///
    /// The comment's range highlight stays in place; only the record and the
    /// transient active highlight go away. Clearing the leftover highlight is
    /// a styling decision left to the caller.
    pub fn delete_comment(&mut self, id: &str) -> bool {
        if self.comments.remove(id).is_none() {
            return false;
        }
        if self.highlighted.as_deref() == Some(id) {
            self.clear_highlight_raw();
        }
        self.after_mutation(ChangeKind::CommentsChanged, None);
        true
    }

    /// Mark one comment as active, moving the transient highlight onto its
    /// anchor. Returns false for unknown ids.
    pub fn highlight_comment(&mut self, id: &str) -> bool {
        let Some(anchor) = self.comments.get(id).map(|c| c.anchor) else {
            return false;
        };

        let style = RenderStyle {
            background: Some(COMMENT_ACTIVE_BACKGROUND.to_string()),
            ..RenderStyle::default()
        };
        let tag = self.registry.intern_transient(COMMENT_HIGHLIGHT_TAG, style);
        self.overlay.remove_tag(tag);
        if !anchor.is_empty() {
            self.overlay.add(tag, anchor);
        }
        self.highlighted = Some(id.to_string());
        self.notify_only(ChangeKind::StyleChanged, Some(anchor));
        true
    }

    /// Clear the active comment highlight, if any.
    pub fn clear_comment_highlight(&mut self) {
        if self.clear_highlight_raw() {
            self.notify_only(ChangeKind::StyleChanged, None);
        }
    }

    /// Id of the currently highlighted comment.
    pub fn highlighted_comment(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    fn clear_highlight_raw(&mut self) -> bool {
        let had_selection = self.highlighted.take().is_some();
        let had_ranges = match self.registry.id(COMMENT_HIGHLIGHT_TAG) {
            Some(tag) => self.overlay.remove_tag(tag),
            None => false,
        };
        had_selection || had_ranges
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Clear the document back to an empty, unmodified state.
    ///
    /// The state version keeps increasing so stale snapshots stay stale.
    pub fn reset(&mut self) {
        self.buffer = TextBuffer::new();
        self.overlay.clear();
        self.registry = TagRegistry::new();
        self.comments.clear();
        self.path = None;
        self.selection = None;
        self.cursor = 0;
        self.highlighted = None;
        self.caret_tags.clear();
        self.is_modified = false;

        let old_version = self.state_version;
        self.state_version += 1;
        let change = DocChange::new(ChangeKind::DocumentReplaced, old_version, self.state_version);
        self.notify_callbacks(&change);
    }

    /// Clear the modified flag, e.g. after a successful save.
    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    // ------------------------------------------------------------------
    // Internals shared with the styling and line operation methods
    // ------------------------------------------------------------------

    /// Clamp a range to the document, failing if nothing remains.
    pub(crate) fn validated_range(
        &self,
        range: CharRange,
    ) -> Result<CharRange, crate::error::DocError> {
        let len = self.buffer.char_count();
        let clamped = CharRange::new(range.start.min(len), range.end.min(len));
        if clamped.is_empty() {
            Err(crate::error::DocError::InvalidRange)
        } else {
            Ok(clamped)
        }
    }

    pub(crate) fn intern(&mut self, payload: AttributePayload) -> TagId {
        self.registry.intern(payload)
    }

    pub(crate) fn overlay_mut(&mut self) -> &mut RangeOverlay {
        &mut self.overlay
    }

    /// Insert without notifying; returns the inserted character count.
    pub(crate) fn insert_raw(&mut self, offset: usize, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let offset = offset.min(self.buffer.char_count());
        let delta = text.chars().count();

        self.buffer.insert(offset, text);
        self.overlay.shift_for_insert(offset, delta);
        self.comments.shift_for_insert(offset, delta);

        if self.cursor >= offset {
            self.cursor += delta;
        }
        if let Some(sel) = &mut self.selection {
            if sel.start >= offset {
                sel.start += delta;
                sel.end += delta;
            } else if sel.end > offset {
                sel.end += delta;
            }
        }

        delta
    }

    /// Delete without notifying; returns the clamped range actually removed.
    pub(crate) fn delete_raw(&mut self, range: CharRange) -> Option<CharRange> {
        let len = self.buffer.char_count();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return None;
        }
        let range = CharRange::new(start, end);
        let delta = range.len();

        self.buffer.delete(range);
        self.overlay.shift_for_delete(range);
        self.comments.shift_for_delete(range);

        if self.cursor >= range.end {
            self.cursor -= delta;
        } else if self.cursor > range.start {
            self.cursor = range.start;
        }
        if let Some(sel) = self.selection {
            let shifted = shift_range_for_delete(sel, range);
            self.selection = if shifted.is_empty() { None } else { Some(shifted) };
        }

        Some(range)
    }

    /// Record a completed mutation: bump the version, set the modified flag,
    /// notify subscribers, and re-check the caret's tag set.
    pub(crate) fn after_mutation(&mut self, kind: ChangeKind, region: Option<CharRange>) {
        let old_version = self.state_version;
        self.state_version += 1;
        self.is_modified = true;

        let mut change = DocChange::new(kind, old_version, self.state_version);
        if let Some(region) = region {
            change = change.with_region(region);
        }
        self.notify_callbacks(&change);
        self.refresh_caret_tags();
    }

    /// Notify without bumping the version (presentation-only changes).
    fn notify_only(&mut self, kind: ChangeKind, region: Option<CharRange>) {
        let mut change = DocChange::new(kind, self.state_version, self.state_version);
        if let Some(region) = region {
            change = change.with_region(region);
        }
        self.notify_callbacks(&change);
    }

    fn refresh_caret_tags(&mut self) {
        let current = self.overlay.tags_at(self.cursor);
        if current != self.caret_tags {
            self.caret_tags = current;
            self.notify_only(ChangeKind::CaretStyleChanged, None);
        }
    }

    fn notify_callbacks(&mut self, change: &DocChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("selection", &self.selection)
            .field("cursor", &self.cursor)
            .field("highlighted", &self.highlighted)
            .field("state_version", &self.state_version)
            .field("is_modified", &self.is_modified)
            .field("caret_tags", &self.caret_tags)
            .finish_non_exhaustive()
    }
}

fn shift_range_for_delete(r: CharRange, deleted: CharRange) -> CharRange {
    let delta = deleted.len();
    if r.end <= deleted.start {
        r
    } else if r.start >= deleted.end {
        CharRange::new(r.start - delta, r.end - delta)
    } else if r.start >= deleted.start && r.end <= deleted.end {
        CharRange::empty_at(deleted.start)
    } else if r.start < deleted.start && r.end > deleted.end {
        CharRange::new(r.start, r.end - delta)
    } else if r.start < deleted.start {
        CharRange::new(r.start, deleted.start)
    } else {
        CharRange::new(deleted.start, r.end - delta)
    }
}
