//! Margin comments anchored to character ranges.
//!
//! Comments annotate a span of text without modifying it. The store owns the
//! records and keeps their anchors tracking the text across edits; the yellow
//! range highlight drawn under an anchor is ordinary overlay state handled by
//! [`crate::document::Document`].

use crate::position::CharRange;
use chrono::Local;

/// Maximum characters of comment text shown in a list preview.
pub const PREVIEW_MAX_CHARS: usize = 45;

/// A single margin comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Stable identifier, `"C1"`, `"C2"`, ... in creation order.
    pub id: String,
    /// Anchor range in character offsets. May be empty if the commented text
    /// was deleted.
    pub anchor: CharRange,
    /// Comment body.
    pub text: String,
    /// Creation timestamp, `YYYY-MM-DD HH:MM` local time.
    pub created_at: String,
}

impl Comment {
    /// One-line preview of the body: newlines flattened, trimmed, truncated
    /// to a fixed width with an ellipsis.
    pub fn preview(&self) -> String {
        let flat = self.text.replace('\n', " ");
        let flat = flat.trim();
        let mut preview: String = flat.chars().take(PREVIEW_MAX_CHARS).collect();
        if flat.chars().count() > PREVIEW_MAX_CHARS {
            preview.push('…');
        }
        preview
    }

    /// Label for a comment list entry, `"C3 • preview text"`.
    pub fn list_label(&self) -> String {
        format!("{} • {}", self.id, self.preview())
    }
}

/// Ordered store of comments with a monotonic id counter.
pub struct CommentStore {
    comments: Vec<Comment>,
    counter: u64,
}

impl CommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            comments: Vec::new(),
            counter: 0,
        }
    }

    /// Add a comment anchored at `anchor`, assigning the next id.
    pub fn add(&mut self, anchor: CharRange, text: String) -> &Comment {
        self.counter += 1;
        let comment = Comment {
            id: format!("C{}", self.counter),
            anchor,
            text,
            created_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        };
        self.comments.push(comment);
        self.comments.last().expect("just pushed")
    }

    /// Re-insert a previously created comment, keeping the id counter ahead
    /// of every restored id.
    pub fn restore(&mut self, comment: Comment) {
        if let Some(n) = comment
            .id
            .strip_prefix('C')
            .and_then(|digits| digits.parse::<u64>().ok())
        {
            self.counter = self.counter.max(n);
        }
        self.comments.push(comment);
    }

    /// Look up a comment by id.
    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Replace the body of the comment with `id`. Returns false if no such
    /// comment exists.
    pub fn edit(&mut self, id: &str, text: String) -> bool {
        match self.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.text = text;
                true
            }
            None => false,
        }
    }

    /// Remove and return the comment with `id`.
    pub fn remove(&mut self, id: &str) -> Option<Comment> {
        let idx = self.comments.iter().position(|c| c.id == id)?;
        Some(self.comments.remove(idx))
    }

    /// All comments in creation order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Iterate over comments in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    /// Labels for a comment list, one per comment in creation order.
    pub fn display_list(&self) -> Vec<String> {
        self.comments.iter().map(Comment::list_label).collect()
    }

    /// Number of comments.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Whether the store holds no comments.
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Drop all comments and reset the id counter.
    pub fn clear(&mut self) {
        self.comments.clear();
        self.counter = 0;
    }

    /// Update anchors for an insertion of `delta` characters at `pos`.
    pub fn shift_for_insert(&mut self, pos: usize, delta: usize) {
        if delta == 0 {
            return;
        }

        for comment in &mut self.comments {
            let anchor = &mut comment.anchor;
            if anchor.start >= pos {
                anchor.start += delta;
                anchor.end += delta;
            } else if anchor.end > pos {
                anchor.end += delta;
            }
        }
    }

    /// Update anchors for a deletion of the text in `range`.
    ///
    /// An anchor fully inside the deleted range collapses to an empty range
    /// at the deletion point; the comment itself is never dropped.
    pub fn shift_for_delete(&mut self, range: CharRange) {
        if range.is_empty() {
            return;
        }
        let delta = range.len();

        for comment in &mut self.comments {
            let anchor = &mut comment.anchor;
            if anchor.end <= range.start {
                // Before the deletion, unaffected.
            } else if anchor.start >= range.end {
                anchor.start -= delta;
                anchor.end -= delta;
            } else if anchor.start >= range.start && anchor.end <= range.end {
                anchor.start = range.start;
                anchor.end = range.start;
            } else if anchor.start < range.start && anchor.end > range.end {
                anchor.end -= delta;
            } else if anchor.start < range.start {
                anchor.end = range.start;
            } else {
                anchor.start = range.start;
                anchor.end -= delta;
            }
        }
    }
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}
