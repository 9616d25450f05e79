//! JSON file codec, format version 6.
//!
//! A document file is a single JSON object: the plain text, a flat list of
//! tag spans with `"L.C"` endpoints, and the comment records. Spans carry an
//! `attrs` object holding the decoded payload; older files without `attrs`
//! are reconstructed by parsing the tag name. Loading is tolerant: a span or
//! comment that cannot be understood is logged and skipped rather than
//! failing the whole file, and only a version *newer* than ours is refused.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::TextBuffer;
use crate::comments::{Comment, CommentStore};
use crate::document::Document;
use crate::error::DocError;
use crate::overlay::RangeOverlay;
use crate::position::{CharRange, Position};
use crate::tags::{AttributePayload, TagRegistry};

/// Version written to saved files. Files up to and including this version
/// are accepted.
pub const FILE_FORMAT_VERSION: u32 = 6;

#[derive(Debug, Serialize)]
struct DocumentFile {
    version: u32,
    text: String,
    tags: Vec<TagSpan>,
    comments: Vec<CommentRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TagSpan {
    tag: String,
    start: String,
    end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<AttributePayload>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommentRecord {
    id: String,
    start: String,
    end: String,
    text: String,
    #[serde(default)]
    created_at: String,
}

impl Document {
    /// Serialize the document to pretty-printed JSON.
    ///
    /// Transient tags (the ones without a payload, like the comment
    /// highlight) are session state and are not written.
    pub fn to_json(&self) -> Result<String, DocError> {
        let buffer = self.buffer();

        let mut tags = Vec::new();
        for (id, ranges) in self.overlay().iter() {
            let Some(entry) = self.registry().get(id) else {
                continue;
            };
            let Some(payload) = &entry.payload else {
                continue;
            };
            for range in ranges {
                tags.push(TagSpan {
                    tag: entry.name.clone(),
                    start: buffer.offset_to_position(range.start).to_notation(),
                    end: buffer.offset_to_position(range.end).to_notation(),
                    attrs: Some(payload.clone()),
                });
            }
        }

        let comments = self
            .comments()
            .iter()
            .map(|c| CommentRecord {
                id: c.id.clone(),
                start: buffer.offset_to_position(c.anchor.start).to_notation(),
                end: buffer.offset_to_position(c.anchor.end).to_notation(),
                text: c.text.clone(),
                created_at: c.created_at.clone(),
            })
            .collect();

        let file = DocumentFile {
            version: FILE_FORMAT_VERSION,
            text: self.text(),
            tags,
            comments,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Build a document from JSON produced by [`Document::to_json`] (or any
    /// older format version).
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let Some(root) = value.as_object() else {
            return Err(DocError::Parse("expected a JSON object".to_string()));
        };

        let version = root.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if version > u64::from(FILE_FORMAT_VERSION) {
            return Err(DocError::Parse(format!(
                "file format version {version} is newer than supported version {FILE_FORMAT_VERSION}"
            )));
        }

        let text = root.get("text").and_then(|v| v.as_str()).unwrap_or("");
        let buffer = TextBuffer::from_text(text);
        let mut overlay = RangeOverlay::new();
        let mut registry = TagRegistry::new();
        let mut comments = CommentStore::new();

        for item in root.get("tags").and_then(|v| v.as_array()).into_iter().flatten() {
            let span: TagSpan = match serde_json::from_value(item.clone()) {
                Ok(span) => span,
                Err(err) => {
                    warn!(error = %err, "skipping malformed tag span");
                    continue;
                }
            };
            let payload = span
                .attrs
                .or_else(|| AttributePayload::parse_name(&span.tag));
            let Some(payload) = payload else {
                warn!(tag = %span.tag, "skipping unrecognized tag");
                continue;
            };
            let (Some(start), Some(end)) = (
                Position::parse_notation(&span.start),
                Position::parse_notation(&span.end),
            ) else {
                warn!(tag = %span.tag, start = %span.start, end = %span.end,
                    "skipping tag span with malformed positions");
                continue;
            };
            let range = CharRange::new(
                buffer.position_to_offset(start),
                buffer.position_to_offset(end),
            );
            let id = registry.intern(payload);
            overlay.add(id, range);
        }

        for item in root
            .get("comments")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
        {
            let record: CommentRecord = match serde_json::from_value(item.clone()) {
                Ok(record) => record,
                Err(err) => {
                    warn!(error = %err, "skipping malformed comment record");
                    continue;
                }
            };
            let (Some(start), Some(end)) = (
                Position::parse_notation(&record.start),
                Position::parse_notation(&record.end),
            ) else {
                warn!(id = %record.id, "skipping comment with malformed positions");
                continue;
            };
            let anchor = CharRange::new(
                buffer.position_to_offset(start),
                buffer.position_to_offset(end),
            );
            let tag = registry.intern(AttributePayload::Comment);
            overlay.add(tag, anchor);
            comments.restore(Comment {
                id: record.id,
                anchor,
                text: record.text,
                created_at: record.created_at,
            });
        }

        debug!(
            tags = overlay.range_count(),
            comments = comments.len(),
            version,
            "document parsed"
        );
        Ok(Document::from_loaded(buffer, overlay, registry, comments))
    }

    /// Serialize to `path`, then record the path and clear the modified flag.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), DocError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json)?;
        self.set_path(path.to_path_buf());
        self.mark_saved();
        debug!(path = %path.display(), "document saved");
        Ok(())
    }

    /// Load a document from a file saved by [`Document::save_to`].
    pub fn open_from(path: impl AsRef<Path>) -> Result<Self, DocError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut doc = Self::from_json(&json)?;
        doc.set_path(path.to_path_buf());
        debug!(path = %path.display(), "document opened");
        Ok(doc)
    }
}
