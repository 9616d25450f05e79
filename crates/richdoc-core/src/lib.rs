#![warn(missing_docs)]
//! Richdoc Core - Headless Rich-Text Document Engine
//!
//! # Overview
//!
//! `richdoc-core` is a headless rich-text document kernel focused on styled text state,
//! range attributes, and a lossless file format. It does not render anything, assuming
//! the upper layer provides a styled-text view that consumes tag ranges and render
//! styles. Offsets are Unicode scalar values, so CJK text and emoji count as one.
//!
//! # Core Features
//!
//! - **Styled Ranges**: overlapping attribute ranges over a Rope text buffer
//! - **Composite Fonts**: one font record per run, toggles sample-and-rewrite
//! - **Line Formatting**: alignment, headings, bullets, indentation steps
//! - **Margin Comments**: anchored comments that follow document edits
//! - **Lossless Files**: JSON format v6 with tolerant loading of older files
//! - **Change Tracking**: version counter, dirty flag, and change callbacks
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (edits, selection, callbacks)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Styling & Line Ops (fonts, bullets, ...)   │  ← Formatting
//! ├─────────────────────────────────────────────┤
//! │  Codec (JSON file format, version 6)        │  ← Persistence
//! ├─────────────────────────────────────────────┤
//! │  RangeOverlay + TagRegistry                 │  ← Attribute Ranges
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (Rope-based)                    │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Editing and Styling
//!
//! ```rust
//! use richdoc_core::{CharRange, Document, HeadingLevel};
//!
//! let mut doc = Document::from_text("Quarterly Report\nRevenue grew in Q3.");
//!
//! // Make the first line a heading and bold one word.
//! doc.apply_heading(CharRange::new(0, 16), HeadingLevel::H1);
//! doc.toggle_bold(CharRange::new(17, 24)).unwrap();
//!
//! let json = doc.to_json().unwrap();
//! let restored = Document::from_json(&json).unwrap();
//! assert_eq!(restored.text(), doc.text());
//! assert!(restored.tag_names_at(18).contains(&"style_bold".to_string()));
//! ```
//!
//! ## Change Notifications
//!
//! ```rust
//! use richdoc_core::{ChangeKind, Document};
//!
//! let mut doc = Document::from_text("draft");
//! doc.subscribe(|change| {
//!     if change.kind == ChangeKind::DocumentModified {
//!         println!("document now at version {}", change.new_version);
//!     }
//! });
//!
//! doc.insert_text(5, "!");
//! assert!(doc.is_modified());
//! assert_eq!(doc.text(), "draft!");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope based text storage and offset/position mapping
//! - [`position`] - Character ranges and `"L.C"` position notation
//! - [`tags`] - Attribute payloads, canonical tag names, render styles
//! - [`overlay`] - Per-tag range sets kept sorted, disjoint, and coalesced
//! - [`comments`] - Margin comment records with edit-tracking anchors
//! - [`document`] - Document state, edits, selection, change notifications
//! - [`debounce`] - Deadline debouncing for presentation refreshes
//! - [`error`] - Crate error type
//!
//! # Coordinate Model
//!
//! - Character offsets index Unicode scalar values, never bytes
//! - File positions use `"L.C"` notation: 1-based line, 0-based column
//! - A range end sitting past a line's newline is the next line's start

pub mod buffer;
mod codec;
pub mod comments;
pub mod debounce;
pub mod document;
pub mod error;
mod lineops;
pub mod overlay;
pub mod position;
mod styling;
pub mod tags;

pub use buffer::TextBuffer;
pub use codec::FILE_FORMAT_VERSION;
pub use comments::{Comment, PREVIEW_MAX_CHARS};
pub use debounce::{Debouncer, RELAYOUT_DELAY};
pub use document::{ChangeCallback, ChangeKind, DocChange, Document, PAGE_BREAK_TOKEN};
pub use error::DocError;
pub use lineops::BULLET_PREFIX;
pub use overlay::RangeOverlay;
pub use position::{CharRange, Position};
pub use tags::{
    Alignment, AttributePayload, COMMENT_ACTIVE_BACKGROUND, COMMENT_BACKGROUND,
    COMMENT_HIGHLIGHT_TAG, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontFacets, FontSpec,
    HeadingLevel, INDENT_STEP_PX, MAX_INDENT_LEVEL, RenderStyle, StyleMarker, TagEntry, TagId,
    TagKind, TagRegistry,
};
