//! Attribute tags: payloads, canonical names, and the tag registry.
//!
//! Every styled range in a document is labeled with a [`TagId`]. The registry
//! maps each id to a canonical tag name, the [`AttributePayload`] the name
//! encodes, and a precomputed [`RenderStyle`] that frontends can apply
//! directly. Payloads are interned: one id exists per distinct payload, so
//! range bookkeeping never duplicates style data.
//!
//! Canonical names are stable and fully reversible. They are what the file
//! format stores, so two documents exchanging files agree on meaning without
//! sharing a registry:
//!
//! - `font_<family>_<size>_<bold|normal>_<italic|roman>_<0|1>` (spaces in the
//!   family become underscores)
//! - `color_<RRGGBB>`
//! - `indent_<level>` with level in `0..=12`
//! - `align_left` / `align_center` / `align_right`
//! - `h1` / `h2`
//! - `comment`
//! - `style_bold` / `style_italic` / `style_underline`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Font family used when no composite font tag covers a position.
pub const DEFAULT_FONT_FAMILY: &str = "Segoe UI";

/// Font size (in points) used when no composite font tag covers a position.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Horizontal pixels of left margin added per indent level.
pub const INDENT_STEP_PX: u32 = 28;

/// Largest indent level a line can carry.
pub const MAX_INDENT_LEVEL: u8 = 12;

/// Background color of committed comment ranges.
pub const COMMENT_BACKGROUND: &str = "#fff2cc";

/// Background color of the actively highlighted comment range.
pub const COMMENT_ACTIVE_BACKGROUND: &str = "#ffe599";

/// Name of the session-local tag marking the actively highlighted comment.
///
/// This tag is transient: it carries no payload and is never written to disk.
pub const COMMENT_HIGHLIGHT_TAG: &str = "comment_selected";

static COLOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^color_([0-9A-Fa-f]{6})$").expect("valid color tag regex"));
static INDENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^indent_(\d{1,2})$").expect("valid indent tag regex"));

/// Opaque handle to a registered tag.
///
/// Ids are dense indexes assigned in intern order and are only meaningful
/// within the [`TagRegistry`] that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(pub u32);

impl TagId {
    /// Create a tag id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The full set of font facets a run of text can carry.
///
/// A single record captures family, size, and the three boolean facets, so
/// any combination is exactly one tag. Toggling one facet reads the current
/// record, flips the field, and swaps the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFacets {
    /// Font family name.
    pub family: String,
    /// Font size in points.
    pub size: u32,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
}

impl Default for FontFacets {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Ragged-right text.
    Left,
    /// Centered text.
    Center,
    /// Ragged-left text.
    Right,
}

impl Alignment {
    fn name_fragment(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    /// Top-level heading.
    H1,
    /// Second-level heading.
    H2,
}

/// Boolean style facet mirrored by a marker tag.
///
/// Marker tags carry no rendering of their own; they exist so facet state can
/// be sampled at a position without decoding composite font names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleMarker {
    /// Mirrors the bold facet.
    Bold,
    /// Mirrors the italic facet.
    Italic,
    /// Mirrors the underline facet.
    Underline,
}

impl StyleMarker {
    fn name_fragment(self) -> &'static str {
        match self {
            StyleMarker::Bold => "bold",
            StyleMarker::Italic => "italic",
            StyleMarker::Underline => "underline",
        }
    }
}

/// Broad classification of a tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Composite font record.
    CompositeFont,
    /// Foreground text color.
    Color,
    /// Line indent level.
    Indent,
    /// Paragraph alignment.
    Align,
    /// Heading style.
    Heading,
    /// Comment anchor highlight.
    Comment,
    /// Boolean facet marker.
    StyleMarker,
}

/// The meaning a tag name encodes.
///
/// Serialized alongside the tag name in document files so readers do not have
/// to reverse-engineer names, while the names keep older readers working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributePayload {
    /// A full font record: family, size, and boolean facets.
    #[serde(rename = "composite_font")]
    Font(FontFacets),
    /// Foreground color as six hex digits without the leading `#`.
    Color {
        /// Six hex digits, `RRGGBB`.
        hex: String,
    },
    /// Indent level for whole lines.
    Indent {
        /// Level in `0..=MAX_INDENT_LEVEL`.
        level: u8,
    },
    /// Paragraph alignment for whole lines.
    Align {
        /// The alignment.
        align: Alignment,
    },
    /// Heading style for whole lines.
    Heading {
        /// The heading level.
        level: HeadingLevel,
    },
    /// Comment anchor highlight.
    Comment,
    /// Boolean facet marker mirroring part of a composite font.
    #[serde(rename = "style_marker")]
    Marker {
        /// Which facet this marker mirrors.
        marker: StyleMarker,
    },
}

impl AttributePayload {
    /// Classify this payload.
    pub fn kind(&self) -> TagKind {
        match self {
            AttributePayload::Font(_) => TagKind::CompositeFont,
            AttributePayload::Color { .. } => TagKind::Color,
            AttributePayload::Indent { .. } => TagKind::Indent,
            AttributePayload::Align { .. } => TagKind::Align,
            AttributePayload::Heading { .. } => TagKind::Heading,
            AttributePayload::Comment => TagKind::Comment,
            AttributePayload::Marker { .. } => TagKind::StyleMarker,
        }
    }

    /// Render the canonical tag name for this payload.
    pub fn canonical_name(&self) -> String {
        match self {
            AttributePayload::Font(f) => format!(
                "font_{}_{}_{}_{}_{}",
                f.family.replace(' ', "_"),
                f.size,
                if f.bold { "bold" } else { "normal" },
                if f.italic { "italic" } else { "roman" },
                u8::from(f.underline),
            ),
            AttributePayload::Color { hex } => format!("color_{hex}"),
            AttributePayload::Indent { level } => format!("indent_{level}"),
            AttributePayload::Align { align } => format!("align_{}", align.name_fragment()),
            AttributePayload::Heading { level } => match level {
                HeadingLevel::H1 => "h1".to_string(),
                HeadingLevel::H2 => "h2".to_string(),
            },
            AttributePayload::Comment => "comment".to_string(),
            AttributePayload::Marker { marker } => format!("style_{}", marker.name_fragment()),
        }
    }

    /// Parse a canonical tag name back into its payload.
    ///
    /// Returns `None` for names outside the grammar, including indent levels
    /// past [`MAX_INDENT_LEVEL`]. This is the exact inverse of
    /// [`AttributePayload::canonical_name`].
    pub fn parse_name(name: &str) -> Option<Self> {
        match name {
            "h1" => {
                return Some(AttributePayload::Heading {
                    level: HeadingLevel::H1,
                });
            }
            "h2" => {
                return Some(AttributePayload::Heading {
                    level: HeadingLevel::H2,
                });
            }
            "align_left" => {
                return Some(AttributePayload::Align {
                    align: Alignment::Left,
                });
            }
            "align_center" => {
                return Some(AttributePayload::Align {
                    align: Alignment::Center,
                });
            }
            "align_right" => {
                return Some(AttributePayload::Align {
                    align: Alignment::Right,
                });
            }
            "comment" => return Some(AttributePayload::Comment),
            "style_bold" => {
                return Some(AttributePayload::Marker {
                    marker: StyleMarker::Bold,
                });
            }
            "style_italic" => {
                return Some(AttributePayload::Marker {
                    marker: StyleMarker::Italic,
                });
            }
            "style_underline" => {
                return Some(AttributePayload::Marker {
                    marker: StyleMarker::Underline,
                });
            }
            _ => {}
        }

        if let Some(rest) = name.strip_prefix("font_") {
            return parse_font_name(rest).map(AttributePayload::Font);
        }
        if let Some(caps) = COLOR_NAME.captures(name) {
            return Some(AttributePayload::Color {
                hex: caps[1].to_string(),
            });
        }
        if let Some(caps) = INDENT_NAME.captures(name) {
            let level: u8 = caps[1].parse().ok()?;
            if level > MAX_INDENT_LEVEL {
                return None;
            }
            return Some(AttributePayload::Indent { level });
        }

        None
    }

    /// Compute the render style frontends should apply for this payload.
    pub fn render_style(&self) -> RenderStyle {
        let mut style = RenderStyle::default();
        match self {
            AttributePayload::Font(f) => {
                style.font = Some(FontSpec {
                    family: f.family.clone(),
                    size: f.size,
                    bold: f.bold,
                    italic: f.italic,
                });
                style.underline = f.underline;
            }
            AttributePayload::Color { hex } => {
                style.foreground = Some(format!("#{hex}"));
            }
            AttributePayload::Indent { level } => {
                style.left_margin_px = Some(u32::from(*level) * INDENT_STEP_PX);
            }
            AttributePayload::Align { align } => {
                style.justify = Some(*align);
            }
            AttributePayload::Heading { level } => {
                let (size, spacing) = match level {
                    HeadingLevel::H1 => (22, 10),
                    HeadingLevel::H2 => (16, 8),
                };
                style.font = Some(FontSpec {
                    family: DEFAULT_FONT_FAMILY.to_string(),
                    size,
                    bold: true,
                    italic: false,
                });
                style.spacing_above_px = Some(spacing);
                style.spacing_below_px = Some(spacing);
            }
            AttributePayload::Comment => {
                style.background = Some(COMMENT_BACKGROUND.to_string());
            }
            AttributePayload::Marker { .. } => {}
        }
        style
    }
}

fn parse_font_name(rest: &str) -> Option<FontFacets> {
    let parts: Vec<&str> = rest.split('_').collect();
    if parts.len() < 5 {
        return None;
    }

    let n = parts.len();
    let underline = match parts[n - 1] {
        "0" => false,
        "1" => true,
        _ => return None,
    };
    let italic = match parts[n - 2] {
        "italic" => true,
        "roman" => false,
        _ => return None,
    };
    let bold = match parts[n - 3] {
        "bold" => true,
        "normal" => false,
        _ => return None,
    };
    let size: u32 = parts[n - 4].parse().ok()?;
    let family = parts[..n - 4].join(" ");
    if family.is_empty() {
        return None;
    }

    Some(FontFacets {
        family,
        size,
        bold,
        italic,
        underline,
    })
}

/// Concrete font request inside a [`RenderStyle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    /// Font family name.
    pub family: String,
    /// Font size in points.
    pub size: u32,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
}

/// Visual properties a frontend applies for one tag.
///
/// `None` fields leave the corresponding property untouched, so styles from
/// overlapping tags compose by layering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStyle {
    /// Font override, if any.
    pub font: Option<FontSpec>,
    /// Underline decoration.
    pub underline: bool,
    /// Foreground color as `#RRGGBB`.
    pub foreground: Option<String>,
    /// Background color as `#RRGGBB`.
    pub background: Option<String>,
    /// Left margin in pixels (whole-line property).
    pub left_margin_px: Option<u32>,
    /// Paragraph justification (whole-line property).
    pub justify: Option<Alignment>,
    /// Extra spacing above the paragraph in pixels.
    pub spacing_above_px: Option<u32>,
    /// Extra spacing below the paragraph in pixels.
    pub spacing_below_px: Option<u32>,
}

/// One registered tag: its canonical name, payload, and render style.
#[derive(Debug, Clone)]
pub struct TagEntry {
    /// Canonical tag name (registry key).
    pub name: String,
    /// Decoded payload, or `None` for transient session-local tags.
    pub payload: Option<AttributePayload>,
    /// Precomputed render style.
    pub style: RenderStyle,
}

/// Interning registry mapping tag names to dense [`TagId`]s.
///
/// Interning the same payload twice yields the same id, so equality of ids is
/// equality of meaning within one registry.
pub struct TagRegistry {
    /// Entries indexed by `TagId`.
    entries: Vec<TagEntry>,
    /// Canonical name to id map.
    by_name: HashMap<String, TagId>,
}

impl TagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Intern a payload, returning the id of its canonical tag.
    pub fn intern(&mut self, payload: AttributePayload) -> TagId {
        let name = payload.canonical_name();
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }

        let id = TagId(self.entries.len() as u32);
        let style = payload.render_style();
        self.entries.push(TagEntry {
            name: name.clone(),
            payload: Some(payload),
            style,
        });
        self.by_name.insert(name, id);
        id
    }

    /// Intern a session-local tag that carries only a render style.
    ///
    /// Transient tags are skipped by the file codec. Interning a name that
    /// already exists returns the existing id unchanged.
    pub fn intern_transient(&mut self, name: &str, style: RenderStyle) -> TagId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = TagId(self.entries.len() as u32);
        self.entries.push(TagEntry {
            name: name.to_string(),
            payload: None,
            style,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up the id for a canonical name, interning it if the name parses.
    ///
    /// Returns `None` for names outside the tag grammar.
    pub fn resolve_name(&mut self, name: &str) -> Option<TagId> {
        if let Some(&id) = self.by_name.get(name) {
            return Some(id);
        }
        AttributePayload::parse_name(name).map(|payload| self.intern(payload))
    }

    /// Get the id for an already-registered name.
    pub fn id(&self, name: &str) -> Option<TagId> {
        self.by_name.get(name).copied()
    }

    /// Get the entry for an id.
    pub fn get(&self, id: TagId) -> Option<&TagEntry> {
        self.entries.get(id.0 as usize)
    }

    /// Get the canonical name for an id.
    pub fn name(&self, id: TagId) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    /// Get the payload for an id (`None` for transient tags).
    pub fn payload(&self, id: TagId) -> Option<&AttributePayload> {
        self.get(id).and_then(|entry| entry.payload.as_ref())
    }

    /// Get the render style for an id.
    pub fn style(&self, id: TagId) -> Option<&RenderStyle> {
        self.get(id).map(|entry| &entry.style)
    }

    /// Classify an id, or `None` for transient tags and unknown ids.
    pub fn kind(&self, id: TagId) -> Option<TagKind> {
        self.payload(id).map(AttributePayload::kind)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &TagEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (TagId(idx as u32), entry))
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facets(family: &str, size: u32, bold: bool, italic: bool, underline: bool) -> FontFacets {
        FontFacets {
            family: family.to_string(),
            size,
            bold,
            italic,
            underline,
        }
    }

    #[test]
    fn test_font_canonical_name() {
        let payload = AttributePayload::Font(facets("Segoe UI", 12, true, false, true));
        assert_eq!(payload.canonical_name(), "font_Segoe_UI_12_bold_roman_1");

        let payload = AttributePayload::Font(facets("Arial", 9, false, true, false));
        assert_eq!(payload.canonical_name(), "font_Arial_9_normal_italic_0");
    }

    #[test]
    fn test_font_name_parse() {
        let parsed = AttributePayload::parse_name("font_Segoe_UI_12_bold_roman_1").unwrap();
        assert_eq!(
            parsed,
            AttributePayload::Font(facets("Segoe UI", 12, true, false, true))
        );
    }

    #[test]
    fn test_font_name_rejects_malformed() {
        assert_eq!(AttributePayload::parse_name("font_12_bold_roman_0"), None);
        assert_eq!(
            AttributePayload::parse_name("font_Arial_big_bold_roman_0"),
            None
        );
        assert_eq!(
            AttributePayload::parse_name("font_Arial_12_heavy_roman_0"),
            None
        );
        assert_eq!(
            AttributePayload::parse_name("font_Arial_12_bold_oblique_0"),
            None
        );
        assert_eq!(
            AttributePayload::parse_name("font_Arial_12_bold_roman_2"),
            None
        );
    }

    #[test]
    fn test_color_and_indent_names() {
        assert_eq!(
            AttributePayload::parse_name("color_1a2B3c"),
            Some(AttributePayload::Color {
                hex: "1a2B3c".to_string()
            })
        );
        assert_eq!(AttributePayload::parse_name("color_12345"), None);
        assert_eq!(AttributePayload::parse_name("color_GGGGGG"), None);

        assert_eq!(
            AttributePayload::parse_name("indent_3"),
            Some(AttributePayload::Indent { level: 3 })
        );
        assert_eq!(
            AttributePayload::parse_name("indent_12"),
            Some(AttributePayload::Indent { level: 12 })
        );
        assert_eq!(AttributePayload::parse_name("indent_13"), None);
        assert_eq!(AttributePayload::parse_name("indent_x"), None);
    }

    #[test]
    fn test_literal_names() {
        for name in [
            "h1",
            "h2",
            "align_left",
            "align_center",
            "align_right",
            "comment",
            "style_bold",
            "style_italic",
            "style_underline",
        ] {
            let payload = AttributePayload::parse_name(name)
                .unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(payload.canonical_name(), name);
        }
        assert_eq!(AttributePayload::parse_name("bogus"), None);
        assert_eq!(AttributePayload::parse_name("style_loud"), None);
    }

    #[test]
    fn test_name_round_trip() {
        let payloads = [
            AttributePayload::Font(facets("Segoe UI", 12, false, false, false)),
            AttributePayload::Font(facets("Courier New", 14, true, true, true)),
            AttributePayload::Color {
                hex: "FF0000".to_string(),
            },
            AttributePayload::Indent { level: 0 },
            AttributePayload::Indent { level: 12 },
            AttributePayload::Align {
                align: Alignment::Center,
            },
            AttributePayload::Heading {
                level: HeadingLevel::H2,
            },
            AttributePayload::Comment,
            AttributePayload::Marker {
                marker: StyleMarker::Underline,
            },
        ];

        for payload in payloads {
            let name = payload.canonical_name();
            assert_eq!(AttributePayload::parse_name(&name), Some(payload), "{name}");
        }
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut registry = TagRegistry::new();

        let a = registry.intern(AttributePayload::Comment);
        let b = registry.intern(AttributePayload::Comment);
        let c = registry.intern(AttributePayload::Indent { level: 2 });

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name(a), Some("comment"));
        assert_eq!(registry.id("indent_2"), Some(c));
    }

    #[test]
    fn test_transient_tag_has_no_payload() {
        let mut registry = TagRegistry::new();

        let style = RenderStyle {
            background: Some(COMMENT_ACTIVE_BACKGROUND.to_string()),
            ..RenderStyle::default()
        };
        let id = registry.intern_transient(COMMENT_HIGHLIGHT_TAG, style.clone());

        assert_eq!(registry.payload(id), None);
        assert_eq!(registry.style(id), Some(&style));
        assert_eq!(registry.kind(id), None);
        assert_eq!(
            registry.intern_transient(COMMENT_HIGHLIGHT_TAG, RenderStyle::default()),
            id
        );
    }

    #[test]
    fn test_resolve_name() {
        let mut registry = TagRegistry::new();

        let id = registry.resolve_name("font_Arial_10_normal_roman_0").unwrap();
        assert_eq!(
            registry.payload(id),
            Some(&AttributePayload::Font(facets(
                "Arial", 10, false, false, false
            )))
        );
        assert_eq!(registry.resolve_name("font_Arial_10_normal_roman_0"), Some(id));
        assert_eq!(registry.resolve_name("not_a_tag"), None);
    }

    #[test]
    fn test_render_style_indent_margin() {
        let style = AttributePayload::Indent { level: 3 }.render_style();
        assert_eq!(style.left_margin_px, Some(3 * INDENT_STEP_PX));
        assert_eq!(style.font, None);
    }

    #[test]
    fn test_render_style_headings() {
        let h1 = AttributePayload::Heading {
            level: HeadingLevel::H1,
        }
        .render_style();
        let font = h1.font.unwrap();
        assert_eq!(font.size, 22);
        assert!(font.bold);
        assert_eq!(h1.spacing_above_px, Some(10));

        let h2 = AttributePayload::Heading {
            level: HeadingLevel::H2,
        }
        .render_style();
        assert_eq!(h2.font.unwrap().size, 16);
        assert_eq!(h2.spacing_below_px, Some(8));
    }

    #[test]
    fn test_render_style_font_and_color() {
        let style = AttributePayload::Font(facets("Georgia", 14, false, true, true)).render_style();
        let font = style.font.unwrap();
        assert_eq!(font.family, "Georgia");
        assert!(font.italic);
        assert!(style.underline);

        let style = AttributePayload::Color {
            hex: "00Af00".to_string(),
        }
        .render_style();
        assert_eq!(style.foreground.as_deref(), Some("#00Af00"));

        let style = AttributePayload::Comment.render_style();
        assert_eq!(style.background.as_deref(), Some(COMMENT_BACKGROUND));

        let style = AttributePayload::Marker {
            marker: StyleMarker::Bold,
        }
        .render_style();
        assert_eq!(style, RenderStyle::default());
    }

    #[test]
    fn test_payload_serde_shape() {
        let payload = AttributePayload::Font(facets("Segoe UI", 12, true, false, false));
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""kind":"composite_font""#));
        assert!(json.contains(r#""family":"Segoe UI""#));

        let back: AttributePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);

        let comment: AttributePayload = serde_json::from_str(r#"{"kind":"comment"}"#).unwrap();
        assert_eq!(comment, AttributePayload::Comment);

        let marker: AttributePayload =
            serde_json::from_str(r#"{"kind":"style_marker","marker":"italic"}"#).unwrap();
        assert_eq!(
            marker,
            AttributePayload::Marker {
                marker: StyleMarker::Italic
            }
        );
    }
}
