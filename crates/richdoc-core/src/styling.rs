//! Character styling operations: composite fonts, facet toggles, and colors.
//!
//! Font state is a single composite record per run of text, not a pile of
//! independent boolean tags. Toggling a facet samples the record at the
//! selection start, flips one field, and rewrites the selection with the
//! resulting record, so at most one composite font tag covers any character.
//! Marker tags mirror the boolean facets over exactly the same ranges to keep
//! facet sampling cheap.

use crate::document::{ChangeKind, Document};
use crate::error::DocError;
use crate::position::CharRange;
use crate::tags::{AttributePayload, FontFacets, StyleMarker, TagId, TagKind};

impl Document {
    /// Effective font facets at a character offset.
    ///
    /// Family and size come from the composite font tag covering `offset`
    /// (falling back to the document defaults); the boolean facets come from
    /// the marker tags, which the styling operations keep aligned with the
    /// composite records.
    pub fn font_facets_at(&self, offset: usize) -> FontFacets {
        let mut facets = FontFacets::default();
        for id in self.overlay().tags_at(offset) {
            if let Some(AttributePayload::Font(f)) = self.registry().payload(id) {
                facets.family = f.family.clone();
                facets.size = f.size;
            }
        }
        facets.bold = self.has_marker_at(StyleMarker::Bold, offset);
        facets.italic = self.has_marker_at(StyleMarker::Italic, offset);
        facets.underline = self.has_marker_at(StyleMarker::Underline, offset);
        facets
    }

    fn has_marker_at(&self, marker: StyleMarker, offset: usize) -> bool {
        let name = AttributePayload::Marker { marker }.canonical_name();
        match self.registry().id(&name) {
            Some(id) => self.overlay().contains(id, offset),
            None => false,
        }
    }

    /// Set the font family and size over a range, keeping the boolean facets
    /// sampled at the range start.
    pub fn apply_font(
        &mut self,
        range: CharRange,
        family: &str,
        size: u32,
    ) -> Result<(), DocError> {
        let range = self.validated_range(range)?;
        let mut facets = self.font_facets_at(range.start);
        facets.family = family.to_string();
        facets.size = size;
        self.apply_facets(range, facets);
        Ok(())
    }

    /// Toggle bold over a range, based on the state at the range start.
    pub fn toggle_bold(&mut self, range: CharRange) -> Result<(), DocError> {
        let range = self.validated_range(range)?;
        let mut facets = self.font_facets_at(range.start);
        facets.bold = !facets.bold;
        self.apply_facets(range, facets);
        Ok(())
    }

    /// Toggle italic over a range, based on the state at the range start.
    pub fn toggle_italic(&mut self, range: CharRange) -> Result<(), DocError> {
        let range = self.validated_range(range)?;
        let mut facets = self.font_facets_at(range.start);
        facets.italic = !facets.italic;
        self.apply_facets(range, facets);
        Ok(())
    }

    /// Toggle underline over a range, based on the state at the range start.
    pub fn toggle_underline(&mut self, range: CharRange) -> Result<(), DocError> {
        let range = self.validated_range(range)?;
        let mut facets = self.font_facets_at(range.start);
        facets.underline = !facets.underline;
        self.apply_facets(range, facets);
        Ok(())
    }

    /// Rewrite a range to carry exactly one composite font record.
    ///
    /// Every composite font tag and marker tag is cleared from the range
    /// first, so partially overlapped runs are clipped rather than stacked.
    fn apply_facets(&mut self, range: CharRange, facets: FontFacets) {
        let composites: Vec<TagId> = self
            .overlay()
            .tags()
            .filter(|&id| self.registry().kind(id) == Some(TagKind::CompositeFont))
            .collect();

        let bold = self.intern(AttributePayload::Marker {
            marker: StyleMarker::Bold,
        });
        let italic = self.intern(AttributePayload::Marker {
            marker: StyleMarker::Italic,
        });
        let underline = self.intern(AttributePayload::Marker {
            marker: StyleMarker::Underline,
        });

        for id in composites {
            self.overlay_mut().remove(id, range);
        }
        for id in [bold, italic, underline] {
            self.overlay_mut().remove(id, range);
        }

        let font = self.intern(AttributePayload::Font(facets.clone()));
        self.overlay_mut().add(font, range);
        if facets.bold {
            self.overlay_mut().add(bold, range);
        }
        if facets.italic {
            self.overlay_mut().add(italic, range);
        }
        if facets.underline {
            self.overlay_mut().add(underline, range);
        }

        self.after_mutation(ChangeKind::StyleChanged, Some(range));
    }

    /// Set the foreground color over a range.
    ///
    /// Accepts `RRGGBB` with or without a leading `#`. Any other color tag
    /// coverage inside the range is replaced.
    pub fn apply_color(&mut self, range: CharRange, color: &str) -> Result<(), DocError> {
        let range = self.validated_range(range)?;
        let hex = normalize_color(color)?;

        let colors: Vec<TagId> = self
            .overlay()
            .tags()
            .filter(|&id| self.registry().kind(id) == Some(TagKind::Color))
            .collect();
        for id in colors {
            self.overlay_mut().remove(id, range);
        }

        let tag = self.intern(AttributePayload::Color { hex });
        self.overlay_mut().add(tag, range);
        self.after_mutation(ChangeKind::StyleChanged, Some(range));
        Ok(())
    }
}

fn normalize_color(color: &str) -> Result<String, DocError> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(hex.to_string())
    } else {
        Err(DocError::InvalidColor(color.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

    fn composite_names_at(doc: &Document, offset: usize) -> Vec<String> {
        doc.tags_at(offset)
            .into_iter()
            .filter(|&id| doc.registry().kind(id) == Some(TagKind::CompositeFont))
            .map(|id| doc.registry().name(id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_toggle_bold() {
        let mut doc = Document::from_text("Hello World");
        doc.toggle_bold(CharRange::new(0, 5)).unwrap();

        let facets = doc.font_facets_at(2);
        assert!(facets.bold);
        assert_eq!(facets.family, DEFAULT_FONT_FAMILY);
        assert_eq!(facets.size, DEFAULT_FONT_SIZE);

        assert_eq!(
            composite_names_at(&doc, 2),
            vec!["font_Segoe_UI_12_bold_roman_0".to_string()]
        );
        assert!(doc.tag_names_at(2).contains(&"style_bold".to_string()));
        assert!(!doc.font_facets_at(7).bold);
    }

    #[test]
    fn test_toggle_twice_restores_plain() {
        let mut doc = Document::from_text("Hello World");
        doc.toggle_bold(CharRange::new(0, 5)).unwrap();
        doc.toggle_bold(CharRange::new(0, 5)).unwrap();

        let facets = doc.font_facets_at(2);
        assert!(!facets.bold);
        assert_eq!(
            composite_names_at(&doc, 2),
            vec!["font_Segoe_UI_12_normal_roman_0".to_string()]
        );
        assert!(!doc.tag_names_at(2).contains(&"style_bold".to_string()));
    }

    #[test]
    fn test_overlapping_toggles_keep_one_composite_per_char() {
        let mut doc = Document::from_text("abcdefghijklmnop");
        doc.toggle_bold(CharRange::new(0, 10)).unwrap();
        doc.toggle_italic(CharRange::new(5, 15)).unwrap();

        // The italic toggle sampled bold at offset 5, so two runs remain:
        // bold only, then bold+italic.
        assert_eq!(
            composite_names_at(&doc, 2),
            vec!["font_Segoe_UI_12_bold_roman_0".to_string()]
        );
        assert_eq!(
            composite_names_at(&doc, 7),
            vec!["font_Segoe_UI_12_bold_italic_0".to_string()]
        );
        assert_eq!(
            composite_names_at(&doc, 12),
            vec!["font_Segoe_UI_12_bold_italic_0".to_string()]
        );

        for offset in 0..15 {
            assert_eq!(composite_names_at(&doc, offset).len(), 1, "offset {offset}");
        }
    }

    #[test]
    fn test_markers_mirror_facets() {
        let mut doc = Document::from_text("abcdefghij");
        doc.toggle_bold(CharRange::new(0, 6)).unwrap();
        doc.toggle_underline(CharRange::new(3, 9)).unwrap();

        let facets = doc.font_facets_at(4);
        assert!(facets.bold);
        assert!(facets.underline);

        // The underline toggle sampled bold at offset 3, so [3, 9) is
        // uniformly bold+underline.
        assert!(doc.font_facets_at(8).bold);
        assert!(!doc.font_facets_at(1).underline);
    }

    #[test]
    fn test_apply_font_preserves_facets() {
        let mut doc = Document::from_text("Hello World");
        doc.toggle_bold(CharRange::new(0, 5)).unwrap();
        doc.apply_font(CharRange::new(0, 5), "Georgia", 18).unwrap();

        let facets = doc.font_facets_at(2);
        assert_eq!(facets.family, "Georgia");
        assert_eq!(facets.size, 18);
        assert!(facets.bold);
        assert_eq!(
            composite_names_at(&doc, 2),
            vec!["font_Georgia_18_bold_roman_0".to_string()]
        );
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut doc = Document::from_text("Hello");
        assert!(matches!(
            doc.toggle_bold(CharRange::new(3, 3)),
            Err(DocError::InvalidRange)
        ));
        assert!(matches!(
            doc.apply_font(CharRange::new(2, 2), "Georgia", 18),
            Err(DocError::InvalidRange)
        ));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_apply_color() {
        let mut doc = Document::from_text("Hello World");
        doc.apply_color(CharRange::new(0, 8), "#ff0000").unwrap();
        doc.apply_color(CharRange::new(4, 8), "00ff00").unwrap();

        let names = doc.tag_names_at(2);
        assert!(names.contains(&"color_ff0000".to_string()));

        let names = doc.tag_names_at(5);
        assert!(names.contains(&"color_00ff00".to_string()));
        assert!(!names.contains(&"color_ff0000".to_string()));
    }

    #[test]
    fn test_apply_color_rejects_garbage() {
        let mut doc = Document::from_text("Hello");
        assert!(matches!(
            doc.apply_color(CharRange::new(0, 5), "#ff00"),
            Err(DocError::InvalidColor(_))
        ));
        assert!(matches!(
            doc.apply_color(CharRange::new(0, 5), "not a color"),
            Err(DocError::InvalidColor(_))
        ));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_facets_straddling_boundary_become_uniform() {
        let mut doc = Document::from_text("abcdefghij");
        doc.toggle_bold(CharRange::new(0, 4)).unwrap();

        // Selection starts in the bold run: sampling at 2 sees bold, so the
        // whole selection flips to plain.
        doc.toggle_bold(CharRange::new(2, 8)).unwrap();

        assert!(doc.font_facets_at(1).bold);
        for offset in 2..8 {
            assert!(!doc.font_facets_at(offset).bold, "offset {offset}");
        }
    }
}
