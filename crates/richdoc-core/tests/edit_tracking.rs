//! Attribute ranges tracking text edits.
//!
//! Validation criteria:
//! 1. Typing inside a styled run extends it; typing at its edges does not.
//! 2. Deleting a gap between two runs of the same tag fuses them.
//! 3. Under random edit storms the styled set matches a flat per-character
//!    reference model.

use rand::Rng;
use richdoc_core::{CharRange, Document, PAGE_BREAK_TOKEN};

fn bold_at(doc: &Document, offset: usize) -> bool {
    doc.tag_names_at(offset).contains(&"style_bold".to_string())
}

#[test]
fn test_insert_inside_run_extends_it() {
    let mut doc = Document::from_text("alpha bravo");
    doc.toggle_bold(CharRange::new(0, 5)).unwrap();

    doc.insert_text(2, "XY");
    assert_eq!(doc.text(), "alXYpha bravo");
    for offset in 0..7 {
        assert!(bold_at(&doc, offset), "offset {offset}");
    }
    assert!(!bold_at(&doc, 7));
}

#[test]
fn test_insert_at_run_edges_stays_plain() {
    let mut doc = Document::from_text("alpha bravo");
    doc.toggle_bold(CharRange::new(2, 5)).unwrap();

    // At the start of the run.
    doc.insert_text(2, "x");
    assert!(!bold_at(&doc, 2));
    assert!(bold_at(&doc, 3));

    // At the end of the (shifted) run.
    doc.insert_text(6, "y");
    assert!(bold_at(&doc, 5));
    assert!(!bold_at(&doc, 6));
}

#[test]
fn test_delete_before_run_shifts_it() {
    let mut doc = Document::from_text("alpha bravo charlie");
    doc.toggle_bold(CharRange::new(6, 11)).unwrap();

    doc.delete_range(CharRange::new(0, 6));
    assert_eq!(doc.text(), "bravo charlie");
    assert!(bold_at(&doc, 0));
    assert!(bold_at(&doc, 4));
    assert!(!bold_at(&doc, 5));
}

#[test]
fn test_delete_gap_fuses_runs() {
    let mut doc = Document::from_text("aaa...bbb");
    doc.toggle_bold(CharRange::new(0, 3)).unwrap();
    doc.toggle_bold(CharRange::new(6, 9)).unwrap();

    doc.delete_range(CharRange::new(3, 6));
    assert_eq!(doc.text(), "aaabbb");

    let id = doc.registry().id("style_bold").unwrap();
    assert_eq!(doc.overlay().ranges_of(id), &[CharRange::new(0, 6)]);
}

#[test]
fn test_delete_swallowing_run_drops_it() {
    let mut doc = Document::from_text("alpha bravo charlie");
    doc.toggle_bold(CharRange::new(6, 11)).unwrap();

    doc.delete_range(CharRange::new(4, 13));
    let id = doc.registry().id("style_bold").unwrap();
    assert!(doc.overlay().ranges_of(id).is_empty());
}

#[test]
fn test_page_break_insertion_shifts_later_styles() {
    let mut doc = Document::from_text("page one page two");
    doc.toggle_bold(CharRange::new(9, 17)).unwrap();

    doc.insert_page_break(8);
    let expected = format!("page one\n{PAGE_BREAK_TOKEN}\n page two");
    assert_eq!(doc.text(), expected);

    let shift = PAGE_BREAK_TOKEN.chars().count() + 2;
    assert!(bold_at(&doc, 9 + shift));
    assert!(!bold_at(&doc, 8));
}

#[test]
fn test_random_edit_storm_matches_reference_model() {
    let text = "The five boxing wizards jump quickly over the lazy dog again. ".repeat(3);
    let mut doc = Document::from_text(&text);

    // Flat reference model: one bold flag per character.
    let mut model: Vec<bool> = vec![false; doc.char_count()];
    for range in [
        CharRange::new(10, 50),
        CharRange::new(60, 75),
        CharRange::new(100, 140),
    ] {
        doc.toggle_bold(range).unwrap();
        for flag in &mut model[range.start..range.end] {
            *flag = true;
        }
    }

    let mut rng = rand::thread_rng();
    for i in 0..200 {
        if rng.gen_bool(0.5) {
            let offset = rng.gen_range(0..=model.len());
            let insert: &str = if rng.gen_bool(0.5) { "x" } else { "yz" };

            // Inserted characters join a run only strictly inside it.
            let inside = offset > 0 && offset < model.len() && model[offset - 1] && model[offset];
            doc.insert_text(offset, insert);
            for _ in 0..insert.chars().count() {
                model.insert(offset, inside);
            }
        } else if model.len() > 4 {
            let start = rng.gen_range(0..model.len() - 1);
            let len = rng.gen_range(1..=3.min(model.len() - start));
            doc.delete_range(CharRange::new(start, start + len));
            model.drain(start..start + len);
        }

        if i % 25 == 24 {
            assert_eq!(doc.char_count(), model.len(), "length diverged at step {i}");
            for (offset, &flag) in model.iter().enumerate() {
                assert_eq!(bold_at(&doc, offset), flag, "step {i}, offset {offset}");
            }
        }
    }
}
