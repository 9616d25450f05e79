//! Version tracking, dirty state, and change notifications.

use std::sync::{Arc, Mutex};

use richdoc_core::{Alignment, ChangeKind, CharRange, DocChange, Document};

fn record_changes(doc: &mut Document) -> Arc<Mutex<Vec<DocChange>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    doc.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
    seen
}

#[test]
fn test_every_mutation_bumps_the_version_once() {
    let mut doc = Document::from_text("alpha bravo\ncharlie");
    assert_eq!(doc.version(), 0);

    doc.insert_text(5, "!");
    assert_eq!(doc.version(), 1);

    doc.delete_range(CharRange::new(5, 6));
    assert_eq!(doc.version(), 2);

    doc.toggle_bold(CharRange::new(0, 5)).unwrap();
    assert_eq!(doc.version(), 3);

    doc.apply_alignment(CharRange::new(0, 3), Alignment::Center);
    assert_eq!(doc.version(), 4);

    let id = doc.add_comment(CharRange::new(6, 11), "note").unwrap();
    assert_eq!(doc.version(), 5);

    // Highlighting is presentation-only.
    doc.highlight_comment(&id);
    doc.clear_comment_highlight();
    assert_eq!(doc.version(), 5);
}

#[test]
fn test_notifications_carry_version_pair_and_region() {
    let mut doc = Document::from_text("alpha");
    let seen = record_changes(&mut doc);

    doc.insert_text(2, "xyz");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let change = &seen[0];
    assert_eq!(change.kind, ChangeKind::DocumentModified);
    assert_eq!(change.old_version, 0);
    assert_eq!(change.new_version, 1);
    assert_eq!(change.affected_region, Some(CharRange::new(2, 5)));
}

#[test]
fn test_presentation_changes_do_not_dirty() {
    let mut doc = Document::from_text("alpha bravo");
    let id = doc.add_comment(CharRange::new(0, 5), "note").unwrap();

    let dir = std::env::temp_dir().join("richdoc-state-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("doc.rdoc");
    doc.save_to(&path).unwrap();
    assert!(!doc.is_modified());

    doc.highlight_comment(&id);
    doc.clear_comment_highlight();
    assert!(!doc.is_modified());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_caret_crossing_style_boundary_notifies() {
    let mut doc = Document::from_text("alpha bravo");
    doc.toggle_bold(CharRange::new(0, 5)).unwrap();
    doc.set_cursor(8);

    let seen = record_changes(&mut doc);

    doc.set_cursor(3);
    doc.set_cursor(4);
    doc.set_cursor(9);

    let kinds: Vec<ChangeKind> = seen.lock().unwrap().iter().map(|c| c.kind).collect();
    // Entering the bold run fires, moving within it does not, leaving fires.
    assert_eq!(
        kinds,
        vec![ChangeKind::CaretStyleChanged, ChangeKind::CaretStyleChanged]
    );
}

#[test]
fn test_reset_replaces_document() {
    let mut doc = Document::from_text("alpha bravo");
    doc.toggle_bold(CharRange::new(0, 5)).unwrap();
    doc.add_comment(CharRange::new(6, 11), "note").unwrap();
    let version_before = doc.version();

    let seen = record_changes(&mut doc);
    doc.reset();

    assert_eq!(doc.text(), "");
    assert!(doc.overlay().is_empty());
    assert!(doc.comments().is_empty());
    assert!(!doc.is_modified());
    assert!(doc.version() > version_before);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ChangeKind::DocumentReplaced);
}

#[test]
fn test_has_changed_since() {
    let mut doc = Document::from_text("alpha");
    let checkpoint = doc.version();
    assert!(!doc.has_changed_since(checkpoint));

    doc.insert_text(0, "x");
    assert!(doc.has_changed_since(checkpoint));
    assert!(!doc.has_changed_since(doc.version()));
}

#[test]
fn test_selection_normalizes_and_falls_back_to_caret() {
    let mut doc = Document::from_text("alpha bravo");

    doc.set_selection(Some(CharRange::new(9, 3)));
    assert_eq!(doc.selection(), Some(CharRange::new(3, 9)));

    // Empty and out-of-range selections collapse away.
    doc.set_selection(Some(CharRange::new(4, 4)));
    assert_eq!(doc.selection(), None);

    doc.set_cursor(7);
    assert_eq!(doc.selection_or_cursor(), CharRange::empty_at(7));
}

#[test]
fn test_multiple_subscribers_all_fire() {
    let mut doc = Document::from_text("alpha");
    let first = record_changes(&mut doc);
    let second = record_changes(&mut doc);

    doc.insert_text(0, "x");

    assert_eq!(first.lock().unwrap().len(), 1);
    assert_eq!(second.lock().unwrap().len(), 1);
}
