//! File persistence example
//!
//! Saves a styled document, reopens it, and shows the debouncer pattern a
//! frontend would use to coalesce relayout work.

use richdoc_core::{CharRange, Debouncer, Document, FILE_FORMAT_VERSION};
use std::time::Duration;

fn main() {
    println!("=== File Persistence Example ===\n");
    println!("file format version: {FILE_FORMAT_VERSION}");

    let mut doc = Document::from_text("Saved notes\nwith styling intact");
    doc.toggle_bold(CharRange::new(0, 5)).unwrap();
    doc.apply_color(CharRange::new(17, 24), "#228833").unwrap();
    doc.add_comment(CharRange::new(12, 16), "double check").unwrap();

    let path = std::env::temp_dir().join("richdoc_demo.rdoc");

    println!("\n1. Saving to {}", path.display());
    doc.save_to(&path).unwrap();
    println!("   modified after save: {}", doc.is_modified());

    println!("\n2. Reopening:");
    let reopened = Document::open_from(&path).unwrap();
    println!("   text: {:?}", reopened.text());
    println!("   tags at 2: {:?}", reopened.tag_names_at(2));
    println!("   comments: {}", reopened.comments().len());

    println!("\n3. Debounced relayout:");
    let mut debouncer = Debouncer::new(Duration::from_millis(30));
    let mut doc = reopened;

    // A burst of edits arms the debouncer once per keystroke.
    for (i, ch) in ["a", "b", "c"].iter().enumerate() {
        doc.insert_text(i, ch);
        debouncer.schedule();
        println!("   edit {:?} -> relayout pending: {}", ch, debouncer.is_armed());
    }

    std::thread::sleep(Duration::from_millis(40));
    if debouncer.poll() {
        println!("   quiet period elapsed, one relayout for three edits");
    }

    std::fs::remove_file(&path).ok();
    println!("\n=== Done ===");
}
