//! Comment workflow example
//!
//! Demonstrates margin comments: adding, listing, highlighting, and how
//! anchors follow edits.

use richdoc_core::{CharRange, Document};
use std::sync::{Arc, Mutex};

fn main() {
    println!("=== Comment Workflow Example ===\n");

    let mut doc = Document::from_text("The launch window opens Friday.\nChecklist is in the wiki.");

    let change_count = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&change_count);
    doc.subscribe(move |change| {
        let mut count = counter.lock().unwrap();
        *count += 1;
        println!(
            "   change #{}: {:?} (version {} -> {})",
            count, change.kind, change.old_version, change.new_version
        );
    });

    println!("1. Adding comments:");
    // "Friday" sits at [24, 30); "wiki" at [52, 56).
    let a = doc.add_comment(CharRange::new(24, 30), "confirm with ops").unwrap();
    let b = doc
        .add_comment(CharRange::new(52, 56), "link it here\nsecond line of the note")
        .unwrap();

    println!("\n2. Listing:");
    for comment in doc.comments() {
        println!("   {}", comment.list_label());
    }

    println!("\n3. Highlighting {b}:");
    doc.highlight_comment(&b);
    println!("   highlighted: {:?}", doc.highlighted_comment());

    println!("\n4. Editing text before the anchors:");
    doc.insert_text(0, ">> ");
    let moved = doc.comment(&a).unwrap();
    println!("   {} anchor now {:?}", a, moved.anchor);

    println!("\n5. Editing and deleting:");
    doc.edit_comment(&a, "ops confirmed");
    println!("   {} text: {:?}", a, doc.comment(&a).unwrap().text);
    doc.delete_comment(&b);
    println!("   remaining comments: {}", doc.comments().len());

    println!("\n6. Total changes observed: {}", *change_count.lock().unwrap());
    println!("\n=== Done ===");
}
