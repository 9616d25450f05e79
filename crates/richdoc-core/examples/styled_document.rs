//! Styled document example
//!
//! Builds a small document, applies character and line formatting, and
//! prints the resulting tag runs and JSON.

use richdoc_core::{Alignment, CharRange, Document, HeadingLevel};

fn main() {
    println!("=== Styled Document Example ===\n");

    let mut doc = Document::from_text(
        "Team Update\nShipping moved to Thursday.\nBring questions to standup.",
    );

    println!("1. Heading and alignment:");
    doc.apply_heading(CharRange::new(0, 11), HeadingLevel::H1);
    doc.apply_alignment(CharRange::new(0, 11), Alignment::Center);
    println!("   line 0 tags: {:?}", doc.tag_names_at(3));

    println!("\n2. Character styling:");
    // "Thursday" sits at [30, 38).
    doc.toggle_bold(CharRange::new(30, 38)).unwrap();
    doc.apply_color(CharRange::new(30, 38), "#aa3311").unwrap();
    println!("   'Thursday' tags: {:?}", doc.tag_names_at(31));
    println!("   facets: {:?}", doc.font_facets_at(31));

    println!("\n3. Bullets and indent:");
    doc.toggle_bullets(CharRange::new(41, 41));
    doc.change_indent(CharRange::new(41, 41), 1);
    println!("   last line: {:?}", doc.line_text(2).unwrap());
    println!("   indent level: {}", doc.indent_level_at(doc.char_count() - 1));

    println!("\n4. Version and dirty state:");
    println!("   version: {}", doc.version());
    println!("   modified: {}", doc.is_modified());

    println!("\n5. Serialized form:");
    let json = doc.to_json().unwrap();
    for line in json.lines().take(12) {
        println!("   {line}");
    }
    println!("   ... ({} bytes total)", json.len());

    println!("\n=== Done ===");
}
