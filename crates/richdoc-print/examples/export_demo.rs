//! Print export example
//!
//! Builds a two-page document and writes the print HTML next to the system
//! temp directory.

use richdoc_core::{CharRange, Document, HeadingLevel};
use richdoc_print::write_html;

fn main() {
    println!("=== Print Export Example ===\n");

    let mut doc = Document::from_text("Release Notes\nAll tests green.\nAppendix");
    doc.apply_heading(CharRange::new(0, 13), HeadingLevel::H1);
    doc.insert_page_break(30);

    let path = std::env::temp_dir().join("richdoc_export.html");
    write_html(&doc, &path).unwrap();

    println!("wrote {}", path.display());
    println!("open it in a browser and print to PDF (Ctrl+P)");
}
