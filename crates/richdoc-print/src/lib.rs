#![warn(missing_docs)]
//! Paginated HTML print rendering for `richdoc-core` documents.
//!
//! Produces a standalone HTML file that a browser prints straight to PDF:
//! each segment between page-break markers becomes one US-letter page
//! (`8.5in x 11in`, `1in` padding) with `page-break-after: always`. Text is
//! HTML-escaped and newlines become explicit `<br>` breaks, so the page
//! content is the document's plain text, not a styled re-rendering.

use std::fs;
use std::path::Path;

use richdoc_core::{DEFAULT_FONT_FAMILY, DocError, Document, PAGE_BREAK_TOKEN};

/// Render plain document text into the paginated print HTML.
///
/// The text is split on [`PAGE_BREAK_TOKEN`]; each part becomes one
/// `<div class="page">` block, in document order.
pub fn render_html(text: &str) -> String {
    let pages: String = text
        .split(PAGE_BREAK_TOKEN)
        .map(|part| {
            let safe = html_escape::encode_safe(part).replace('\n', "<br>\n");
            format!("<div class=\"page\">{safe}</div>")
        })
        .collect();

    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8"/>
<title>Export</title>
<style>
  body {{
    background:#f3f3f3;
    margin:0;
    padding:24px;
    font-family:{DEFAULT_FONT_FAMILY}, Arial, sans-serif;
  }}
  .page {{
    background:#fff;
    width:8.5in;
    min-height:11in;
    margin:0 auto 18px auto;
    padding:1in;
    box-shadow:0 2px 10px rgba(0,0,0,0.12);
    font-size:12pt;
    line-height:1.35;
    page-break-after: always;
  }}
  .page:last-child {{
    page-break-after: auto;
  }}
  @media print {{
    body {{ background:#fff; padding:0; }}
    .page {{ box-shadow:none; margin:0; width:auto; min-height:auto; padding:1in; }}
  }}
</style>
</head>
<body>
  {pages}
</body>
</html>
"#
    )
}

/// Render a document's current text into the print HTML.
pub fn render_document(doc: &Document) -> String {
    render_html(&doc.text())
}

/// Render a document and write the HTML to `path`.
///
/// The caller opens the file in a browser and prints it to PDF from there.
pub fn write_html(doc: &Document, path: impl AsRef<Path>) -> Result<(), DocError> {
    fs::write(path.as_ref(), render_document(doc))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_count(html: &str) -> usize {
        html.matches("<div class=\"page\">").count()
    }

    #[test]
    fn test_single_page_without_breaks() {
        let html = render_html("just one page");
        assert_eq!(page_count(&html), 1);
        assert!(html.contains("just one page"));
    }

    #[test]
    fn test_two_pages_in_document_order() {
        let mut doc = Document::from_text("page one page two");
        doc.insert_page_break(8);

        let html = render_document(&doc);
        assert_eq!(page_count(&html), 2);

        let first = html.find("page one").unwrap();
        let second = html.find("page two").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_markup_is_escaped() {
        let html = render_html("a <b>bold</b> claim & more");
        assert!(html.contains("a &lt;b&gt;bold&lt;/b&gt; claim &amp; more"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let html = render_html("line one\nline two");
        assert!(html.contains("line one<br>\nline two"));
    }

    #[test]
    fn test_print_stylesheet_present() {
        let html = render_html("x");
        assert!(html.contains("width:8.5in"));
        assert!(html.contains("min-height:11in"));
        assert!(html.contains("page-break-after: always"));
        assert!(html.contains("@media print"));
        assert!(html.contains(DEFAULT_FONT_FAMILY));
    }

    #[test]
    fn test_write_html_creates_file() {
        let dir = std::env::temp_dir().join("richdoc-print-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("export.html");

        let mut doc = Document::from_text("alpha\nbravo");
        doc.insert_page_break(5);
        write_html(&doc, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(page_count(&written), 2);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_document_still_renders_one_page() {
        let html = render_html("");
        assert_eq!(page_count(&html), 1);
    }
}
