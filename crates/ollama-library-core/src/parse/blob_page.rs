//! Blob content pages.

use crate::markup::{Document, MarkupNode};

/// Raw text of the first `<pre>` block, whitespace preserved.
pub fn parse_blob_content_page(markup: &str) -> Option<String> {
    Document::parse(markup)
        .root()
        .select_first("pre")
        .map(|pre| pre.raw_text())
}
