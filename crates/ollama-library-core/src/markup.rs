//! Markup access behind a small capability trait.
//!
//! Extractors are written against [`MarkupNode`] ("select by CSS", "get text",
//! "get attribute") rather than a concrete HTML library. [`Document`] provides
//! the `scraper`-backed implementation used for real pages.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Read-only view of one element in a parsed page.
pub trait MarkupNode: Clone {
    /// First descendant matching `selector`, in document order.
    fn select_first(&self, selector: &str) -> Option<Self>;

    /// All descendants matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// Text fragments, each trimmed, empty ones dropped, joined by `separator`.
    fn text_with_separator(&self, separator: &str) -> String;

    /// Text fragments trimmed and concatenated.
    fn text_content(&self) -> String {
        self.text_with_separator("")
    }

    /// Text exactly as it appears, whitespace preserved.
    fn raw_text(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool;

    /// Nearest ancestor (excluding self) matching `selector`.
    fn closest(&self, selector: &str) -> Option<Self>;

    /// Serialized markup of the element itself.
    fn outer_markup(&self) -> String;
}

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Root element of the page.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            warn!("Invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn select_first(&self, selector: &str) -> Option<Self> {
        let compiled = compile(selector)?;
        let found = self.select(&compiled).next();
        found
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        match compile(selector) {
            Some(compiled) => self.select(&compiled).collect(),
            None => Vec::new(),
        }
    }

    fn text_with_separator(&self, separator: &str) -> String {
        self.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn raw_text(&self) -> String {
        self.text().collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(|v| v.to_string())
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let compiled = compile(selector)?;
        let found = self
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| compiled.matches(ancestor));
        found
    }

    fn outer_markup(&self) -> String {
        self.html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <span title="Apr 18, 2024 4:07 PM UTC"><span x-test-updated>  2 days ago </span></span>
          <p class="lead big"> Hello
             <b>world</b> </p>
          <pre>line one
  line two</pre>
          <div class="sm:col-span-2">params</div>
        </body></html>
    "#;

    #[test]
    fn test_select_and_text() {
        let doc = Document::parse(PAGE);
        let root = doc.root();
        let lead = root.select_first("p.lead").unwrap();
        assert_eq!(lead.text_content(), "Helloworld");
        assert_eq!(lead.text_with_separator(" "), "Hello world");
        assert!(lead.has_class("big"));
        assert!(!lead.has_class("small"));
    }

    #[test]
    fn test_raw_text_preserves_whitespace() {
        let doc = Document::parse(PAGE);
        let pre = doc.root().select_first("pre").unwrap();
        assert_eq!(pre.raw_text(), "line one\n  line two");
    }

    #[test]
    fn test_closest_ancestor_with_attribute() {
        let doc = Document::parse(PAGE);
        let updated = doc.root().select_first("span[x-test-updated]").unwrap();
        let holder = updated.closest("span[title]").unwrap();
        assert_eq!(
            holder.attribute("title").as_deref(),
            Some("Apr 18, 2024 4:07 PM UTC")
        );
        assert!(updated.closest("table").is_none());
    }

    #[test]
    fn test_escaped_class_selector() {
        let doc = Document::parse(PAGE);
        let cell = doc.root().select_first("div.sm\\:col-span-2").unwrap();
        assert_eq!(cell.text_content(), "params");
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc.root().select_first("p[[").is_none());
        assert!(doc.root().select_all("p[[").is_empty());
    }
}
