//! The "all tags" page of one model.

use super::ParseContext;
use crate::extract::extract_tag_row;
use crate::identity::ModelIdentity;
use crate::markup::{Document, MarkupNode};
use crate::models::AllTagsResponse;
use tracing::debug;

const TAG_ROW: &str = "ul > li.group.p-3";

/// Parse every tag of `expected` listed on its tags page.
///
/// Rows naming any other model are skipped.
pub fn parse_all_tags_page(
    markup: &str,
    ctx: &ParseContext<'_>,
    expected: &ModelIdentity,
) -> AllTagsResponse {
    let document = Document::parse(markup);
    let rows = document.root().select_all(TAG_ROW);
    let tags: Vec<_> = rows
        .iter()
        .filter_map(|row| extract_tag_row(row, expected, ctx.config, ctx.now))
        .collect();
    debug!(
        "Parsed {} of {} tag rows for {} from {}",
        tags.len(),
        rows.len(),
        expected.full_name(ctx.default_namespace()),
        ctx.page_url
    );

    AllTagsResponse {
        name_full_model: expected.full_name(ctx.default_namespace()),
        identity: expected.clone(),
        tags_page_url: ctx.page_url.to_string(),
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;

    #[test]
    fn test_only_expected_model_rows() {
        let page = r#"
            <ul>
              <li class="group p-3"><a class="hover:underline" href="/library/llama3">llama3</a></li>
              <li class="group p-3"><a class="hover:underline" href="/library/llama3:8b">llama3:8b</a></li>
              <li class="group p-3"><a class="hover:underline" href="/library/llama3.1:8b">llama3.1:8b</a></li>
              <li class="p-3"><a class="hover:underline" href="/library/llama3:70b">llama3:70b</a></li>
            </ul>
        "#;
        let config = LibraryConfig::default();
        let ctx = ParseContext::new(&config, "https://ollama.com/library/llama3/tags");
        let expected = ModelIdentity::new("library", "llama3");
        let response = parse_all_tags_page(page, &ctx, &expected);

        let tags: Vec<&str> = response
            .tags
            .iter()
            .map(|t| t.identity.tag_part.as_str())
            .collect();
        assert_eq!(tags, vec!["latest", "8b"]);
        assert_eq!(response.name_full_model, "llama3");
        assert_eq!(response.tags_page_url, "https://ollama.com/library/llama3/tags");
    }
}
