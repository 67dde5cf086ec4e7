//! Listing and search result pages.

use super::ParseContext;
use crate::extract::{
    extract_capabilities, extract_description, extract_last_updated, extract_page_name,
    extract_pull_count, extract_sizes, extract_tags_count,
};
use crate::identity::{path_segments, resolve_identity};
use crate::markup::{Document, MarkupNode};
use crate::models::ModelListingRecord;
use tracing::debug;

const LISTING_ROW: &str = "ul[role=\"list\"] li[x-test-model]";
const ROW_LINK: &str = "a[href]";

/// Parse every model row of a listing page.
///
/// Rows whose identity cannot be resolved are dropped.
pub fn parse_listing_page(markup: &str, ctx: &ParseContext<'_>) -> Vec<ModelListingRecord> {
    let document = Document::parse(markup);
    let rows = document.root().select_all(LISTING_ROW);
    let records: Vec<ModelListingRecord> = rows
        .iter()
        .filter_map(|row| parse_listing_row(row, ctx))
        .collect();
    debug!(
        "Parsed {} of {} listing rows from {}",
        records.len(),
        rows.len(),
        ctx.page_url
    );
    records
}

fn parse_listing_row<N: MarkupNode>(row: &N, ctx: &ParseContext<'_>) -> Option<ModelListingRecord> {
    let href = row.select_first(ROW_LINK)?.attribute("href")?;
    let source_url = ctx.config.resolve_href(&href);
    let page_name = extract_page_name(row);
    let resolved = resolve_identity(
        &path_segments(&source_url),
        page_name.as_deref(),
        ctx.default_namespace(),
    );
    let Some(resolved) = resolved else {
        debug!("Dropping listing row with unresolvable identity: {}", href);
        return None;
    };

    let (pull_count_str, pull_count) = extract_pull_count(row);
    let (last_updated_str, last_updated_iso) = extract_last_updated(row, ctx.now);
    Some(ModelListingRecord {
        name_full_model: resolved.model.full_name(ctx.default_namespace()),
        identity: resolved.model,
        source_url,
        description: extract_description(row),
        pull_count_str,
        pull_count,
        tags_count: extract_tags_count(row),
        last_updated_str,
        last_updated_iso,
        capabilities: extract_capabilities(row),
        sizes: extract_sizes(row),
    })
}
