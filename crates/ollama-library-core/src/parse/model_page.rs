//! Model and tag detail pages.
//!
//! Both pages share one layout, so a single parser serves both; the tag page
//! differs only by the tag carried in its URL.

use super::ParseContext;
use crate::active_tag::{reconcile_active_flags, resolve_active_tag, ActiveTagSignals};
use crate::error::{LibraryError, Result};
use crate::extract::{
    extract_capabilities, extract_dropdown_entries, extract_file_entries, extract_last_updated,
    extract_page_name, extract_pull_count, extract_sizes, extract_summary,
};
use crate::identity::{path_segments, resolve_identity};
use crate::markup::{Document, MarkupNode};
use crate::models::ModelDetailRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const TAG_SELECTION: &str = "section[x-test-model-tag-selection]";
const SELECTED_TAG_LABEL: &str = "button[name=\"tag\"] div.truncate";
const RUN_COMMAND: &str = "input.command[name=\"command\"]";
const README: &str = "#readme #display";
const TAGS_LINK: &str = "a[x-test-tags-link]";

static TAG_COUNT_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+Tags").expect("tag count regex must compile"));

/// Parse a model page (`/<ns>/<base>`) or tag page (`/<ns>/<base>:<tag>`).
///
/// Fails with [`LibraryError::IdentityUnresolved`] when neither the URL nor
/// the page names a model.
pub fn parse_model_page(markup: &str, ctx: &ParseContext<'_>) -> Result<ModelDetailRecord> {
    let document = Document::parse(markup);
    parse_model_root(&document.root(), ctx)
}

fn parse_model_root<N: MarkupNode>(page: &N, ctx: &ParseContext<'_>) -> Result<ModelDetailRecord> {
    let default_ns = ctx.default_namespace();
    let page_name = extract_page_name(page);
    let resolved = resolve_identity(&path_segments(ctx.page_url), page_name.as_deref(), default_ns)
        .ok_or_else(|| LibraryError::IdentityUnresolved {
            source_hint: ctx.page_url.to_string(),
        })?;
    let identity = resolved.model;
    let name_full_model = identity.full_name(default_ns);

    let tag_section = page.select_first(TAG_SELECTION);
    let selected_label = tag_section
        .as_ref()
        .and_then(|section| section.select_first(SELECTED_TAG_LABEL))
        .map(|label| label.text_content())
        .filter(|label| !label.is_empty());
    let tag_command = tag_section
        .as_ref()
        .and_then(|section| section.select_first(RUN_COMMAND))
        .and_then(|input| input.attribute("value"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let mut dropdown = extract_dropdown_entries(page, &identity, ctx.config);
    let signals = ActiveTagSignals {
        path_tag: resolved.path_tag.as_deref(),
        selected_label: selected_label.as_deref(),
        run_command: tag_command.as_deref(),
        model_full_name: &name_full_model,
    };
    let active_tag_part = resolve_active_tag(&signals, &dropdown);
    reconcile_active_flags(&mut dropdown, active_tag_part.as_deref());

    let (all_tags_page_url, total_tags_count_from_link) = match page.select_first(TAGS_LINK) {
        Some(link) => (
            link.attribute("href")
                .map(|href| ctx.config.resolve_href(&href))
                .unwrap_or_else(|| default_tags_url(ctx, &identity.path())),
            TAG_COUNT_HINT
                .captures(&link.text_with_separator(" "))
                .and_then(|caps| caps[1].parse().ok()),
        ),
        None => (default_tags_url(ctx, &identity.path()), None),
    };

    let (pull_count_str, pull_count) = extract_pull_count(page);
    let (last_updated_str, last_updated_iso) = extract_last_updated(page, ctx.now);
    let tag_files_summary = extract_file_entries(page, ctx.config);

    debug!(
        "Parsed model page {} (active tag {:?}, {} files, {} dropdown tags)",
        name_full_model,
        active_tag_part,
        tag_files_summary.len(),
        dropdown.len()
    );

    Ok(ModelDetailRecord {
        active_tag_full_name: active_tag_part
            .as_deref()
            .map(|tag| identity.with_tag(tag).full_name(default_ns)),
        active_tag_part,
        name_full_model,
        source_url: ctx.page_url.to_string(),
        summary: extract_summary(page),
        pull_count_str,
        pull_count,
        last_updated_str,
        last_updated_iso,
        capabilities: extract_capabilities(page),
        sizes: extract_sizes(page),
        readme_content: page
            .select_first(README)
            .map(|readme| readme.outer_markup())
            .unwrap_or_default(),
        tag_command,
        tag_files_summary,
        all_tags_dropdown_summary: dropdown,
        all_tags_page_url,
        total_tags_count_from_link,
        identity,
    })
}

fn default_tags_url(ctx: &ParseContext<'_>, model_path: &str) -> String {
    ctx.config.page_url(&format!("{}/tags", model_path))
}
