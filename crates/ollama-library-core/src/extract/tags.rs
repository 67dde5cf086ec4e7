//! Tag rows: the dropdown on a model page and the rows of the tags page.

use crate::config::{LibraryConfig, RegistryConfig};
use crate::identity::ModelIdentity;
use crate::markup::MarkupNode;
use crate::models::{TagDetailRecord, TagSummaryEntry};
use crate::normalize::{parse_relative_date, parse_size_bytes, resolve_timestamp};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

const DROPDOWN_ANCHOR: &str = "#tags-nav a[href]";
const DROPDOWN_TAG_NAME: &str = "span.truncate span.group-hover\\:underline";
const DROPDOWN_SIZE: &str = "span.text-xs.text-neutral-400";
const ACTIVE_ROW_CLASS: &str = "bg-neutral-100";

const TAG_ANCHOR: &str = "a.hover\\:underline";
const ROW_DIGEST: &str = "div.font-mono.text-\\[13px\\]";
const WIDE_DETAILS: &str = "div.hidden.md\\:grid";
const WIDE_COLUMNS: &str = "div.grid.grid-cols-12 > div";
const NARROW_DETAILS: &str = "a.md\\:hidden span:not([class*=\"group-hover:underline\"])";
const DEFAULT_BADGE: &str = "span.text-blue-600";

static SHORT_DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9a-f]{7,}").expect("digest regex must compile"));

static CONTEXT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)context").expect("context regex must compile"));

static INPUT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)input").expect("input regex must compile"));

/// Dropdown rows of a model page.
///
/// Only links into the default namespace or the model's own namespace are
/// tag rows; the "View all" link and rows without a tag name are skipped.
pub fn extract_dropdown_entries<N: MarkupNode>(
    page: &N,
    identity: &ModelIdentity,
    config: &LibraryConfig,
) -> Vec<TagSummaryEntry> {
    let prefixes = [
        format!("/{}/", config.default_namespace),
        format!("/{}/", identity.namespace),
    ];

    page.select_all(DROPDOWN_ANCHOR)
        .iter()
        .filter(|anchor| {
            anchor
                .attribute("href")
                .is_some_and(|href| prefixes.iter().any(|p| href.starts_with(p.as_str())))
        })
        .filter(|anchor| !anchor.text_with_separator(" ").contains("View all"))
        .filter_map(|anchor| {
            let tag_part = anchor
                .select_first(DROPDOWN_TAG_NAME)
                .map(|span| span.text_content().to_lowercase())
                .filter(|tag| !tag.is_empty())?;
            let size_str = anchor
                .select_first(DROPDOWN_SIZE)
                .map(|span| span.text_content())
                .filter(|size| !size.is_empty());
            Some(TagSummaryEntry {
                name_full_tag: identity
                    .with_tag(&tag_part)
                    .full_name(&config.default_namespace),
                tag_part,
                size_str,
                is_active: anchor.has_class(ACTIVE_ROW_CLASS),
            })
        })
        .collect()
}

/// Facts shown in the detail columns of one tags-page row.
#[derive(Debug, Default)]
struct RowDetails {
    digest: Option<String>,
    size_str: Option<String>,
    context_window_str: Option<String>,
    input_type: Option<String>,
    modified_str: Option<String>,
    modified_iso: Option<DateTime<Utc>>,
}

/// Parse one tags-page row, keeping it only if it names `expected`.
///
/// The link text is `name` (meaning `latest`) or `name:tag`; rows naming any
/// other model are dropped.
pub fn extract_tag_row<N: MarkupNode>(
    row: &N,
    expected: &ModelIdentity,
    config: &LibraryConfig,
    now: DateTime<Utc>,
) -> Option<TagDetailRecord> {
    let anchor = row.select_first(TAG_ANCHOR)?;
    let href = anchor.attribute("href")?;
    let tag_part = matching_tag(
        &anchor.text_content(),
        &expected.full_name(&config.default_namespace),
    )?;

    let details = row
        .select_first(WIDE_DETAILS)
        .map(|wide| wide_details(&wide, now))
        .or_else(|| narrow_details(row, now))
        .unwrap_or_default();

    let digest = details
        .digest
        .or_else(|| {
            row.select_first(ROW_DIGEST)
                .map(|div| div.text_content())
                .filter(|digest| !digest.is_empty())
        })
        .unwrap_or_else(|| RegistryConfig::UNKNOWN_DIGEST.to_string());
    let size_str = details.size_str.unwrap_or_else(|| "N/A".to_string());
    let is_default = row
        .select_all(DEFAULT_BADGE)
        .iter()
        .any(|badge| badge.text_content().contains("Default"));

    let identity = expected.with_tag(&tag_part);
    Some(TagDetailRecord {
        name_full_tag: identity.full_name(&config.default_namespace),
        identity,
        source_url: config.resolve_href(&href),
        digest,
        size_bytes: parse_size_bytes(&size_str),
        size_str,
        context_window_str: details.context_window_str,
        input_type: details.input_type,
        modified_str: details.modified_str.unwrap_or_else(|| "N/A".to_string()),
        modified_iso: details.modified_iso.unwrap_or(now),
        is_default,
    })
}

fn matching_tag(link_text: &str, expected_full_name: &str) -> Option<String> {
    let text = link_text.trim().to_lowercase();
    let expected = expected_full_name.to_lowercase();
    match text.split_once(':') {
        Some((name, tag)) if name == expected && !tag.trim().is_empty() => {
            Some(tag.trim().to_string())
        }
        Some(_) => None,
        None if text == expected => Some(RegistryConfig::IMPLICIT_TAG.to_string()),
        None => None,
    }
}

/// Wide layout: size, context window, input type and modified columns.
fn wide_details<N: MarkupNode>(wide: &N, now: DateTime<Utc>) -> RowDetails {
    let columns = wide.select_all(WIDE_COLUMNS);
    let column_text = |index: usize| {
        columns
            .get(index)
            .map(|col| col.text_content())
            .filter(|text| !text.is_empty() && text != RegistryConfig::EMPTY_COLUMN)
    };

    let mut details = RowDetails {
        size_str: column_text(1),
        context_window_str: column_text(2),
        input_type: column_text(3),
        ..Default::default()
    };

    if let Some(modified) = columns.get(4) {
        let raw = modified.text_content();
        let absolute = modified
            .select_first("span[title]")
            .and_then(|span| span.attribute("title"));
        if !raw.is_empty() || absolute.is_some() {
            details.modified_iso = Some(resolve_timestamp(absolute.as_deref(), &raw, now));
            details.modified_str = Some(raw);
        }
    }
    details
}

/// Narrow layout: one `•`-separated line of facts.
///
/// Each part is classified by keyword, first match wins: a size unit,
/// `context`, `input`, then a date word.
fn narrow_details<N: MarkupNode>(row: &N, now: DateTime<Utc>) -> Option<RowDetails> {
    let line = row.select_first(NARROW_DETAILS)?.text_with_separator(" ");
    let parts: Vec<&str> = line.split('•').map(str::trim).collect();

    let mut details = RowDetails {
        digest: parts
            .first()
            .and_then(|first| SHORT_DIGEST.find(first))
            .map(|m| m.as_str().to_string()),
        ..Default::default()
    };

    for part in parts.iter().filter(|p| !p.is_empty()) {
        let lower = part.to_lowercase();
        if ["gb", "mb", "kb"].iter().any(|unit| lower.contains(unit)) {
            details.size_str = Some(part.to_string());
        } else if lower.contains("context") {
            details.context_window_str = non_placeholder(&CONTEXT_WORD.replace_all(part, ""));
        } else if lower.contains("input") {
            details.input_type = non_placeholder(&INPUT_WORD.replace_all(part, ""));
        } else if ["ago", "yesterday", "now", "updated", "modified"]
            .iter()
            .any(|word| lower.contains(word))
        {
            details.modified_iso = Some(parse_relative_date(part, now));
            details.modified_str = Some(part.to_string());
        }
    }
    Some(details)
}

fn non_placeholder(text: &str) -> Option<String> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty() && text != RegistryConfig::EMPTY_COLUMN).then_some(text)
}
