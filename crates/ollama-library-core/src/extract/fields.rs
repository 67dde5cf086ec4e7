//! Scalar fields shared by listing rows and model pages.

use super::{first_match, Strategy};
use crate::markup::MarkupNode;
use crate::normalize::{parse_count, resolve_timestamp};
use chrono::{DateTime, Utc};

const DESCRIPTION: &str = "p.max-w-lg.break-words";
const PULL_COUNT: &str = "span[x-test-pull-count]";
const TAG_COUNT: &str = "span[x-test-tag-count]";
const UPDATED: &str = "span[x-test-updated]";
const UPDATED_ABSOLUTE: &str = "span[title]";
const SIZE_TAG: &str = "span[x-test-size]";

/// Model name the page or row reports about itself.
pub fn extract_page_name<N: MarkupNode>(scope: &N) -> Option<String> {
    let strategies: [Strategy<N, String>; 3] = [
        |n| attribute_of(n, "a[x-test-model-name][title]", "title"),
        |n| {
            n.select_first("h2 span[x-test-search-response-title]")
                .map(|span| span.text_content())
                .filter(|text| !text.is_empty())
        },
        |n| attribute_of(n, "div[x-test-model-title][title]", "title"),
    ];
    first_match(scope, &strategies)
}

/// Description block of a listing row; empty when absent.
pub fn extract_description<N: MarkupNode>(scope: &N) -> String {
    scope
        .select_first(DESCRIPTION)
        .map(|p| p.text_with_separator(" "))
        .unwrap_or_default()
}

/// Summary of a model page; empty when absent.
pub fn extract_summary<N: MarkupNode>(page: &N) -> String {
    let strategies: [Strategy<N, String>; 2] = [
        |n| {
            n.select_first("#summary-content span, #summary-content")
                .map(|s| s.text_with_separator(" "))
                .filter(|text| is_usable_summary(text))
        },
        |n| {
            n.select_first("#summary-textarea")
                .map(|s| s.text_with_separator(" "))
                .filter(|text| is_usable_summary(text))
        },
    ];
    first_match(page, &strategies).unwrap_or_default()
}

fn is_usable_summary(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !text.eq_ignore_ascii_case("no summary")
}

/// Raw and parsed pull count; `("0", 0)` when absent.
pub fn extract_pull_count<N: MarkupNode>(scope: &N) -> (String, u64) {
    let raw = scope
        .select_first(PULL_COUNT)
        .map(|span| span.text_content())
        .unwrap_or_else(|| "0".to_string());
    let count = parse_count(&raw);
    (raw, count)
}

/// Tag count of a listing row; `0` unless the marker holds only digits.
pub fn extract_tags_count<N: MarkupNode>(scope: &N) -> u32 {
    scope
        .select_first(TAG_COUNT)
        .map(|span| span.text_content())
        .filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

/// Raw "updated" text and its timestamp.
///
/// An absolute `title` on an enclosing span wins over the relative text.
/// Absent marker yields `("", now)`.
pub fn extract_last_updated<N: MarkupNode>(
    scope: &N,
    now: DateTime<Utc>,
) -> (String, DateTime<Utc>) {
    let Some(marker) = scope.select_first(UPDATED) else {
        return (String::new(), now);
    };
    let raw = marker.text_content();
    let absolute = marker
        .closest(UPDATED_ABSOLUTE)
        .and_then(|holder| holder.attribute("title"));
    let at = resolve_timestamp(absolute.as_deref(), &raw, now);
    (raw, at)
}

/// Capability badges, lower-cased.
pub fn extract_capabilities<N: MarkupNode>(scope: &N) -> Vec<String> {
    let strategies: [Strategy<N, Vec<String>>; 2] = [
        |n| lowered_texts(n, "span[x-test-capability]"),
        |n| lowered_texts(n, "div.flex-wrap span.bg-indigo-50"),
    ];
    first_match(scope, &strategies).unwrap_or_default()
}

/// Parameter-size badges, lower-cased.
pub fn extract_sizes<N: MarkupNode>(scope: &N) -> Vec<String> {
    lowered_texts(scope, SIZE_TAG).unwrap_or_default()
}

fn attribute_of<N: MarkupNode>(scope: &N, selector: &str, attribute: &str) -> Option<String> {
    scope
        .select_first(selector)
        .and_then(|node| node.attribute(attribute))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn lowered_texts<N: MarkupNode>(scope: &N, selector: &str) -> Option<Vec<String>> {
    let values: Vec<String> = scope
        .select_all(selector)
        .iter()
        .map(|node| node.text_content().to_lowercase())
        .filter(|text| !text.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}
