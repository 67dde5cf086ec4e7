//! File explorer rows of a tag page.

use crate::config::LibraryConfig;
use crate::identity::path_segments;
use crate::markup::MarkupNode;
use crate::models::FileEntry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const FILE_SECTION: &str = "#file-explorer section";
const UPDATED_CAPTION: &str = "div.bg-neutral-50 > p:first-of-type";
const FILE_ROW: &str = "a.group.block.grid-cols-12";
const NAME_CELL: &str = "div.sm\\:col-span-2";
const SNIPPET_CELL: &str = "div.sm\\:col-span-8";
const SIZE_CELL: &str = "div.sm\\:col-start-12";

static DIGEST_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{12,}$").expect("digest regex must compile")
});

static RELATIVE_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+ \w+ ago").expect("caption regex must compile")
});

/// Every file row of the explorer, in page order.
///
/// Rows without a link are skipped. Every entry carries the section's
/// "updated" caption, if it has a recognizable one.
pub fn extract_file_entries<N: MarkupNode>(page: &N, config: &LibraryConfig) -> Vec<FileEntry> {
    let Some(section) = page.select_first(FILE_SECTION) else {
        return Vec::new();
    };
    let updated_str = listing_caption(&section);

    let entries: Vec<FileEntry> = section
        .select_all(FILE_ROW)
        .iter()
        .filter_map(|row| {
            let href = row.attribute("href")?;
            let blob_url = config.resolve_href(&href);
            let name = row
                .select_first(NAME_CELL)
                .map(|cell| cell.text_content().to_lowercase())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "unknown".to_string());
            let size_str = row
                .select_first(SIZE_CELL)
                .map(|cell| cell.text_content())
                .filter(|size| !size.is_empty())
                .unwrap_or_else(|| "0B".to_string());
            let snippet = row
                .select_first(SNIPPET_CELL)
                .map(|cell| cell.text_with_separator(" "))
                .unwrap_or_default();
            Some(FileEntry {
                digest: digest_from_blob_url(&blob_url),
                name,
                blob_url,
                size_str,
                snippet,
                updated_str: updated_str.clone(),
            })
        })
        .collect();

    debug!("Extracted {} file entries", entries.len());
    entries
}

/// Digest of a `.../blobs/<hex>` URL; `None` unless the last segment is
/// at least 12 hex characters.
pub fn digest_from_blob_url(url: &str) -> Option<String> {
    let segments = path_segments(url);
    match segments.as_slice() {
        [.., marker, digest] if marker == "blobs" && DIGEST_SHAPE.is_match(digest) => {
            Some(digest.clone())
        }
        _ => None,
    }
}

fn listing_caption<N: MarkupNode>(section: &N) -> Option<String> {
    let caption = section
        .select_first(UPDATED_CAPTION)?
        .text_with_separator(" ");
    if caption.contains("Updated") {
        let stripped = caption.replace("Updated", "").trim().to_string();
        return (!stripped.is_empty()).then_some(stripped);
    }
    RELATIVE_CAPTION.is_match(&caption).then_some(caption)
}
