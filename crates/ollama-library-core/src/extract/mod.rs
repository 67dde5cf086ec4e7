//! Field extractors.
//!
//! Each field is located by an ordered list of candidate strategies; the
//! first strategy returning a value wins, and a field nobody finds degrades
//! to its documented default.

mod blob;
mod fields;
mod files;
mod tags;

pub use blob::{decode_structured_content, BlobContentPlan};
pub use fields::{
    extract_capabilities, extract_description, extract_last_updated, extract_page_name,
    extract_pull_count, extract_sizes, extract_summary, extract_tags_count,
};
pub use files::{digest_from_blob_url, extract_file_entries};
pub use tags::{extract_dropdown_entries, extract_tag_row};

use crate::markup::MarkupNode;

/// One way of locating a value within a node.
pub type Strategy<N, T> = fn(&N) -> Option<T>;

/// Run `strategies` in order and return the first value found.
pub fn first_match<N: MarkupNode, T>(node: &N, strategies: &[Strategy<N, T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(node))
}
