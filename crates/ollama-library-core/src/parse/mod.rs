//! Page parsers.
//!
//! Every parser is a pure, synchronous function of the page markup and a
//! [`ParseContext`]. The parsed document lives only for the duration of the
//! call, so parsers can be invoked freely from async code.

mod all_tags;
mod blob_page;
mod listing;
mod model_page;

pub use all_tags::parse_all_tags_page;
pub use blob_page::parse_blob_content_page;
pub use listing::parse_listing_page;
pub use model_page::parse_model_page;

use crate::config::LibraryConfig;
use chrono::{DateTime, Utc};

/// Request-scoped inputs shared by every parser.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    pub config: &'a LibraryConfig,
    /// Absolute URL the page was requested from.
    pub page_url: &'a str,
    /// Base time for relative dates and absent timestamps.
    pub now: DateTime<Utc>,
}

impl<'a> ParseContext<'a> {
    pub fn new(config: &'a LibraryConfig, page_url: &'a str) -> Self {
        Self {
            config,
            page_url,
            now: Utc::now(),
        }
    }

    /// Pin the base time (tests, replays).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn default_namespace(&self) -> &str {
        &self.config.default_namespace
    }
}
