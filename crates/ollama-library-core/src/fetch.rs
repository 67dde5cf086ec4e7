//! Fetch collaborator seam.
//!
//! The engine never performs network I/O itself. A [`PageFetcher`] supplied
//! by the host (HTTP client, cache store, test double) returns documents
//! together with the cache facts the provenance fields are built from.

use crate::models::CacheMeta;
use async_trait::async_trait;
use std::sync::Arc;

/// A fetched document and its transport facts.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL of the document.
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    pub cache: CacheMeta,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>, cache: CacheMeta) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body: body.into(),
            cache,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Whether the body is an HTML page rather than raw content.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_lowercase().contains("text/html"))
    }
}

/// Source of registry documents.
///
/// Implementations report every completed request as `Ok`, whatever its
/// status; `Err` is reserved for requests that never completed (DNS, TLS,
/// timeouts).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` with the given query parameters.
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> crate::Result<FetchedPage>;
}

pub type DynPageFetcher = Arc<dyn PageFetcher>;
