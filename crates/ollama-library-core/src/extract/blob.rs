//! How each blob kind gets its content.

use crate::models::BlobKind;
use serde_json::Value;
use tracing::debug;

/// Content strategy for one blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobContentPlan {
    /// Fetch the blob page; optionally decode the text as JSON.
    FetchText { decode_structured: bool },
    /// Weights: describe from the listing snippet, never fetched.
    GgufSnippet,
    /// Anything else: the listing snippet is the content.
    SnippetText,
}

impl BlobContentPlan {
    pub fn for_kind(kind: &BlobKind) -> Self {
        if kind.is_gguf() {
            BlobContentPlan::GgufSnippet
        } else if kind.is_text() {
            BlobContentPlan::FetchText {
                decode_structured: kind.decodes_structured(),
            }
        } else {
            BlobContentPlan::SnippetText
        }
    }
}

/// Decode structured blob text; malformed content yields `None`.
pub fn decode_structured_content(text: &str) -> Option<Value> {
    match serde_json::from_str(text.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Blob content is not valid JSON: {}", e);
            None
        }
    }
}
