//! Configuration for the library extraction engine.
//!
//! Fixed registry facts live on [`RegistryConfig`]. Values a deployment may
//! change are carried by [`LibraryConfig`], which is passed explicitly into
//! every parser and resolver call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry-level constants.
pub struct RegistryConfig;

impl RegistryConfig {
    pub const BASE_URL: &'static str = "https://ollama.com";
    /// Namespace of the official models; omitted from display names.
    pub const DEFAULT_NAMESPACE: &'static str = "library";
    pub const CACHE_TTL: Duration = Duration::from_secs(21_600); // 6 hours
    /// Blob names whose content is fetched and decoded as text.
    pub const TEXT_BLOB_NAMES: &'static [&'static str] =
        &["params", "template", "license", "modelfile"];
    /// Blob name carrying the GGUF weights.
    pub const MODEL_BLOB_NAME: &'static str = "model";
    pub const UNKNOWN_DIGEST: &'static str = "unknown-digest";
    /// Tag implied by a run command that names no tag.
    pub const IMPLICIT_TAG: &'static str = "latest";
    /// Placeholder used by the tags table for an empty column.
    pub const EMPTY_COLUMN: &'static str = "-";
    pub const KNOWN_QUANTIZATIONS: &'static [&'static str] = &[
        "q2_k", "q3_k_s", "q3_k_m", "q3_k_l", "q4_0", "q4_1", "q4_k_s", "q4_k_m", "q5_0", "q5_1",
        "q5_k_s", "q5_k_m", "q6_k", "q8_0",
    ];
}

/// Runtime configuration threaded through parsing and resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LibraryConfig {
    /// Origin the registry pages are served from.
    pub base_url: String,
    /// Sentinel namespace used when a reference names none.
    pub default_namespace: String,
    /// TTL used to derive cache expiry when the store reports none.
    pub cache_ttl: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            base_url: RegistryConfig::BASE_URL.to_string(),
            default_namespace: RegistryConfig::DEFAULT_NAMESPACE.to_string(),
            cache_ttl: RegistryConfig::CACHE_TTL,
        }
    }
}

impl LibraryConfig {
    /// Override the registry origin (trailing slashes are dropped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the default namespace sentinel.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into().to_lowercase();
        self
    }

    /// Override the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Check whether `namespace` is the default namespace (case-insensitive).
    pub fn is_default_namespace(&self, namespace: &str) -> bool {
        namespace.eq_ignore_ascii_case(&self.default_namespace)
    }

    /// Absolute URL for a registry path such as `/library/llama3`.
    pub fn page_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Resolve an `href` found in a page against the registry origin.
    pub fn resolve_href(&self, href: &str) -> String {
        url::Url::parse(&self.base_url)
            .and_then(|base| base.join(href))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.page_url(href))
    }
}
