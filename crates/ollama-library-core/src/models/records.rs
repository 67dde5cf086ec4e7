//! Canonical records extracted from registry pages.

use crate::config::RegistryConfig;
use crate::identity::{ModelIdentity, TagIdentity};
use crate::normalize::GgufMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a listing or search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelListingRecord {
    pub source_url: String,
    #[serde(flatten)]
    pub identity: ModelIdentity,
    pub name_full_model: String,
    pub description: String,
    pub pull_count_str: String,
    pub pull_count: u64,
    pub tags_count: u32,
    pub last_updated_str: String,
    pub last_updated_iso: DateTime<Utc>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl ModelListingRecord {
    /// Whether every requested capability is present on this model.
    pub fn has_capabilities<'a>(&self, required: impl IntoIterator<Item = &'a String>) -> bool {
        required
            .into_iter()
            .all(|cap| self.capabilities.iter().any(|own| own == cap))
    }
}

/// A file row in the model page's file explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Case-folded file name (`model`, `params`, `template`, ...).
    pub name: String,
    pub blob_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub size_str: String,
    pub snippet: String,
    /// Listing-wide "updated" caption, shared by every row of one page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_str: Option<String>,
}

impl FileEntry {
    /// Match a blob token against the name or a digest prefix (case-insensitive).
    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return false;
        }
        self.name == token
            || self
                .digest
                .as_deref()
                .is_some_and(|digest| digest.to_lowercase().starts_with(&token))
    }
}

/// A row of the tag dropdown on a model page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummaryEntry {
    pub tag_part: String,
    pub name_full_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_str: Option<String>,
    pub is_active: bool,
}

/// Model or tag detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDetailRecord {
    #[serde(flatten)]
    pub identity: ModelIdentity,
    pub name_full_model: String,
    pub active_tag_part: Option<String>,
    pub active_tag_full_name: Option<String>,
    pub source_url: String,
    pub summary: String,
    pub pull_count_str: String,
    pub pull_count: u64,
    pub last_updated_str: String,
    pub last_updated_iso: DateTime<Utc>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    pub readme_content: String,
    pub tag_command: Option<String>,
    #[serde(default)]
    pub tag_files_summary: Vec<FileEntry>,
    #[serde(default)]
    pub all_tags_dropdown_summary: Vec<TagSummaryEntry>,
    pub all_tags_page_url: String,
    pub total_tags_count_from_link: Option<u32>,
}

impl ModelDetailRecord {
    /// Active tag as a typed identity.
    pub fn active_tag(&self) -> Option<TagIdentity> {
        self.active_tag_part
            .as_deref()
            .map(|tag| self.identity.with_tag(tag))
    }

    /// Set the active tag and rewrite every dropdown flag against it.
    pub fn set_active_tag(&mut self, tag_part: Option<&str>, default_namespace: &str) {
        let tag_part = tag_part.map(|t| t.trim().to_lowercase());
        self.active_tag_full_name = tag_part
            .as_deref()
            .map(|tag| self.identity.with_tag(tag).full_name(default_namespace));
        crate::active_tag::reconcile_active_flags(
            &mut self.all_tags_dropdown_summary,
            tag_part.as_deref(),
        );
        self.active_tag_part = tag_part;
    }

    /// Move the record to another namespace, recomputing every derived name.
    pub fn rebase_namespace(&mut self, namespace: &str, default_namespace: &str) {
        self.identity = self.identity.in_namespace(namespace);
        self.name_full_model = self.identity.full_name(default_namespace);
        for entry in &mut self.all_tags_dropdown_summary {
            entry.name_full_tag = self
                .identity
                .with_tag(&entry.tag_part)
                .full_name(default_namespace);
        }
        let active = self.active_tag_part.clone();
        self.set_active_tag(active.as_deref(), default_namespace);
    }

    /// File entry addressed by name or digest prefix.
    pub fn find_file(&self, token: &str) -> Option<&FileEntry> {
        self.tag_files_summary
            .iter()
            .find(|entry| entry.matches_token(token))
    }
}

/// One row of the all-tags page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDetailRecord {
    pub name_full_tag: String,
    #[serde(flatten)]
    pub identity: TagIdentity,
    pub source_url: String,
    pub digest: String,
    pub size_str: String,
    pub size_bytes: u64,
    pub context_window_str: Option<String>,
    pub input_type: Option<String>,
    pub modified_str: String,
    pub modified_iso: DateTime<Utc>,
    pub is_default: bool,
}

/// Kind of blob attached to a tag, decided by its declared file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlobKind {
    Params,
    Template,
    License,
    Modelfile,
    Model,
    Other(String),
}

impl BlobKind {
    /// Classify a (case-insensitive) file name.
    pub fn classify(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "params" => BlobKind::Params,
            "template" => BlobKind::Template,
            "license" => BlobKind::License,
            "modelfile" => BlobKind::Modelfile,
            "model" => BlobKind::Model,
            _ => BlobKind::Other(name),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlobKind::Params => "params",
            BlobKind::Template => "template",
            BlobKind::License => "license",
            BlobKind::Modelfile => "modelfile",
            BlobKind::Model => RegistryConfig::MODEL_BLOB_NAME,
            BlobKind::Other(name) => name,
        }
    }

    /// Text blobs have their full content fetched and decoded as text.
    pub fn is_text(&self) -> bool {
        RegistryConfig::TEXT_BLOB_NAMES.contains(&self.as_str())
    }

    /// Only `params` content is additionally decoded as JSON.
    pub fn decodes_structured(&self) -> bool {
        matches!(self, BlobKind::Params)
    }

    /// The weights blob, described only by its listing snippet.
    pub fn is_gguf(&self) -> bool {
        matches!(self, BlobKind::Model)
    }
}

impl From<String> for BlobKind {
    fn from(name: String) -> Self {
        BlobKind::classify(&name)
    }
}

impl From<BlobKind> for String {
    fn from(kind: BlobKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for BlobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Details of one blob of a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobRecord {
    pub name_full_tag: String,
    pub canonical_name: String,
    pub kind: BlobKind,
    pub source_url: String,
    pub digest: String,
    pub size_str: String,
    pub text_content: Option<String>,
    pub parsed_json_content: Option<serde_json::Value>,
    pub gguf_metadata_snippet: Option<String>,
    pub parsed_gguf_metadata: Option<GgufMetadata>,
    pub listing_updated_str: Option<String>,
    pub listing_updated_iso: Option<DateTime<Utc>>,
}
