//! Response envelopes for listing, search and all-tags lookups.

use super::records::{ModelListingRecord, TagDetailRecord};
use crate::error::{LibraryError, Result};
use crate::identity::ModelIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Sort order accepted by listing and search pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Popular,
    Newest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Popular => "popular",
            SortOrder::Newest => "newest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "popular" => Ok(SortOrder::Popular),
            "newest" => Ok(SortOrder::Newest),
            other => Err(LibraryError::Validation {
                field: "sort_order".to_string(),
                message: format!("'{}' must be 'popular' or 'newest'", other),
            }),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested capability set, parsed from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityFilter(BTreeSet<String>);

impl CapabilityFilter {
    /// Parse `"Vision, tools"`; `None` when nothing usable was requested.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let set: BTreeSet<String> = raw?
            .split(',')
            .map(|cap| cap.trim().to_lowercase())
            .filter(|cap| !cap.is_empty())
            .collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    /// Comma-joined form forwarded to the registry as the `c` parameter.
    pub fn query_value(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// Keep a record iff the requested set is a subset of its capabilities.
    pub fn accepts(&self, record: &ModelListingRecord) -> bool {
        record.has_capabilities(&self.0)
    }

    pub fn apply(&self, records: Vec<ModelListingRecord>) -> Vec<ModelListingRecord> {
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }

    /// Echo of the filter, sorted.
    pub fn info(&self) -> FilterInfo {
        FilterInfo {
            capabilities: Some(self.0.iter().cloned().collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub sort_order: SortOrder,
    pub filters: Option<FilterInfo>,
    pub results: Vec<ModelListingRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceListingResponse {
    pub queried_namespace: String,
    pub sort_order: SortOrder,
    pub filters: Option<FilterInfo>,
    pub results: Vec<ModelListingRecord>,
}

/// Every tag of one model, as listed on its tags page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllTagsResponse {
    pub name_full_model: String,
    #[serde(flatten)]
    pub identity: ModelIdentity,
    pub tags_page_url: String,
    pub tags: Vec<TagDetailRecord>,
}
