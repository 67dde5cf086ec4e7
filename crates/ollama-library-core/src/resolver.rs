//! Request orchestration: fetch, namespace fallback, parse, decorate.
//!
//! Model, tag, all-tags and blob lookups try the caller's namespace first. A
//! not-found answer under any other namespace is retried exactly once under
//! the default namespace, and a record served by that retry is rebased onto
//! the default namespace. Listing and search pages are fetched once.

use crate::config::{LibraryConfig, RegistryConfig};
use crate::error::{LibraryError, Result};
use crate::extract::{decode_structured_content, BlobContentPlan};
use crate::fetch::{DynPageFetcher, FetchedPage};
use crate::identity::{ModelIdentity, TagIdentity};
use crate::models::{
    AllTagsResponse, BlobKind, BlobRecord, CacheMeta, CapabilityFilter, ModelDetailRecord,
    ModelListingRecord, NamespaceListingResponse, Provenance, SearchResponse, SortOrder, WithProvenance,
};
use crate::normalize::{parse_gguf_snippet, parse_relative_date};
use crate::parse::{
    parse_all_tags_page, parse_blob_content_page, parse_listing_page, parse_model_page,
    ParseContext,
};
use chrono::Utc;
use tracing::{debug, info, warn};

/// A model-scoped page and the identity it was served for.
struct ServedPage {
    page: FetchedPage,
    identity: ModelIdentity,
    fell_back: bool,
}

/// Entry point for every registry lookup.
#[derive(Clone)]
pub struct LibraryResolver {
    fetcher: DynPageFetcher,
    config: LibraryConfig,
}

impl LibraryResolver {
    pub fn new(fetcher: DynPageFetcher) -> Self {
        Self::with_config(fetcher, LibraryConfig::default())
    }

    pub fn with_config(fetcher: DynPageFetcher, config: LibraryConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Search the registry.
    pub async fn search(
        &self,
        query: Option<&str>,
        sort_order: SortOrder,
        capabilities: Option<&str>,
    ) -> Result<WithProvenance<SearchResponse>> {
        let filter = CapabilityFilter::parse(capabilities);
        let mut params = vec![
            ("q".to_string(), query.unwrap_or_default().to_string()),
            ("o".to_string(), sort_order.as_str().to_string()),
        ];
        if let Some(filter) = &filter {
            params.push(("c".to_string(), filter.query_value()));
        }

        let url = self.config.page_url("/search");
        let page = self.fetch_page(&url, &params, "search results").await?;
        let results = self.parse_listing(&page, filter.as_ref());
        debug!("Search {:?} returned {} models", query, results.len());

        Ok(self.provenance(&page.cache).attach(SearchResponse {
            query: query.map(str::to_string),
            sort_order,
            filters: filter.map(|f| f.info()),
            results,
        }))
    }

    /// List the models of one namespace.
    pub async fn list_namespace(
        &self,
        namespace: &str,
        sort_order: SortOrder,
        capabilities: Option<&str>,
    ) -> Result<WithProvenance<NamespaceListingResponse>> {
        let namespace = namespace.trim().to_lowercase();
        if namespace.is_empty() || namespace.contains('/') {
            return Err(LibraryError::Validation {
                field: "namespace".to_string(),
                message: format!("'{}' is not a namespace", namespace),
            });
        }

        let filter = CapabilityFilter::parse(capabilities);
        let mut params = vec![("sort".to_string(), sort_order.as_str().to_string())];
        if let Some(filter) = &filter {
            params.push(("c".to_string(), filter.query_value()));
        }

        let url = self.config.page_url(&namespace);
        let resource = format!("namespace '{}'", namespace);
        let page = self.fetch_page(&url, &params, &resource).await?;
        let results = self.parse_listing(&page, filter.as_ref());

        Ok(self.provenance(&page.cache).attach(NamespaceListingResponse {
            queried_namespace: namespace,
            sort_order,
            filters: filter.map(|f| f.info()),
            results,
        }))
    }

    /// Details of a model page.
    pub async fn model_details(
        &self,
        model: &ModelIdentity,
    ) -> Result<WithProvenance<ModelDetailRecord>> {
        let resource = format!("model '{}'", model.full_name(&self.config.default_namespace));
        let served = self
            .fetch_with_fallback(model, &resource, |m| m.path())
            .await?;
        let record = self.parse_detail(&served)?;
        Ok(self.provenance(&served.page.cache).attach(record))
    }

    /// Details of a tag page; the requested tag is always the active one.
    pub async fn tag_details(&self, tag: &TagIdentity) -> Result<WithProvenance<ModelDetailRecord>> {
        let (page, record) = self.load_tag_page(tag).await?;
        Ok(self.provenance(&page.cache).attach(record))
    }

    /// Every tag of a model, from its tags page.
    pub async fn all_tags(&self, model: &ModelIdentity) -> Result<WithProvenance<AllTagsResponse>> {
        let resource = format!(
            "tags of model '{}'",
            model.full_name(&self.config.default_namespace)
        );
        let served = self
            .fetch_with_fallback(model, &resource, |m| format!("{}/tags", m.path()))
            .await?;
        let ctx = ParseContext::new(&self.config, &served.page.url);
        let response = parse_all_tags_page(&served.page.body, &ctx, &served.identity);
        Ok(self.provenance(&served.page.cache).attach(response))
    }

    /// Details of one blob of a tag, addressed by file name or digest prefix.
    pub async fn blob_details(
        &self,
        tag: &TagIdentity,
        blob: &str,
    ) -> Result<WithProvenance<BlobRecord>> {
        let (page, record) = self.load_tag_page(tag).await?;
        let default_ns = &self.config.default_namespace;
        let served_tag = record.identity.with_tag(&tag.tag_part);
        let name_full_tag = served_tag.full_name(default_ns);

        let entry = record.find_file(blob).cloned().ok_or_else(|| {
            LibraryError::not_found(format!("blob '{}' of '{}'", blob.trim(), name_full_tag))
        })?;
        let kind = BlobKind::classify(&entry.name);
        let mut provenance = self.provenance(&page.cache);

        let mut text_content = None;
        let mut parsed_json_content = None;
        let mut gguf_metadata_snippet = None;
        let mut parsed_gguf_metadata = None;

        match BlobContentPlan::for_kind(&kind) {
            BlobContentPlan::FetchText { decode_structured } => {
                let text = match self.fetch_blob_text(&entry.blob_url).await {
                    Ok((text, blob_cache)) => {
                        provenance = self.provenance(&blob_cache);
                        text
                    }
                    Err(e) => {
                        warn!(
                            "Failed to fetch {} blob of {}, using listing snippet: {}",
                            kind, name_full_tag, e
                        );
                        entry.snippet.clone()
                    }
                };
                if decode_structured {
                    parsed_json_content = decode_structured_content(&text);
                }
                text_content = Some(text);
            }
            BlobContentPlan::GgufSnippet => {
                if !entry.snippet.is_empty() {
                    parsed_gguf_metadata = parse_gguf_snippet(&entry.snippet);
                    gguf_metadata_snippet = Some(entry.snippet.clone());
                }
            }
            BlobContentPlan::SnippetText => text_content = Some(entry.snippet.clone()),
        }

        let listing_updated_iso = entry
            .updated_str
            .as_deref()
            .map(|updated| parse_relative_date(updated, Utc::now()));

        Ok(provenance.attach(BlobRecord {
            name_full_tag,
            canonical_name: entry.name.clone(),
            kind,
            source_url: entry.blob_url.clone(),
            digest: entry
                .digest
                .clone()
                .unwrap_or_else(|| RegistryConfig::UNKNOWN_DIGEST.to_string()),
            size_str: entry.size_str.clone(),
            text_content,
            parsed_json_content,
            gguf_metadata_snippet,
            parsed_gguf_metadata,
            listing_updated_str: entry.updated_str,
            listing_updated_iso,
        }))
    }

    async fn load_tag_page(&self, tag: &TagIdentity) -> Result<(FetchedPage, ModelDetailRecord)> {
        let resource = format!("tag '{}'", tag.full_name(&self.config.default_namespace));
        let served = self
            .fetch_with_fallback(&tag.model, &resource, |m| m.with_tag(&tag.tag_part).path())
            .await?;
        let mut record = self.parse_detail(&served)?;
        record.set_active_tag(Some(&tag.tag_part), &self.config.default_namespace);
        Ok((served.page, record))
    }

    fn parse_detail(&self, served: &ServedPage) -> Result<ModelDetailRecord> {
        let ctx = ParseContext::new(&self.config, &served.page.url);
        let mut record = parse_model_page(&served.page.body, &ctx)?;
        if served.fell_back {
            record.rebase_namespace(&served.identity.namespace, &self.config.default_namespace);
        }
        Ok(record)
    }

    fn parse_listing(
        &self,
        page: &FetchedPage,
        filter: Option<&CapabilityFilter>,
    ) -> Vec<ModelListingRecord> {
        let ctx = ParseContext::new(&self.config, &page.url);
        let records = parse_listing_page(&page.body, &ctx);
        match filter {
            Some(filter) => filter.apply(records),
            None => records,
        }
    }

    async fn fetch_blob_text(&self, blob_url: &str) -> Result<(String, CacheMeta)> {
        let page = self.fetch_page(blob_url, &[], "blob content").await?;
        if !page.is_html() {
            return Ok((page.body, page.cache));
        }
        let text = parse_blob_content_page(&page.body)
            .ok_or_else(|| LibraryError::not_found(format!("content block in {}", blob_url)))?;
        Ok((text, page.cache))
    }

    /// Fetch a model-scoped page, retrying once under the default namespace.
    async fn fetch_with_fallback<F>(
        &self,
        model: &ModelIdentity,
        resource: &str,
        path_for: F,
    ) -> Result<ServedPage>
    where
        F: Fn(&ModelIdentity) -> String,
    {
        let url = self.config.page_url(&path_for(model));
        match self.fetch_page(&url, &[], resource).await {
            Err(e) if e.is_not_found() && !self.config.is_default_namespace(&model.namespace) => {
                let fallback = model.in_namespace(&self.config.default_namespace);
                info!(
                    "{} not found under namespace '{}', retrying under '{}'",
                    resource, model.namespace, fallback.namespace
                );
                let url = self.config.page_url(&path_for(&fallback));
                let page = self.fetch_page(&url, &[], resource).await?;
                Ok(ServedPage {
                    page,
                    identity: fallback,
                    fell_back: true,
                })
            }
            other => other.map(|page| ServedPage {
                page,
                identity: model.clone(),
                fell_back: false,
            }),
        }
    }

    /// Fetch one document, mapping 404 to not-found and other failures to
    /// transport errors.
    async fn fetch_page(
        &self,
        url: &str,
        params: &[(String, String)],
        resource: &str,
    ) -> Result<FetchedPage> {
        debug!("Fetching {}", url);
        let page = self.fetcher.fetch(url, params).await.map_err(|e| match e {
            LibraryError::Transport { .. } => e,
            e if e.is_not_found() => e,
            other => LibraryError::transport(format!("{} could not be fetched: {}", url, other), None),
        })?;
        if page.is_success() {
            Ok(page)
        } else if page.is_not_found() {
            Err(LibraryError::not_found(resource))
        } else {
            Err(LibraryError::transport(
                format!("{} answered HTTP {}", url, page.status),
                Some(page.status),
            ))
        }
    }

    fn provenance(&self, cache: &CacheMeta) -> Provenance {
        Provenance::from_cache_meta(cache, self.config.cache_ttl)
    }
}
