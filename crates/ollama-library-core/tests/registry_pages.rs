//! End-to-end tests over captured registry pages.
//!
//! Parsers are driven directly with full HTML fixtures, and the resolver is
//! driven through an in-memory fetcher serving the same fixtures.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use ollama_library::{
    parse_all_tags_page, parse_blob_content_page, parse_listing_page, parse_model_page,
    BlobKind, CacheMeta, FetchedPage, LibraryConfig, LibraryResolver, ModelIdentity, ModelRef,
    PageFetcher, ParseContext, Result, TagIdentity,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const LISTING: &str = include_str!("fixtures/library_listing.html");
const MODEL: &str = include_str!("fixtures/llama3_model.html");
const BARE_MODEL: &str = include_str!("fixtures/bare_model.html");
const TAGS: &str = include_str!("fixtures/llama3_tags.html");
const PARAMS_BLOB: &str = include_str!("fixtures/params_blob.html");

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
}

/// Serves fixtures by absolute URL; everything else answers 404.
struct FixtureFetcher {
    pages: HashMap<String, &'static str>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    fn new(pages: &[(&str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(path, body)| (format!("https://ollama.com{}", path), *body))
                .collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str, _params: &[(String, String)]) -> Result<FetchedPage> {
        self.requests.lock().unwrap().push(url.to_string());
        let cache = CacheMeta::fresh(now());
        Ok(match self.pages.get(url) {
            Some(body) => FetchedPage::new(url, 200, *body, cache).with_content_type("text/html"),
            None => FetchedPage::new(url, 404, "Not Found", cache),
        })
    }
}

#[test]
fn test_listing_page_end_to_end() {
    let config = LibraryConfig::default();
    let ctx = ParseContext::new(&config, "https://ollama.com/library").at(now());
    let records = parse_listing_page(LISTING, &ctx);
    assert_eq!(records.len(), 2);

    let llama = &records[0];
    assert_eq!(llama.name_full_model, "llama3.1");
    assert_eq!(llama.source_url, "https://ollama.com/library/llama3.1");
    assert!(llama.description.starts_with("Llama 3.1 is a new state-of-the-art model"));
    assert_eq!(llama.pull_count, 103_400_000);
    assert_eq!(llama.tags_count, 93);
    assert_eq!(llama.capabilities, vec!["tools"]);
    assert_eq!(llama.sizes, vec!["8b", "70b", "405b"]);
    assert_eq!(
        llama.last_updated_iso,
        Utc.with_ymd_and_hms(2024, 12, 12, 18, 25, 0).unwrap()
    );

    let llava = &records[1];
    assert_eq!(llava.pull_count, 8_302_114);
    assert_eq!(llava.last_updated_str, "2 weeks ago");
    assert_eq!(llava.last_updated_iso, now() - Duration::weeks(2));
}

#[test]
fn test_model_page_end_to_end() {
    let config = LibraryConfig::default();
    let ctx = ParseContext::new(&config, "https://ollama.com/library/llama3").at(now());
    let record = parse_model_page(MODEL, &ctx).unwrap();

    assert_eq!(record.name_full_model, "llama3");
    assert_eq!(
        record.summary,
        "Meta Llama 3: The most capable openly available LLM to date"
    );
    assert_eq!(record.pull_count, 7_600_000);
    assert_eq!(record.active_tag_part.as_deref(), Some("latest"));
    assert_eq!(record.total_tags_count_from_link, Some(68));
    assert_eq!(record.all_tags_page_url, "https://ollama.com/library/llama3/tags");
    assert!(record.readme_content.starts_with("<div id=\"display\""));

    let tags: Vec<&str> = record
        .all_tags_dropdown_summary
        .iter()
        .map(|e| e.tag_part.as_str())
        .collect();
    assert_eq!(tags, vec!["latest", "8b", "70b"]);

    let names: Vec<&str> = record
        .tag_files_summary
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["model", "license", "template", "params"]);
    assert!(record
        .tag_files_summary
        .iter()
        .all(|f| f.updated_str.as_deref() == Some("1 year ago") && f.digest.is_some()));
}

#[test]
fn test_missing_summary_degrades_to_empty() {
    let config = LibraryConfig::default();
    let ctx = ParseContext::new(&config, "https://ollama.com/someuser/mymodel");
    let record = parse_model_page(BARE_MODEL, &ctx).unwrap();
    assert_eq!(record.name_full_model, "someuser/mymodel");
    assert_eq!(record.summary, "");
    assert_eq!(record.readme_content, "");
    assert_eq!(record.pull_count, 12);
    assert_eq!(
        record.all_tags_page_url,
        "https://ollama.com/someuser/mymodel/tags"
    );
}

#[test]
fn test_active_flag_invariant() {
    let config = LibraryConfig::default();
    for (url, expected) in [
        ("https://ollama.com/library/llama3", "latest"),
        ("https://ollama.com/library/llama3:70b", "70b"),
        ("https://ollama.com/library/llama3:8B", "8b"),
        ("https://ollama.com/library/llama3:q4_k_m", "q4_k_m"),
    ] {
        let ctx = ParseContext::new(&config, url);
        let record = parse_model_page(MODEL, &ctx).unwrap();
        assert_eq!(record.active_tag_part.as_deref(), Some(expected));
        for entry in &record.all_tags_dropdown_summary {
            assert_eq!(entry.is_active, entry.tag_part == expected, "{}", url);
        }
        assert!(
            record
                .all_tags_dropdown_summary
                .iter()
                .filter(|e| e.is_active)
                .count()
                <= 1
        );
    }
}

#[test]
fn test_all_tags_row_filtering() {
    let config = LibraryConfig::default();
    let ctx = ParseContext::new(&config, "https://ollama.com/library/llama3/tags").at(now());
    let response = parse_all_tags_page(TAGS, &ctx, &ModelIdentity::new("library", "llama3"));

    let tags: Vec<&str> = response
        .tags
        .iter()
        .map(|t| t.identity.tag_part.as_str())
        .collect();
    assert_eq!(tags, vec!["latest", "70b", "8b-instruct-q8_0"]);

    let latest = &response.tags[0];
    assert!(latest.is_default);
    assert_eq!(latest.digest, "365c0bd3c000");
    assert_eq!(latest.size_str, "4.7GB");
    assert_eq!(latest.context_window_str.as_deref(), Some("8K"));
    assert_eq!(latest.input_type.as_deref(), Some("Text"));
    assert_eq!(
        latest.modified_iso,
        Utc.with_ymd_and_hms(2024, 7, 17, 15, 49, 0).unwrap()
    );

    let big = &response.tags[1];
    assert!(!big.is_default);
    assert_eq!(big.context_window_str, None);
    assert_eq!(big.input_type, None);
    assert_eq!(big.size_bytes, 40 * 1024 * 1024 * 1024);

    let narrow = &response.tags[2];
    assert_eq!(narrow.digest, "1b5f6ab2f8d4");
    assert_eq!(narrow.size_str, "8.5GB");
    assert_eq!(narrow.input_type.as_deref(), Some("Text"));
    assert_eq!(narrow.modified_str, "3 weeks ago");
    assert_eq!(narrow.modified_iso, now() - Duration::weeks(3));
}

#[test]
fn test_blob_content_page() {
    let text = parse_blob_content_page(PARAMS_BLOB).unwrap();
    assert!(text.starts_with("{\n    \"num_keep\": 24"));
    assert!(text.contains("<|eot_id|>"));
}

#[tokio::test]
async fn test_namespace_fallback_through_resolver() {
    let fetcher = FixtureFetcher::new(&[
        ("/library/llama3", MODEL),
        ("/library/llama3/tags", TAGS),
    ]);
    let resolver = LibraryResolver::new(fetcher.clone());
    let reference = ModelRef::parse("someuser/llama3", "library").unwrap();

    let model = resolver.model_details(&reference.model).await.unwrap();
    assert_eq!(model.identity, ModelIdentity::new("library", "llama3"));
    assert_eq!(model.name_full_model, "llama3");

    let tags = resolver.all_tags(&reference.model).await.unwrap();
    assert_eq!(tags.tags.len(), 3);

    assert_eq!(
        fetcher.requested(),
        vec![
            "https://ollama.com/someuser/llama3",
            "https://ollama.com/library/llama3",
            "https://ollama.com/someuser/llama3/tags",
            "https://ollama.com/library/llama3/tags",
        ]
    );
}

#[tokio::test]
async fn test_params_blob_through_resolver() {
    let fetcher = FixtureFetcher::new(&[
        ("/library/llama3:latest", MODEL),
        ("/library/llama3:latest/blobs/577073ffcc6c", PARAMS_BLOB),
    ]);
    let resolver = LibraryResolver::new(fetcher.clone());
    let tag = TagIdentity::new("library", "llama3", "latest");

    let blob = resolver.blob_details(&tag, "577073").await.unwrap();
    assert_eq!(blob.kind, BlobKind::Params);
    assert_eq!(blob.name_full_tag, "llama3:latest");
    assert_eq!(blob.size_str, "110B");
    let json = blob.parsed_json_content.as_ref().unwrap();
    assert_eq!(json["num_keep"], 24);
    assert_eq!(json["stop"].as_array().map(Vec::len), Some(3));

    let serialized = serde_json::to_value(&blob).unwrap();
    assert_eq!(serialized["kind"], "params");
    assert_eq!(serialized["from_cache"], false);
    assert!(serialized.get("fetched_at").is_some());
}

#[tokio::test]
async fn test_tag_details_serialize_flat() {
    let fetcher = FixtureFetcher::new(&[("/library/llama3:70b", MODEL)]);
    let resolver = LibraryResolver::new(fetcher);
    let tag = TagIdentity::new("library", "llama3", "70b");

    let response = resolver.tag_details(&tag).await.unwrap();
    let serialized = serde_json::to_value(&response).unwrap();
    assert_eq!(serialized["namespace"], "library");
    assert_eq!(serialized["model_base_name"], "llama3");
    assert_eq!(serialized["active_tag_full_name"], "llama3:70b");
    assert_eq!(serialized["from_cache"], false);
}
