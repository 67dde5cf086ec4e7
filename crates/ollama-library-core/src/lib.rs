//! Ollama Library - extraction engine for ollama.com registry pages.
//!
//! Turns listing, model, tag, all-tags and blob pages into typed records with
//! canonical identities, normalized counts, sizes and dates, and fetch
//! provenance. Network I/O is delegated to a caller-supplied [`PageFetcher`];
//! the engine itself only parses and orchestrates.
//!
//! # Example
//!
//! ```rust,ignore
//! use ollama_library::{LibraryResolver, ModelIdentity, TagIdentity};
//!
//! async fn show(fetcher: ollama_library::DynPageFetcher) -> ollama_library::Result<()> {
//!     let resolver = LibraryResolver::new(fetcher);
//!
//!     let model = resolver.model_details(&ModelIdentity::new("library", "llama3")).await?;
//!     println!("{} has {} tags", model.name_full_model, model.all_tags_dropdown_summary.len());
//!
//!     let tag = TagIdentity::new("library", "llama3", "8b");
//!     let params = resolver.blob_details(&tag, "params").await?;
//!     println!("{:?}", params.parsed_json_content);
//!
//!     Ok(())
//! }
//! ```

pub mod active_tag;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod identity;
pub mod markup;
pub mod models;
pub mod normalize;
pub mod parse;

mod resolver;

// Re-export commonly used types
pub use config::{LibraryConfig, RegistryConfig};
pub use error::{LibraryError, Result};
pub use fetch::{DynPageFetcher, FetchedPage, PageFetcher};
pub use identity::{ModelIdentity, ModelRef, TagIdentity};
pub use markup::{Document, MarkupNode};
pub use models::{
    AllTagsResponse, BlobKind, BlobRecord, CacheMeta, CapabilityFilter, FileEntry, FilterInfo,
    ModelDetailRecord, ModelListingRecord, NamespaceListingResponse, Provenance,
    SearchResponse, SortOrder, TagDetailRecord, TagSummaryEntry, WithProvenance,
};
pub use normalize::GgufMetadata;
pub use parse::{
    parse_all_tags_page, parse_blob_content_page, parse_listing_page, parse_model_page,
    ParseContext,
};
pub use resolver::LibraryResolver;
