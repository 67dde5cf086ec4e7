//! Record types produced by the page parsers.

mod provenance;
mod records;
mod responses;

pub use provenance::{CacheMeta, Provenance, WithProvenance};
pub use records::{
    BlobKind, BlobRecord, FileEntry, ModelDetailRecord, ModelListingRecord, TagDetailRecord,
    TagSummaryEntry,
};
pub use responses::{
    AllTagsResponse, CapabilityFilter, FilterInfo, NamespaceListingResponse, SearchResponse,
    SortOrder,
};
