//! Fetch/cache provenance attached to every top-level response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache facts as reported by the fetch collaborator for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMeta {
    /// When the document was fetched or revalidated.
    pub fetched_at: DateTime<Utc>,
    /// When the cached copy was written, if served from a cache store.
    pub cached_at: Option<DateTime<Utc>>,
    /// Expiry reported by the store, if any.
    pub expires_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
}

impl CacheMeta {
    /// Metadata for a document fetched fresh at `fetched_at`.
    pub fn fresh(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            cached_at: None,
            expires_at: None,
            from_cache: false,
        }
    }

    /// Metadata for a document served from a cache entry written at `cached_at`.
    pub fn cached(fetched_at: DateTime<Utc>, cached_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            cached_at: Some(cached_at),
            expires_at: None,
            from_cache: true,
        }
    }
}

/// Provenance of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub fetched_at: DateTime<Utc>,
    pub cached_at: Option<DateTime<Utc>>,
    pub cache_expires_at: Option<DateTime<Utc>>,
    pub from_cache: bool,
}

impl Provenance {
    /// Derive provenance from store metadata.
    ///
    /// When the store reports a write time but no expiry, the expiry is the
    /// write time plus `ttl`.
    pub fn from_cache_meta(meta: &CacheMeta, ttl: Duration) -> Self {
        let cache_expires_at = meta.expires_at.or_else(|| {
            let ttl = chrono::Duration::from_std(ttl).ok()?;
            meta.cached_at
                .and_then(|cached_at| cached_at.checked_add_signed(ttl))
        });

        Self {
            fetched_at: meta.fetched_at,
            cached_at: meta.cached_at,
            cache_expires_at,
            from_cache: meta.from_cache,
        }
    }

    /// Decorate a record with this provenance.
    pub fn attach<T>(self, record: T) -> WithProvenance<T> {
        WithProvenance {
            record,
            provenance: self,
        }
    }
}

/// A top-level response: the record with provenance fields flattened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithProvenance<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl<T> WithProvenance<T> {
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T> std::ops::Deref for WithProvenance<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expiry_derived_from_ttl() {
        let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let cached = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let meta = CacheMeta::cached(fetched, cached);

        let provenance = Provenance::from_cache_meta(&meta, Duration::from_secs(6 * 3600));
        assert!(provenance.from_cache);
        assert_eq!(
            provenance.cache_expires_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_reported_expiry_wins() {
        let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let expires = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let mut meta = CacheMeta::cached(fetched, fetched);
        meta.expires_at = Some(expires);

        let provenance = Provenance::from_cache_meta(&meta, Duration::from_secs(60));
        assert_eq!(provenance.cache_expires_at, Some(expires));
    }

    #[test]
    fn test_fresh_fetch_has_no_cache_times() {
        let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let provenance =
            Provenance::from_cache_meta(&CacheMeta::fresh(fetched), Duration::from_secs(60));
        assert_eq!(provenance.cached_at, None);
        assert_eq!(provenance.cache_expires_at, None);
        assert!(!provenance.from_cache);
    }

    #[test]
    fn test_provenance_is_flattened() {
        let fetched = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let provenance =
            Provenance::from_cache_meta(&CacheMeta::fresh(fetched), Duration::from_secs(60));
        let value = serde_json::to_value(provenance.attach(serde_json::json!({"name": "llama3"})))
            .unwrap();
        assert_eq!(value["name"], "llama3");
        assert_eq!(value["from_cache"], false);
    }
}
