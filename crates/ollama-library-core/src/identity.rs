//! Canonical model and tag identities.
//!
//! A model is addressed by `(namespace, base_name)` and a tag additionally by
//! `tag_part`. All parts are lower-cased on construction, so identity is
//! case-insensitive. The default namespace is omitted from display names:
//! `library/llama3` displays as `llama3`, `jmorganca/codellama` as-is.
//!
//! Resolution combines two sources in priority order:
//! 1. the request or link path (`/<namespace>/<base>[:<tag>]/...`)
//! 2. the name the page reports about itself (a `title` attribute or label)
//!
//! A page name containing `/` overrides both path parts. A bare page name only
//! fills the base name while the namespace is still the default one (or when
//! the path yielded no base name at all).

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};

/// Canonical `(namespace, base_name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelIdentity {
    pub namespace: String,
    #[serde(rename = "model_base_name")]
    pub base_name: String,
}

impl ModelIdentity {
    pub fn new(namespace: &str, base_name: &str) -> Self {
        Self {
            namespace: namespace.trim().to_lowercase(),
            base_name: base_name.trim().to_lowercase(),
        }
    }

    /// Display name: `base` in the default namespace, `namespace/base` elsewhere.
    pub fn full_name(&self, default_namespace: &str) -> String {
        if self.namespace.eq_ignore_ascii_case(default_namespace) {
            self.base_name.clone()
        } else {
            format!("{}/{}", self.namespace, self.base_name)
        }
    }

    /// Registry path of the model page, always namespace-qualified.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.namespace, self.base_name)
    }

    /// Same model under another namespace.
    pub fn in_namespace(&self, namespace: &str) -> Self {
        Self::new(namespace, &self.base_name)
    }

    pub fn with_tag(&self, tag_part: &str) -> TagIdentity {
        TagIdentity {
            model: self.clone(),
            tag_part: tag_part.trim().to_lowercase(),
        }
    }
}

/// A model identity plus the tag part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagIdentity {
    #[serde(flatten)]
    pub model: ModelIdentity,
    pub tag_part: String,
}

impl TagIdentity {
    pub fn new(namespace: &str, base_name: &str, tag_part: &str) -> Self {
        ModelIdentity::new(namespace, base_name).with_tag(tag_part)
    }

    /// Display name: model display name plus `:tag`.
    pub fn full_name(&self, default_namespace: &str) -> String {
        format!("{}:{}", self.model.full_name(default_namespace), self.tag_part)
    }

    /// Registry path of the tag page (`/<namespace>/<base>:<tag>`).
    pub fn path(&self) -> String {
        format!("{}:{}", self.model.path(), self.tag_part)
    }
}

/// Result of resolving an identity from a path and an optional page name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub model: ModelIdentity,
    /// Tag carried by the path (`/library/llama3:8b`), if any.
    pub path_tag: Option<String>,
}

/// Split a URL or bare path into its non-empty path segments.
pub fn path_segments(url_or_path: &str) -> Vec<String> {
    let path = match url::Url::parse(url_or_path) {
        Ok(url) => url.path().to_string(),
        Err(_) => url_or_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Resolve a model identity from path segments and an optional page name.
///
/// Returns `None` when no base name can be derived from either source.
pub fn resolve_identity(
    segments: &[String],
    page_name: Option<&str>,
    default_namespace: &str,
) -> Option<ResolvedIdentity> {
    let default_namespace = default_namespace.to_lowercase();
    let mut namespace = default_namespace.clone();
    let mut base_name = String::new();
    let mut path_tag = None;

    // A lone segment names a namespace, never a model.
    if let [first, second, ..] = segments {
        namespace = first.to_lowercase();
        let (base, tag) = split_tag(second);
        base_name = base;
        path_tag = tag;
    }

    if let Some(name) = page_name.map(str::trim).filter(|n| !n.is_empty()) {
        let name = name.to_lowercase();
        match name.split_once('/') {
            Some((ns, base)) if !ns.is_empty() && !base.is_empty() => {
                namespace = ns.to_string();
                base_name = base.to_string();
            }
            Some(_) => {}
            None if namespace == default_namespace || base_name.is_empty() => {
                base_name = name.clone();
            }
            None => {}
        }
    }

    if base_name.is_empty() {
        return None;
    }

    Some(ResolvedIdentity {
        model: ModelIdentity::new(&namespace, &base_name),
        path_tag,
    })
}

fn split_tag(segment: &str) -> (String, Option<String>) {
    match segment.split_once(':') {
        Some((base, tag)) if !tag.is_empty() => (base.to_lowercase(), Some(tag.to_lowercase())),
        Some((base, _)) => (base.to_lowercase(), None),
        None => (segment.to_lowercase(), None),
    }
}

/// A caller-supplied reference such as `someuser/llama3:8b` or `llama3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelRef {
    pub model: ModelIdentity,
    pub tag_part: Option<String>,
}

impl ModelRef {
    /// Build a reference from already separated parts.
    pub fn new(namespace: &str, base_name: &str, tag_part: Option<&str>) -> Result<Self> {
        let model = ModelIdentity::new(namespace, base_name);
        if model.namespace.is_empty() || model.base_name.is_empty() {
            return Err(LibraryError::IdentityUnresolved {
                source_hint: format!("'{}/{}'", namespace, base_name),
            });
        }
        let tag_part = tag_part
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        Ok(Self { model, tag_part })
    }

    /// Parse `[namespace/]base[:tag]`; a missing namespace means the default one.
    pub fn parse(reference: &str, default_namespace: &str) -> Result<Self> {
        let reference = reference.trim();
        let (name, tag) = match reference.split_once(':') {
            Some((name, tag)) => (name, Some(tag)),
            None => (reference, None),
        };
        match name.split_once('/') {
            Some((namespace, base)) => Self::new(namespace, base, tag),
            None => Self::new(default_namespace, name, tag),
        }
    }

    /// The explicit tag, or `latest` when none was given.
    pub fn tag_or_latest(&self) -> String {
        self.tag_part
            .clone()
            .unwrap_or_else(|| crate::config::RegistryConfig::IMPLICIT_TAG.to_string())
    }

    /// Same reference under another namespace.
    pub fn in_namespace(&self, namespace: &str) -> Self {
        Self {
            model: self.model.in_namespace(namespace),
            tag_part: self.tag_part.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "library";

    fn segs(path: &str) -> Vec<String> {
        path_segments(path)
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ModelIdentity::new("library", "llama3").full_name(DEFAULT), "llama3");
        assert_eq!(
            ModelIdentity::new("jmorganca", "codellama").full_name(DEFAULT),
            "jmorganca/codellama"
        );
        assert_eq!(
            TagIdentity::new("library", "llama3", "8b").full_name(DEFAULT),
            "llama3:8b"
        );
    }

    #[test]
    fn test_identity_is_case_insensitive() {
        assert_eq!(
            ModelIdentity::new("Library", "Llama3"),
            ModelIdentity::new("library", "llama3")
        );
        let upper = resolve_identity(&segs("/Library/Llama3"), None, DEFAULT).unwrap();
        let lower = resolve_identity(&segs("/library/llama3"), None, DEFAULT).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_path_segments_from_url() {
        assert_eq!(
            segs("https://ollama.com/library/llama3:8b?x=1"),
            vec!["library", "llama3:8b"]
        );
        assert_eq!(segs("/jmorganca/codellama/tags"), vec!["jmorganca", "codellama", "tags"]);
    }

    #[test]
    fn test_resolve_from_path_with_tag() {
        let resolved = resolve_identity(&segs("/library/llama3:8B"), None, DEFAULT).unwrap();
        assert_eq!(resolved.model, ModelIdentity::new("library", "llama3"));
        assert_eq!(resolved.path_tag.as_deref(), Some("8b"));
    }

    #[test]
    fn test_lone_segment_is_unresolvable() {
        assert!(resolve_identity(&segs("/library"), None, DEFAULT).is_none());
        assert!(resolve_identity(&[], None, DEFAULT).is_none());
    }

    #[test]
    fn test_qualified_page_name_overrides_path() {
        let resolved =
            resolve_identity(&segs("/library/codellama"), Some("JMorganca/CodeLlama"), DEFAULT)
                .unwrap();
        assert_eq!(resolved.model, ModelIdentity::new("jmorganca", "codellama"));
    }

    #[test]
    fn test_bare_page_name_only_applies_in_default_namespace() {
        let resolved = resolve_identity(&segs("/library/x"), Some("Mistral"), DEFAULT).unwrap();
        assert_eq!(resolved.model.base_name, "mistral");

        let resolved =
            resolve_identity(&segs("/someuser/mymodel"), Some("other"), DEFAULT).unwrap();
        assert_eq!(resolved.model, ModelIdentity::new("someuser", "mymodel"));
    }

    #[test]
    fn test_page_name_rescues_missing_path() {
        let resolved = resolve_identity(&segs("/"), Some("llama3"), DEFAULT).unwrap();
        assert_eq!(resolved.model, ModelIdentity::new("library", "llama3"));
    }

    #[test]
    fn test_model_ref_parse() {
        let r = ModelRef::parse("SomeUser/Llama3:8B", DEFAULT).unwrap();
        assert_eq!(r.model, ModelIdentity::new("someuser", "llama3"));
        assert_eq!(r.tag_part.as_deref(), Some("8b"));

        let r = ModelRef::parse("llama3", DEFAULT).unwrap();
        assert_eq!(r.model.namespace, "library");
        assert_eq!(r.tag_or_latest(), "latest");

        assert!(ModelRef::parse("someuser/", DEFAULT).is_err());
        assert!(ModelRef::parse("", DEFAULT).is_err());
    }
}
