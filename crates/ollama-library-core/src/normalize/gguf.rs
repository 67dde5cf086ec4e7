//! GGUF metadata extraction from the free-text snippet of a `model` blob row.
//!
//! Snippets look like `"arch llama · parameters 8.03B · quantization Q4_0"`
//! or the terse `"llama · 7b · Q4_0"`.

use crate::config::RegistryConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

const LABEL_KEYS: &[&str] = &["arch", "parameters", "quantization"];

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[·,\s]+").expect("separator regex must compile"));

static PARAMETER_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?[a-z]+$").expect("parameter regex must compile"));

static QUANTIZATION_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[fq]\d+(_\d+|[a-z_]+)?$").expect("quantization regex must compile")
});

/// Facts about a GGUF weight blob.
///
/// The key set is open: explicit `key:value` tokens other than the three
/// known keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GgufMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantization: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl GgufMetadata {
    fn is_empty(&self) -> bool {
        self.arch.is_none()
            && self.parameters.is_none()
            && self.quantization.is_none()
            && self.extra.is_empty()
    }

    fn set_keyed(&mut self, key: &str, value: &str) {
        match key {
            "arch" => self.arch = Some(value.to_string()),
            "parameters" => self.parameters = Some(value.to_uppercase()),
            "quantization" => self.quantization = Some(value.to_uppercase()),
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    fn apply_heuristics(&mut self, token: &str) {
        let is_word = token.chars().all(|c| c.is_alphanumeric() || c == '_');
        let has_digit = token.chars().any(|c| c.is_ascii_digit());

        if is_word && !has_digit && self.arch.is_none() {
            self.arch = Some(token.to_string());
        } else if PARAMETER_SHAPE.is_match(token) && self.parameters.is_none() {
            self.parameters = Some(token.to_uppercase());
        } else if is_quantization(token) && self.quantization.is_none() {
            self.quantization = Some(token.to_uppercase());
        }
    }
}

fn is_quantization(token: &str) -> bool {
    QUANTIZATION_SHAPE.is_match(token) || RegistryConfig::KNOWN_QUANTIZATIONS.contains(&token)
}

/// Parse a metadata snippet; `None` when no token is recognized.
pub fn parse_gguf_snippet(snippet: &str) -> Option<GgufMetadata> {
    let lowered = snippet.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = SEPARATORS
        .split(&lowered)
        .filter(|t| !t.is_empty())
        .collect();

    let mut metadata = GgufMetadata::default();
    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        index += 1;

        match token.split_once(':') {
            Some((key, value)) if !key.is_empty() => {
                // "arch: llama" splits into "arch:" and "llama"
                let value = if value.is_empty() {
                    match tokens.get(index) {
                        Some(next) if !next.contains(':') => {
                            index += 1;
                            *next
                        }
                        _ => continue,
                    }
                } else {
                    value
                };
                metadata.set_keyed(key, value);
            }
            Some(_) => {}
            // Explorer rows label values with a bare word: "arch llama"
            None if LABEL_KEYS.contains(&token) => match tokens.get(index) {
                Some(next) if !next.contains(':') => {
                    index += 1;
                    metadata.set_keyed(token, next);
                }
                _ => {}
            },
            None => metadata.apply_heuristics(token),
        }
    }

    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_and_heuristic_tokens() {
        let parsed = parse_gguf_snippet("arch: llama · 7b · Q4_0").unwrap();
        assert_eq!(parsed.arch.as_deref(), Some("llama"));
        assert_eq!(parsed.parameters.as_deref(), Some("7B"));
        assert_eq!(parsed.quantization.as_deref(), Some("Q4_0"));
        assert!(parsed.extra.is_empty());
    }

    #[test]
    fn test_labelled_explorer_snippet() {
        let parsed = parse_gguf_snippet("arch llama · parameters 8.03B · quantization Q4_0").unwrap();
        assert_eq!(parsed.arch.as_deref(), Some("llama"));
        assert_eq!(parsed.parameters.as_deref(), Some("8.03B"));
        assert_eq!(parsed.quantization.as_deref(), Some("Q4_0"));
    }

    #[test]
    fn test_unkeyed_tokens() {
        let parsed = parse_gguf_snippet("qwen2 · 7.62b · q4_k_m").unwrap();
        // "qwen2" carries a digit, so it cannot be an architecture
        assert_eq!(parsed.arch, None);
        assert_eq!(parsed.parameters.as_deref(), Some("7.62B"));
        assert_eq!(parsed.quantization.as_deref(), Some("Q4_K_M"));
    }

    #[test]
    fn test_first_heuristic_match_wins() {
        let parsed = parse_gguf_snippet("llama, mistral, 8b, 70b, f16").unwrap();
        assert_eq!(parsed.arch.as_deref(), Some("llama"));
        assert_eq!(parsed.parameters.as_deref(), Some("8B"));
        assert_eq!(parsed.quantization.as_deref(), Some("F16"));
    }

    #[test]
    fn test_extra_keys_pass_through() {
        let parsed = parse_gguf_snippet("arch:llama context:8192").unwrap();
        assert_eq!(parsed.arch.as_deref(), Some("llama"));
        assert_eq!(parsed.extra.get("context").map(String::as_str), Some("8192"));
    }

    #[test]
    fn test_unrecognized_snippet() {
        assert_eq!(parse_gguf_snippet(""), None);
        assert_eq!(parse_gguf_snippet("1.2.3 --- 42"), None);
    }
}
