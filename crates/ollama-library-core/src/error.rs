//! Error types for the library extraction engine.
//!
//! Malformed markup never produces an error here; extractors degrade to
//! defaults instead. Only unresolvable identities, missing resources,
//! transport failures and invalid caller input surface as errors.

use thiserror::Error;

/// Main error type for the ollama library engine.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Could not resolve a model identity from {source_hint}")]
    IdentityUnresolved { source_hint: String },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// Upstream status code, when the request completed at all.
        status_code: Option<u16>,
    },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl LibraryError {
    /// Build a not-found error for the given resource description.
    pub fn not_found(resource: impl Into<String>) -> Self {
        LibraryError::NotFound {
            resource: resource.into(),
        }
    }

    /// Build a transport error, optionally carrying the upstream status.
    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        LibraryError::Transport {
            message: message.into(),
            status_code,
        }
    }

    /// HTTP status the routing layer should answer with.
    ///
    /// - 404: missing resource or unresolvable identity
    /// - 503: upstream transport failure
    /// - 400: invalid caller input
    /// - 500: everything else
    pub fn http_status(&self) -> u16 {
        match self {
            LibraryError::NotFound { .. } | LibraryError::IdentityUnresolved { .. } => 404,
            LibraryError::Transport { .. } => 503,
            LibraryError::Validation { .. } => 400,
            LibraryError::Json { .. } | LibraryError::Url(_) => 500,
        }
    }

    /// Whether this error is surfaced to callers as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibraryError::NotFound { .. } | LibraryError::IdentityUnresolved { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LibraryError::not_found("model 'someuser/llama3'");
        assert_eq!(err.to_string(), "Not found: model 'someuser/llama3'");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(LibraryError::not_found("x").http_status(), 404);
        assert_eq!(
            LibraryError::IdentityUnresolved {
                source_hint: "/library".into()
            }
            .http_status(),
            404
        );
        assert_eq!(LibraryError::transport("boom", Some(502)).http_status(), 503);
        assert_eq!(
            LibraryError::Validation {
                field: "o".into(),
                message: "bad".into()
            }
            .http_status(),
            400
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(LibraryError::not_found("x").is_not_found());
        assert!(!LibraryError::transport("timeout", None).is_not_found());
    }
}
