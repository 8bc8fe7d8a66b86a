//! Error types used throughout the toolkit

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the Arize toolkit
///
/// `Query` and `NotFound` form the query-error family: both carry the static
/// description of the GraphQL operation that produced them plus the upstream
/// detail. Callers branch on [`ArizeError::is_not_found`] instead of matching
/// message text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArizeError {
    /// Input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream GraphQL error, transport failure or malformed response
    #[error("{description}: {detail}")]
    Query { description: String, detail: String },

    /// The expected node was absent or null
    #[error("{description}: {detail}")]
    NotFound { description: String, detail: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArizeError {
    /// Build a query error carrying the operation's static description.
    pub fn query(description: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Query { description: description.into(), detail: detail.into() }
    }

    /// Build a not-found error carrying the operation's static description.
    pub fn not_found(description: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound { description: description.into(), detail: detail.into() }
    }

    /// True for the structured not-found kind, and for upstream query errors
    /// whose detail text carries the phrase "not found".
    ///
    /// The second arm exists because the platform reports some missing
    /// resources only through the GraphQL `errors` array.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Query { detail, .. } => detail.to_ascii_lowercase().contains("not found"),
            _ => false,
        }
    }

    /// True for every error raised by a query descriptor.
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query { .. } | Self::NotFound { .. })
    }

    /// True for authentication failures, raw or re-wrapped by an executor.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::Query { detail, .. } => detail.starts_with(AUTH_DETAIL_PREFIX),
            _ => false,
        }
    }

    /// True when the failure happened before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Re-wrap any error as a query error for `description`.
    ///
    /// Errors that already belong to the query family or are validation
    /// failures pass through unchanged.
    pub fn into_query(self, description: &str) -> Self {
        match self {
            Self::Query { .. } | Self::NotFound { .. } | Self::Validation(_) => self,
            other => Self::query(description, other.to_string()),
        }
    }
}

/// Leading text of an `Auth` error's display form.
const AUTH_DETAIL_PREFIX: &str = "Authentication error: ";

impl From<serde_json::Error> for ArizeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

/// Result type alias for toolkit operations
pub type Result<T> = std::result::Result<T, ArizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_contains_phrase() {
        let err = ArizeError::not_found("Get model by name", "model 'churn' not found");
        assert_eq!(err.to_string(), "Get model by name: model 'churn' not found");
        assert!(err.is_not_found());
        assert!(err.is_query_error());
    }

    #[test]
    fn query_detail_with_phrase_counts_as_not_found() {
        let err = ArizeError::query("Delete monitor", "GraphQL errors: Monitor Not Found");
        assert!(err.is_not_found());

        let other = ArizeError::query("Delete monitor", "GraphQL errors: permission denied");
        assert!(!other.is_not_found());
        assert!(other.is_query_error());
    }

    #[test]
    fn into_query_wraps_transport_errors_only() {
        let wrapped = ArizeError::Network("connection refused".into()).into_query("Get all models");
        assert_eq!(
            wrapped,
            ArizeError::query("Get all models", "Network error: connection refused")
        );

        let validation = ArizeError::Validation("missing model_name".into());
        assert_eq!(validation.clone().into_query("Get all models"), validation);
    }

    #[test]
    fn auth_survives_query_wrapping() {
        let wrapped = ArizeError::Auth("HTTP 401 Unauthorized".into()).into_query("Error importing dataset");
        assert!(wrapped.is_query_error());
        assert!(wrapped.is_auth());

        assert!(!ArizeError::Network("HTTP 500".into()).into_query("Error importing dataset").is_auth());
        assert!(!ArizeError::query("Error importing dataset", "Authentication is disabled").is_auth());
    }
}
