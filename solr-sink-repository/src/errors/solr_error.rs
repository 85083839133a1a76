//! Index client error types.
//!
//! This module defines the unified error type for all index client
//! operations, covering both transport failures and malformed responses.

use thiserror::Error;

/// Unified errors from index client operations.
///
/// Used by the `IndexClient` trait and the `SolrClient` implementation.
/// A response that parses but reports a non-zero status is not an error at
/// this level; callers inspect `UpdateResponse::status` themselves.
#[derive(Debug, Clone, Error)]
pub enum SolrError {
    /// The configured endpoint is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to reach the search index or the exchange broke mid-way.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Connect or read timeout elapsed.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The server answered with a non-success HTTP status and a body that is
    /// not a Solr response.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SolrError {
    /// Create an invalid URL error.
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

impl From<reqwest::Error> for SolrError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SolrError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
