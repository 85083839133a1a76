//! Error types for the Solr row sink.

use thiserror::Error;

/// Errors that can stop a stream instance.
///
/// Every variant is fatal for the stream. Commit failures are deliberately
/// absent: they are reported as `CommitOutcome::Failed` and only logged.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A configured source field is missing from the row schema.
    #[error("Could not find field [{field}] in the input row")]
    FieldNotFound { field: String },

    /// Invalid field mapping or processor configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A document could not be added to the index.
    #[error("Unable to add document URL: {url}: {detail}")]
    AddFailed { url: String, detail: String },

    /// The upstream row source failed.
    #[error("Source error: {0}")]
    SourceError(String),

    /// The downstream row sink failed.
    #[error("Sink error: {0}")]
    SinkError(String),

    /// Error parsing or decoding input data.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IngestError {
    /// Create a field not found error.
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an add failure for the given endpoint.
    pub fn add_failed(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::AddFailed {
            url: url.into(),
            detail: detail.into(),
        }
    }

    /// Create a source error.
    pub fn source_failed(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a sink error.
    pub fn sink_failed(msg: impl Into<String>) -> Self {
        Self::SinkError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
