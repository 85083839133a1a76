//! # Solr Sink
//!
//! Streaming sink that turns pipeline rows into Solr partial-update
//! documents, indexes them one by one and passes every row through
//! unchanged.
//!
//! ## Architecture
//!
//! The sink follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Pulls rows from the upstream step
//! 2. **Processor**: Maps row fields to document fields
//! 3. **Loader**: Adds documents to Solr and commits in batches
//! 4. **Output**: Forwards rows to the downstream step
//! 5. **Orchestrator**: Drives the stream lifecycle
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Row sources
//! - [`processor`]: Field mapping and document building
//! - [`loader`]: Adds documents and commits them
//! - [`output`]: Row sinks
//! - [`orchestrator`]: Stream state machine
//! - [`errors`]: Error types for the sink

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod output;
pub mod processor;

pub use config::{Dependencies, SinkSettings};
pub use errors::IngestError;
pub use orchestrator::{ProcessorConfig, ProcessorState, RowProcessor, StreamSummary};

use thiserror::Error;

/// Errors that can occur during sink initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
