//! Error types for the Solr sink repository.
//!
//! This module provides a unified error type for all index client operations.

mod solr_error;

pub use solr_error::SolrError;
