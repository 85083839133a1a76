//! # Solr Sink Repository
//!
//! This crate provides the trait and implementation for talking to the
//! search index. It includes definitions for errors, the `IndexClient`
//! interface, response types, and a concrete implementation for Solr.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod solr;
pub mod types;

pub use config::SolrClientConfig;
pub use errors::SolrError;
pub use interfaces::IndexClient;
pub use solr::SolrClient;
pub use types::{ResponseHeader, UpdateResponse};
