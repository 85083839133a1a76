//! Processor module for the Solr row sink.
//!
//! Resolves the configured field mapping against the row schema and turns
//! rows into partial-update documents.

mod document_builder;
mod field_mapping;

pub use document_builder::{DocumentBuilder, DEFAULT_KEY_FIELD};
pub use field_mapping::{FieldMapping, FieldPair, ResolvedMapping};
