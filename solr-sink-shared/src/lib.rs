//! # Solr Sink Shared
//!
//! This crate defines the data structures shared across the Solr row sink:
//! the rows flowing through the host pipeline and the partial-update
//! documents sent to the search index.

pub mod types;

pub use types::index_document::{DocumentField, IndexDocument, PartialUpdate, UpdateOperation};
pub use types::row::{Row, RowSchema};
