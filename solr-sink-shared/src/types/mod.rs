//! This module defines the core data structures used across the Solr row sink.
//! It re-exports the row model and the index document model.

pub mod index_document;
pub mod row;

pub use index_document::{DocumentField, IndexDocument, PartialUpdate, UpdateOperation};
pub use row::{Row, RowSchema};
