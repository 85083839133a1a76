//! Index client trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing the row sink to run against Solr in production and against mock
//! implementations in tests.

use async_trait::async_trait;
use solr_sink_shared::IndexDocument;

use crate::errors::SolrError;
use crate::types::UpdateResponse;

/// Abstracts the connection to the search index.
///
/// One client is bound to one endpoint for the lifetime of a stream
/// instance. `add` only stages a document; `commit` makes everything staged
/// so far visible.
///
/// Both operations return `Ok(None)` when the server answered without a
/// response body. Deciding whether a response counts as success is left to
/// the caller.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Send one document for indexing.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to stage
    ///
    /// # Returns
    ///
    /// * `Ok(Some(UpdateResponse))` - The parsed server response
    /// * `Ok(None)` - The server sent no response body
    /// * `Err(SolrError)` - If the exchange failed
    async fn add(&self, document: &IndexDocument) -> Result<Option<UpdateResponse>, SolrError>;

    /// Make previously added documents visible and durable.
    async fn commit(&self) -> Result<Option<UpdateResponse>, SolrError>;

    /// The endpoint URL this client is bound to.
    fn endpoint(&self) -> &str;
}
