//! Consumer module for the Solr row sink.
//!
//! Provides the upstream side of the stream: sources the row processor
//! pulls rows from.

mod channel_source;
mod ndjson_source;

pub use channel_source::ChannelRowSource;
pub use ndjson_source::NdjsonRowSource;

use async_trait::async_trait;
use solr_sink_shared::Row;

use crate::errors::IngestError;

/// Pull-based source of rows.
///
/// All rows of one source share the same schema.
#[async_trait]
pub trait RowSource: Send {
    /// Next row, or `Ok(None)` once the input is exhausted.
    async fn next_row(&mut self) -> Result<Option<Row>, IngestError>;
}
