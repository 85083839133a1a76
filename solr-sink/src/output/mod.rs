//! Output module for the Solr row sink.
//!
//! Provides the downstream side of the stream: every successfully indexed
//! row is forwarded unchanged, and completion is signalled once.

mod channel_sink;
mod ndjson_sink;

pub use channel_sink::ChannelRowSink;
pub use ndjson_sink::NdjsonRowSink;

use async_trait::async_trait;
use solr_sink_shared::Row;

use crate::errors::IngestError;

/// Push-based consumer of forwarded rows.
#[async_trait]
pub trait RowSink: Send {
    /// Forward one row downstream.
    async fn put_row(&mut self, row: Row) -> Result<(), IngestError>;

    /// Signal that no more rows will follow.
    async fn set_output_done(&mut self) -> Result<(), IngestError>;
}
